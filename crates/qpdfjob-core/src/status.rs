//! Exit codes reported by `qpdfjob_run_from_json`.
//!
//! The values come from `qpdf_exit_code_e` in qpdf's `Constants.h` and are the
//! same codes the `qpdf` CLI exits with. Codes 2 and 3 are reused by the
//! `--is-encrypted` and `--requires-password` checks, so both readings are kept
//! as aliased constants.

use std::fmt;

/// Raw status code returned by the engine, carried verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct JobStatus(i32);

impl JobStatus {
    /// Normal exit codes (success).
    pub const SUCCESS: Self = Self(0);
    /// Normal exit codes (error).
    pub const ERROR: Self = Self(2);
    /// Normal exit codes (warning).
    pub const WARNING: Self = Self(3);
    /// Result of an `--is-encrypted` check on an unencrypted file.
    pub const IS_NOT_ENCRYPTED: Self = Self::ERROR;
    /// Result of a `--requires-password` check when the password was correct.
    pub const CORRECT_PASSWORD: Self = Self::WARNING;

    /// Every named constant with its value and meaning, in declaration order.
    pub const TABLE: [(&'static str, JobStatus, &'static str); 5] = [
        ("SUCCESS", Self::SUCCESS, "normal success"),
        ("ERROR", Self::ERROR, "normal failure"),
        ("WARNING", Self::WARNING, "completed with warnings"),
        (
            "IS_NOT_ENCRYPTED",
            Self::IS_NOT_ENCRYPTED,
            "file not encrypted (--is-encrypted)",
        ),
        (
            "CORRECT_PASSWORD",
            Self::CORRECT_PASSWORD,
            "password check passed (--requires-password)",
        ),
    ];

    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }

    pub fn is_warning(self) -> bool {
        self == Self::WARNING
    }

    /// Whether the code is one the engine documents. Anything else is an
    /// engine-side contract violation; it is still passed through untouched.
    pub fn is_documented(self) -> bool {
        self.name().is_some()
    }

    /// Generic name of the code, ignoring the check-specific aliases.
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("success"),
            2 => Some("error"),
            3 => Some("warning"),
            _ => None,
        }
    }
}

impl From<i32> for JobStatus {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl From<JobStatus> for i32 {
    fn from(status: JobStatus) -> Self {
        status.0
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{} (undocumented)", self.0),
        }
    }
}
