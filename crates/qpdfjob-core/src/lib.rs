use std::fmt;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod dispatcher;
pub mod job;
pub mod settings;
pub mod status;

// Re-export for convenience
pub use backend::JobRunner;
pub use dispatcher::Dispatcher;
pub use job::{JobJson, validate_job, validate_job_str};
pub use settings::{LIBRARY_PATH_ENV, PathSource, Settings};
pub use status::JobStatus;

/// Broad class of a JSON syntax failure, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxCategory {
    /// Input is not syntactically valid JSON.
    Syntax,
    /// Input ended in the middle of a value.
    Eof,
    /// Input is well-formed but a value is out of range for the parser.
    Data,
    /// The underlying reader failed.
    Io,
}

impl From<serde_json::error::Category> for SyntaxCategory {
    fn from(category: serde_json::error::Category) -> Self {
        match category {
            serde_json::error::Category::Syntax => SyntaxCategory::Syntax,
            serde_json::error::Category::Eof => SyntaxCategory::Eof,
            serde_json::error::Category::Data => SyntaxCategory::Data,
            serde_json::error::Category::Io => SyntaxCategory::Io,
        }
    }
}

impl fmt::Display for SyntaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyntaxCategory::Syntax => "syntax",
            SyntaxCategory::Eof => "eof",
            SyntaxCategory::Data => "data",
            SyntaxCategory::Io => "io",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum JobError {
    /// No usable library path was established before the first dispatch.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to load native library: {0}")]
    Library(String),
    #[error("malformed UTF-8 characters, possibly incorrectly encoded (valid up to byte {valid_up_to})")]
    Encoding { valid_up_to: usize },
    #[error("empty input")]
    EmptyInput,
    #[error("syntax error: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        category: SyntaxCategory,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JobError {
    /// The process was not set up correctly; retrying with other input won't help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, JobError::Configuration(_) | JobError::Library(_))
    }

    /// The caller's payload was rejected before reaching the engine.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            JobError::Encoding { .. } | JobError::EmptyInput | JobError::Syntax { .. }
        )
    }
}

impl From<serde_json::Error> for JobError {
    fn from(e: serde_json::Error) -> Self {
        JobError::Syntax {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
            category: e.classify().into(),
        }
    }
}
