use std::ffi::CString;

use serde::de::IgnoredAny;

use crate::JobError;

/// A job description that passed validation: UTF-8, trimmed, non-empty and
/// syntactically valid JSON. Only [`validate_job`] and [`validate_job_str`]
/// construct one, so holding a `JobJson` is proof the checks ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobJson(String);

impl JobJson {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Null-terminated copy for the native boundary.
    ///
    /// Validated JSON never holds a NUL: the grammar rejects raw control
    /// characters and trimming strips NULs at the edges.
    pub fn to_c_string(&self) -> Result<CString, JobError> {
        CString::new(self.0.as_bytes()).map_err(|e| JobError::Encoding {
            valid_up_to: e.nul_position(),
        })
    }
}

impl AsRef<str> for JobJson {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// JSON whitespace plus NUL and vertical tab.
fn is_trimmable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// Validate raw bytes as a job description.
///
/// Checks, in order, stopping at the first failure:
/// 1. UTF-8 decoding ([`JobError::Encoding`])
/// 2. non-empty after trimming ([`JobError::EmptyInput`])
/// 3. structurally valid JSON ([`JobError::Syntax`])
///
/// The schema is owned by the engine and is not checked here.
pub fn validate_job(input: &[u8]) -> Result<JobJson, JobError> {
    let text = std::str::from_utf8(input).map_err(|e| JobError::Encoding {
        valid_up_to: e.valid_up_to(),
    })?;
    validate_job_str(text)
}

/// Same as [`validate_job`] for input already known to be UTF-8.
pub fn validate_job_str(input: &str) -> Result<JobJson, JobError> {
    let trimmed = input.trim_matches(is_trimmable);
    if trimmed.is_empty() {
        return Err(JobError::EmptyInput);
    }

    serde_json::from_str::<IgnoredAny>(trimmed)?;
    tracing::trace!(bytes = trimmed.len(), "job description is valid JSON");

    Ok(JobJson(trimmed.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxCategory;

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let err = validate_job(b"{\"a\": \"\xff\"}").unwrap_err();
        assert!(matches!(err, JobError::Encoding { valid_up_to: 7 }));
    }

    #[test]
    fn test_encoding_checked_before_emptiness() {
        // A lone continuation byte surrounded by whitespace is still an encoding error.
        let err = validate_job(b"  \x80  ").unwrap_err();
        assert!(matches!(err, JobError::Encoding { .. }));
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        for input in ["", "  ", "\n\t\r ", "\0\x0B"] {
            let err = validate_job_str(input).unwrap_err();
            assert!(matches!(err, JobError::EmptyInput), "input {input:?}");
        }
    }

    #[test]
    fn test_not_json() {
        let err = validate_job_str("{not json").unwrap_err();
        match err {
            JobError::Syntax {
                line, category, ..
            } => {
                assert_eq!(line, 1);
                assert_eq!(category, SyntaxCategory::Syntax);
            }
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(matches!(
            validate_job_str("{} {}"),
            Err(JobError::Syntax { .. })
        ));
    }

    #[test]
    fn test_trims_but_keeps_body() {
        let job = validate_job_str("\n  {\"inputFile\": \"in.pdf\"}\t\n").unwrap();
        assert_eq!(job.as_str(), "{\"inputFile\": \"in.pdf\"}");
    }

    #[test]
    fn test_unicode_whitespace_is_not_trimmed() {
        // U+00A0 is not JSON whitespace, so it reaches the parser and fails there.
        assert!(matches!(
            validate_job_str("\u{a0}{}"),
            Err(JobError::Syntax { .. })
        ));
    }

    #[test]
    fn test_schema_not_enforced() {
        for input in ["0", "[]", "\"text\"", "{\"unknown\": [1, 2, {}]}", "null"] {
            assert!(validate_job_str(input).is_ok(), "input {input:?}");
        }
    }

    #[test]
    fn test_c_string_has_no_interior_nul() {
        let job = validate_job_str("{\"a\": \"\\u0000\"}\0").unwrap();
        let c = job.to_c_string().unwrap();
        assert_eq!(c.as_bytes(), job.as_str().as_bytes());
    }
}
