use pyo3::exceptions::{PyException, PyOSError};
use pyo3::prelude::*;
use pyo3::{PyErr, create_exception};

use qpdfjob_core::JobError;

create_exception!(_native, QpdfJobError, PyException, "Base class for qpdfjob errors.");
create_exception!(
    _native,
    ConfigurationError,
    QpdfJobError,
    "No qpdf library path was configured."
);
create_exception!(
    _native,
    LibraryError,
    QpdfJobError,
    "The qpdf library could not be loaded."
);
create_exception!(
    _native,
    EncodingError,
    QpdfJobError,
    "The job is not valid UTF-8."
);
create_exception!(
    _native,
    EmptyInputError,
    QpdfJobError,
    "The job is empty after trimming whitespace."
);
create_exception!(
    _native,
    JobSyntaxError,
    QpdfJobError,
    "The job is not valid JSON."
);

/// Convert a `JobError` into the matching Python exception.
pub fn job_error_to_py(e: JobError) -> PyErr {
    let message = e.to_string();
    match e {
        JobError::Configuration(_) => ConfigurationError::new_err(message),
        JobError::Library(_) => LibraryError::new_err(message),
        JobError::Encoding { valid_up_to } => EncodingError::new_err((message, valid_up_to)),
        JobError::EmptyInput => EmptyInputError::new_err(message),
        JobError::Syntax { line, column, .. } => JobSyntaxError::new_err((message, line, column)),
        JobError::Io(_) => PyOSError::new_err(message),
    }
}

/// Expose the exception classes on the module.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("QpdfJobError", py.get_type::<QpdfJobError>())?;
    m.add("ConfigurationError", py.get_type::<ConfigurationError>())?;
    m.add("LibraryError", py.get_type::<LibraryError>())?;
    m.add("EncodingError", py.get_type::<EncodingError>())?;
    m.add("EmptyInputError", py.get_type::<EmptyInputError>())?;
    m.add("JobSyntaxError", py.get_type::<JobSyntaxError>())?;
    Ok(())
}
