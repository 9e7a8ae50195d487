use std::path::PathBuf;

use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyString};

use qpdfjob_core::{Dispatcher, Settings, config_file};
use qpdfjob_native::NativeRunner;

use crate::errors::{EncodingError, job_error_to_py};

/// Copy a `str` or `bytes` payload out of Python so the GIL can be released.
fn payload_bytes(json: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if let Ok(bytes) = json.downcast::<PyBytes>() {
        return Ok(bytes.as_bytes().to_vec());
    }
    if let Ok(text) = json.downcast::<PyString>() {
        // Lone surrogates can't be encoded as UTF-8.
        return text
            .to_str()
            .map(|s| s.as_bytes().to_vec())
            .map_err(|e| EncodingError::new_err(e.to_string()));
    }
    Err(PyTypeError::new_err("job must be str or bytes"))
}

fn load(library_path: Option<PathBuf>) -> PyResult<Dispatcher<NativeRunner>> {
    // Resolve configuration: argument > LIB_QPDF_PATH > config file
    let settings = Settings::resolve(library_path, &config_file::load_config());
    qpdfjob_native::dispatcher(&settings).map_err(job_error_to_py)
}

/// A loaded qpdf library, ready to run JSON jobs.
///
/// The library is opened once on construction; reuse the object for many
/// jobs. Calls release the GIL while qpdf runs.
///
/// Example::
///
///     job = QpdfJob("/usr/lib/x86_64-linux-gnu/libqpdf.so.29")
///     code = job.run_job('{"inputFile": "in.pdf", "outputFile": "out.pdf"}')
///     assert code == QPDF_EXIT_SUCCESS
///
#[pyclass(name = "QpdfJob", frozen)]
pub struct PyQpdfJob {
    dispatcher: Dispatcher<NativeRunner>,
}

#[pymethods]
impl PyQpdfJob {
    #[new]
    #[pyo3(signature = (library_path=None))]
    fn new(library_path: Option<PathBuf>) -> PyResult<Self> {
        Ok(Self {
            dispatcher: load(library_path)?,
        })
    }

    /// Path of the loaded library.
    #[getter]
    fn library_path(&self) -> PathBuf {
        self.dispatcher.runner().path().to_path_buf()
    }

    /// Run a job description and return qpdf's exit code.
    ///
    /// Raises `EncodingError`, `EmptyInputError` or `JobSyntaxError` before
    /// qpdf is called. Nonzero exit codes are returned, not raised.
    fn run_job(&self, py: Python<'_>, json: &Bound<'_, PyAny>) -> PyResult<i32> {
        let bytes = payload_bytes(json)?;
        py.allow_threads(|| self.dispatcher.run_job(bytes))
            .map(|status| status.code())
            .map_err(job_error_to_py)
    }

    fn __repr__(&self) -> String {
        format!(
            "QpdfJob(library_path={:?})",
            self.dispatcher.runner().path().display().to_string()
        )
    }
}

/// Run a single job, loading the library first.
///
/// A missing library path raises `ConfigurationError` before the job is
/// looked at.
#[pyfunction]
#[pyo3(signature = (json, library_path=None))]
pub fn run_job(
    py: Python<'_>,
    json: &Bound<'_, PyAny>,
    library_path: Option<PathBuf>,
) -> PyResult<i32> {
    let dispatcher = load(library_path)?;
    let bytes = payload_bytes(json)?;
    py.allow_threads(|| dispatcher.run_job(bytes))
        .map(|status| status.code())
        .map_err(job_error_to_py)
}

/// Check that a job description would be accepted, without running it.
#[pyfunction]
pub fn validate(json: &Bound<'_, PyAny>) -> PyResult<()> {
    let bytes = payload_bytes(json)?;
    qpdfjob_core::validate_job(&bytes)
        .map(|_| ())
        .map_err(job_error_to_py)
}
