use pyo3::prelude::*;

use qpdfjob_core::JobStatus;

mod errors;
mod job;

/// The native extension module for the `qpdfjob` Python package.
#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<job::PyQpdfJob>()?;
    m.add_function(wrap_pyfunction!(job::run_job, m)?)?;
    m.add_function(wrap_pyfunction!(job::validate, m)?)?;
    errors::register(m)?;

    for (name, status, _) in JobStatus::TABLE {
        m.add(format!("QPDF_EXIT_{name}"), status.code())?;
    }
    m.add("LIBRARY_PATH_ENV", qpdfjob_core::LIBRARY_PATH_ENV)?;
    Ok(())
}
