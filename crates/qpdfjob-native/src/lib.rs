use std::ffi::{c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::Library;

use qpdfjob_core::{Dispatcher, JobError, JobJson, JobRunner, JobStatus, Settings};

/// Name of the exported entry point, declared in qpdf's `qpdfjob-c.h` as
/// `int qpdfjob_run_from_json(char const* json);`.
pub const ENTRY_POINT: &str = "qpdfjob_run_from_json";

type RunFromJson = unsafe extern "C" fn(json: *const c_char) -> c_int;

/// libqpdf-based implementation of [`JobRunner`].
///
/// The shared library is opened once in [`NativeRunner::load`] and stays
/// loaded for the lifetime of the runner. Share one runner between threads
/// with `Arc` instead of loading it again.
pub struct NativeRunner {
    run_from_json: RunFromJson,
    path: PathBuf,
    // Keeps `run_from_json` valid; must outlive every call through it.
    _library: Library,
}

impl NativeRunner {
    /// Open the library at `path` and bind [`ENTRY_POINT`].
    pub fn load(path: &Path) -> Result<Self, JobError> {
        if !path.is_file() {
            return Err(JobError::Configuration(format!(
                "qpdf library not found at {}",
                path.display()
            )));
        }

        // SAFETY: loading runs the library's initializers. libqpdf has no
        // initializers with preconditions on the host process.
        let library = unsafe { Library::new(path) }
            .map_err(|e| JobError::Library(format!("{}: {}", path.display(), e)))?;

        // SAFETY: the signature matches the declaration in qpdfjob-c.h.
        let run_from_json: RunFromJson = unsafe {
            *library
                .get::<RunFromJson>(ENTRY_POINT.as_bytes())
                .map_err(|e| {
                    JobError::Library(format!(
                        "{} does not export {}: {}",
                        path.display(),
                        ENTRY_POINT,
                        e
                    ))
                })?
        };

        tracing::debug!(path = %path.display(), "loaded qpdf library");

        Ok(Self {
            run_from_json,
            path: path.to_path_buf(),
            _library: library,
        })
    }

    /// Load the library named by `settings`.
    ///
    /// Fails with [`JobError::Configuration`] when no path is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, JobError> {
        Self::load(settings.library_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for NativeRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRunner")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl JobRunner for NativeRunner {
    fn invoke(&self, job: &JobJson) -> Result<JobStatus, JobError> {
        let json = job.to_c_string()?;
        // SAFETY: `json` is a valid NUL-terminated string that lives across the
        // call, and the library backing `run_from_json` is owned by `self`.
        let code = unsafe { (self.run_from_json)(json.as_ptr()) };
        Ok(JobStatus::from(code))
    }
}

/// Build a dispatcher backed by the library named in `settings`.
///
/// This is the one-time initialization step: the configuration check happens
/// here, before any job is seen.
pub fn dispatcher(settings: &Settings) -> Result<Dispatcher<NativeRunner>, JobError> {
    NativeRunner::from_settings(settings).map(Dispatcher::new)
}

/// Load the library, validate `input` and run it.
///
/// Convenience for one-shot callers; a missing library path is reported
/// before the input is looked at. Long-lived callers should keep the
/// [`Dispatcher`] from [`dispatcher`] instead of reloading per job.
pub fn run_job(settings: &Settings, input: impl AsRef<[u8]>) -> Result<JobStatus, JobError> {
    dispatcher(settings)?.run_job(input)
}
