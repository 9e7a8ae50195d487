use std::fmt;
use std::path::{Path, PathBuf};

use crate::JobError;
use crate::config_file::ConfigFile;

/// Environment variable holding the absolute path to the qpdf shared library.
pub const LIBRARY_PATH_ENV: &str = "LIB_QPDF_PATH";

/// Where the library path was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Explicit,
    Environment,
    ConfigFile,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Explicit => f.write_str("explicit setting"),
            PathSource::Environment => write!(f, "{} environment variable", LIBRARY_PATH_ENV),
            PathSource::ConfigFile => f.write_str("config file"),
        }
    }
}

/// Resolved runtime settings for the native binding.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    library_path: Option<(PathBuf, PathSource)>,
}

impl Settings {
    /// Settings with no library path; [`Settings::library_path`] will fail.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some((path.into(), PathSource::Explicit)),
        }
    }

    /// Resolve settings: explicit value > `LIB_QPDF_PATH` > config file.
    pub fn resolve(explicit: Option<PathBuf>, config: &ConfigFile) -> Self {
        Self::resolve_with_env(explicit, std::env::var(LIBRARY_PATH_ENV).ok(), config)
    }

    /// Same as [`Settings::resolve`] with the environment value passed in.
    pub fn resolve_with_env(
        explicit: Option<PathBuf>,
        env_value: Option<String>,
        config: &ConfigFile,
    ) -> Self {
        let library_path = explicit
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| (p, PathSource::Explicit))
            .or_else(|| {
                env_value
                    .filter(|v| !v.is_empty())
                    .map(|v| (PathBuf::from(v), PathSource::Environment))
            })
            .or_else(|| config.library_path().map(|p| (p, PathSource::ConfigFile)));

        Self { library_path }
    }

    /// The configured library path. Fails with [`JobError::Configuration`]
    /// when none was established; this is the one-time precondition check
    /// performed before a runner is created.
    pub fn library_path(&self) -> Result<&Path, JobError> {
        self.library_path
            .as_ref()
            .map(|(p, _)| p.as_path())
            .ok_or_else(|| {
                JobError::Configuration(format!(
                    "no qpdf library path configured; set {} or [library] path in the config file",
                    LIBRARY_PATH_ENV
                ))
            })
    }

    pub fn source(&self) -> Option<PathSource> {
        self.library_path.as_ref().map(|(_, s)| *s)
    }
}
