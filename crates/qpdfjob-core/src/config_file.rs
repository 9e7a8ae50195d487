use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub library: Option<LibraryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Absolute path to the qpdf shared library (e.g. `libqpdf.so.29`).
    pub path: Option<String>,
}

impl ConfigFile {
    pub fn library_path(&self) -> Option<PathBuf> {
        self.library
            .as_ref()
            .and_then(|l| l.path.as_deref())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn with_library_path(path: impl Into<String>) -> Self {
        Self {
            library: Some(LibraryConfig {
                path: Some(path.into()),
            }),
        }
    }
}

/// Platform config directory path: `<config_dir>/qpdfjob/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qpdfjob").join("config.toml"))
}

/// Load config by cascading CWD `.qpdfjob.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".qpdfjob.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        library: Some(LibraryConfig {
            path: overlay
                .library
                .as_ref()
                .and_then(|l| l.path.clone())
                .or_else(|| base.library.as_ref().and_then(|l| l.path.clone())),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Save a config to a specific path, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_path_round_trip_toml() {
        let config = ConfigFile::with_library_path("/opt/qpdf/lib/libqpdf.so.29");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.library_path().unwrap(),
            PathBuf::from("/opt/qpdf/lib/libqpdf.so.29")
        );
    }

    #[test]
    fn library_section_absent_deserializes_as_none() {
        let parsed: ConfigFile = toml::from_str("").unwrap();
        assert!(parsed.library.is_none());
        assert!(parsed.library_path().is_none());
    }

    #[test]
    fn empty_library_path_is_ignored() {
        let parsed: ConfigFile = toml::from_str("[library]\npath = \"\"\n").unwrap();
        assert!(parsed.library_path().is_none());
    }

    #[test]
    fn merge_library_path_overlay_wins() {
        let merged = merge(
            ConfigFile::with_library_path("/base/libqpdf.so"),
            ConfigFile::with_library_path("/overlay/libqpdf.so"),
        );
        assert_eq!(
            merged.library_path().unwrap(),
            PathBuf::from("/overlay/libqpdf.so")
        );
    }

    #[test]
    fn merge_library_path_base_preserved_when_overlay_absent() {
        let merged = merge(
            ConfigFile::with_library_path("/base/libqpdf.so"),
            ConfigFile::default(),
        );
        assert_eq!(
            merged.library_path().unwrap(),
            PathBuf::from("/base/libqpdf.so")
        );
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        save_to_path(&ConfigFile::with_library_path("/x/libqpdf.dylib"), &path).unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(
            loaded.library_path().unwrap(),
            PathBuf::from("/x/libqpdf.dylib")
        );
    }

    #[test]
    fn unparsable_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[library\npath = 1").unwrap();
        assert!(load_from_path(&path).is_none());
    }
}
