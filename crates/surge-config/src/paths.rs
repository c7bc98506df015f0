//! Where presets live on disk.
//!
//! Presets are looked up in two directories: a per-user one that `surge
//! presets save` writes to, and a read-only system one for presets installed
//! with the application. A name that matches no file falls back to the
//! built-in factory presets.
//!
//! | | Linux | macOS | Windows |
//! |---|---|---|---|
//! | user | `~/.config/surge/presets` | `~/Library/Application Support/surge/presets` | `%APPDATA%\surge\presets` |
//! | system | `/usr/share/surge/presets` | `/Library/Application Support/surge/presets` | `%PROGRAMDATA%\surge\presets` |
//!
//! The free functions use the platform directories; [`PresetDirs`] can point
//! the search anywhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use surge_config::paths;
//!
//! println!("User presets: {:?}", paths::user_presets_dir());
//!
//! // File in the user or system directory, else a factory preset.
//! let preset = paths::resolve_preset("transport").unwrap();
//! ```

use crate::{ConfigError, Preset, get_factory_preset};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "surge";
const PRESETS_SUBDIR: &str = "presets";
const PRESET_EXT: &str = "toml";

/// Per-user configuration directory (`<config>/surge`).
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Per-user presets directory (`<config>/surge/presets`).
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// System-wide presets directory; usually read-only.
pub fn system_presets_dir() -> PathBuf {
    let base = if cfg!(target_os = "linux") {
        PathBuf::from("/usr/share")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Application Support")
    } else if cfg!(target_os = "windows") {
        std::env::var_os("PROGRAMDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
    } else {
        dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
    };
    base.join(APP_NAME).join(PRESETS_SUBDIR)
}

/// Ordered preset search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDirs {
    /// Writable directory, searched first.
    pub user: PathBuf,
    /// Read-only directory, searched second.
    pub system: PathBuf,
}

impl Default for PresetDirs {
    fn default() -> Self {
        Self {
            user: user_presets_dir(),
            system: system_presets_dir(),
        }
    }
}

impl PresetDirs {
    /// Search path with explicit directories.
    pub fn new(user: impl Into<PathBuf>, system: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            system: system.into(),
        }
    }

    /// File for user preset `name`, whether or not it exists.
    pub fn user_preset_path(&self, name: &str) -> PathBuf {
        self.user.join(file_name(name))
    }

    /// Locate a preset file.
    ///
    /// `name` may be a path to an existing file, or a preset name with or
    /// without the `.toml` extension looked up in the user, then system,
    /// directory.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        let file = file_name(name);
        [&self.user, &self.system]
            .into_iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.is_file())
    }

    /// Load a preset file, falling back to the factory preset of that name.
    ///
    /// A file shadows a factory preset with the same name.
    pub fn resolve(&self, name: &str) -> Result<Preset, ConfigError> {
        match self.find(name) {
            Some(path) => Preset::load(path),
            None => get_factory_preset(name)
                .ok_or_else(|| ConfigError::PresetNotFound(name.to_string())),
        }
    }

    /// Preset files in the user, then system, directory.
    ///
    /// Names present in both are listed twice; the caller decides precedence.
    pub fn list(&self) -> Vec<PathBuf> {
        let mut presets = list_presets_in_dir(&self.user);
        presets.extend(list_presets_in_dir(&self.system));
        presets
    }
}

fn file_name(name: &str) -> String {
    if Path::new(name).extension().is_some_and(|ext| ext == PRESET_EXT) {
        name.to_string()
    } else {
        format!("{name}.{PRESET_EXT}")
    }
}

/// Find a preset file in the platform directories.
///
/// See [`PresetDirs::find`].
pub fn find_preset(name: &str) -> Option<PathBuf> {
    PresetDirs::default().find(name)
}

/// Load a preset by file path, user/system preset name or factory name.
///
/// # Errors
///
/// [`ConfigError::PresetNotFound`] when nothing matches, or the load error of
/// a matching file.
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    PresetDirs::default().resolve(name)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    if !dir.is_dir() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Create the user presets directory if needed and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_presets_dir())
}

/// Create the user config directory if needed and return it.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_config_dir())
}

/// Preset files in the user presets directory.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// Preset files in the system presets directory.
pub fn list_system_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&system_presets_dir())
}

/// Preset files in both directories, user first.
pub fn list_all_presets() -> Vec<PathBuf> {
    PresetDirs::default().list()
}

/// `.toml` files directly inside `dir`, sorted. Missing or unreadable
/// directories give an empty list.
fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut presets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == PRESET_EXT)
        })
        .collect();
    presets.sort();
    presets
}

/// Preset name of a file: its stem.
///
/// ```rust
/// use surge_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/long_tail.toml"));
/// assert_eq!(name.as_deref(), Some("long_tail"));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Dirs {
        _root: TempDir,
        dirs: PresetDirs,
    }

    fn temp_dirs() -> Dirs {
        let root = TempDir::new().unwrap();
        let dirs = PresetDirs::new(root.path().join("user"), root.path().join("system"));
        fs::create_dir_all(&dirs.user).unwrap();
        fs::create_dir_all(&dirs.system).unwrap();
        Dirs { _root: root, dirs }
    }

    fn write(dir: &Path, file: &str, name: &str) {
        fs::write(dir.join(file), format!("name = \"{name}\"\n")).unwrap();
    }

    #[test]
    fn platform_dirs_are_namespaced() {
        assert!(user_presets_dir().ends_with("surge/presets"));
        assert!(user_config_dir().ends_with("surge"));
        assert!(system_presets_dir().ends_with("surge/presets"));
        assert_eq!(PresetDirs::default().user, user_presets_dir());
    }

    #[test]
    fn file_name_adds_extension_once() {
        assert_eq!(file_name("tight"), "tight.toml");
        assert_eq!(file_name("tight.toml"), "tight.toml");
        assert_eq!(file_name("v1.2"), "v1.2.toml");
    }

    #[test]
    fn find_by_direct_path() {
        let t = temp_dirs();
        let path = t.dirs.system.join("elsewhere.toml");
        write(&t.dirs.system, "elsewhere.toml", "x");
        assert_eq!(t.dirs.find(path.to_str().unwrap()), Some(path));
    }

    #[test]
    fn user_dir_shadows_system_dir() {
        let t = temp_dirs();
        write(&t.dirs.system, "tight.toml", "System");
        assert_eq!(t.dirs.find("tight"), Some(t.dirs.system.join("tight.toml")));

        write(&t.dirs.user, "tight.toml", "User");
        assert_eq!(t.dirs.find("tight.toml"), Some(t.dirs.user.join("tight.toml")));
        assert_eq!(t.dirs.resolve("tight").unwrap().name, "User");
    }

    #[test]
    fn file_shadows_factory_preset() {
        let t = temp_dirs();
        assert_eq!(t.dirs.resolve("transport").unwrap().name, "Transport");

        write(&t.dirs.user, "transport.toml", "Mine");
        assert_eq!(t.dirs.resolve("transport").unwrap().name, "Mine");
    }

    #[test]
    fn missing_preset_is_not_found() {
        let t = temp_dirs();
        assert!(t.dirs.find("nonexistent_preset_12345").is_none());
        assert!(matches!(
            t.dirs.resolve("nonexistent_preset_12345"),
            Err(ConfigError::PresetNotFound(ref n)) if n == "nonexistent_preset_12345"
        ));
    }

    #[test]
    fn broken_file_is_a_load_error_not_a_fallback() {
        let t = temp_dirs();
        fs::write(t.dirs.user.join("transport.toml"), "name = [").unwrap();
        assert!(matches!(t.dirs.resolve("transport"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn list_is_user_first_and_toml_only() {
        let t = temp_dirs();
        write(&t.dirs.user, "b.toml", "b");
        write(&t.dirs.user, "a.toml", "a");
        write(&t.dirs.system, "c.toml", "c");
        fs::write(t.dirs.user.join("notes.txt"), "").unwrap();

        let names: Vec<String> = t
            .dirs
            .list()
            .iter()
            .filter_map(|p| preset_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn missing_dir_lists_nothing() {
        assert!(list_presets_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }

    #[test]
    fn user_preset_path_is_in_user_dir() {
        let dirs = PresetDirs::new("/u", "/s");
        assert_eq!(dirs.user_preset_path("mine"), PathBuf::from("/u/mine.toml"));
    }
}
