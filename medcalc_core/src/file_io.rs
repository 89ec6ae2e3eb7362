//! # File I/O Module
//!
//! Preferences file operations with safety features:
//! - **Atomic saves**: Write to .tmp, verify, rename to prevent corruption
//! - **Tolerant loads**: A missing file means first run, not an error
//! - **Version validation**: Ensure schema compatibility
//!
//! ## Example
//!
//! ```rust,no_run
//! use medcalc_core::file_io::{load_or_default, save_preferences};
//! use medcalc_core::settings::Theme;
//! use std::path::Path;
//!
//! let path = Path::new("medcalc-prefs.json");
//! let mut prefs = load_or_default(path)?;
//! prefs.set_theme(Theme::Dark);
//! save_preferences(&prefs, path)?;
//! # Ok::<(), medcalc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::settings::{Preferences, SCHEMA_VERSION};

/// Save preferences with atomic write semantics.
///
/// The save process:
/// 1. Serialize to pretty JSON
/// 2. Write and fsync a temporary file next to the target
/// 3. Re-read the temporary file and check it parses
/// 4. Rename it over the target
pub fn save_preferences(prefs: &Preferences, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(prefs)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    if let Err(e) = verify(&tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), "saved preferences");
    Ok(())
}

/// Load preferences from a file.
///
/// # Returns
///
/// * `Ok(Preferences)` - Successfully loaded
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error, including a missing file
pub fn load_preferences(path: &Path) -> CalcResult<Preferences> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let prefs: Preferences =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&prefs.version)?;

    Ok(prefs)
}

/// Like [`load_preferences`], but a file that does not exist yet yields
/// defaults.
pub fn load_or_default(path: &Path) -> CalcResult<Preferences> {
    match fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no preferences file, using defaults");
            Ok(Preferences::default())
        }
        _ => load_preferences(path),
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn verify(path: &Path) -> CalcResult<()> {
    let written = fs::read_to_string(path).map_err(|e| {
        CalcError::file_error("verify temp file", path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str::<Preferences>(&written)?;
    Ok(())
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version than ours is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;
    use std::env::temp_dir;
    use uuid::Uuid;

    fn temp_prefs_path() -> PathBuf {
        temp_dir().join(format!("medcalc_test_{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_tmp_path_generation() {
        let tmp = tmp_path_for(Path::new("/path/to/prefs.json"));
        assert_eq!(tmp, Path::new("/path/to/prefs.json.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_prefs_path();

        let mut prefs = Preferences::default();
        prefs.set_theme(Theme::HighContrast);
        prefs.advisory.temperature = 0.2;
        save_preferences(&prefs, &path).unwrap();

        let loaded = load_preferences(&path).unwrap();
        assert_eq!(loaded, prefs);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_prefs_path();
        save_preferences(&Preferences::default(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let path = temp_prefs_path();
        assert!(matches!(
            load_preferences(&path),
            Err(CalcError::FileError { .. })
        ));
        assert_eq!(load_or_default(&path).unwrap().theme, Theme::Light);
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_prefs_path();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_or_default(&path),
            Err(CalcError::SerializationError { .. })
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_mismatch() {
        let path = temp_prefs_path();
        let mut prefs = Preferences::default();
        prefs.version = "2.0.0".to_string();
        fs::write(&path, serde_json::to_string(&prefs).unwrap()).unwrap();

        assert_eq!(
            load_preferences(&path).unwrap_err(),
            CalcError::VersionMismatch {
                file_version: "2.0.0".to_string(),
                expected_version: SCHEMA_VERSION.to_string(),
            }
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
