//! Firefox profile discovery
//!
//! Profiles live under a per-platform directory in the user's home. Without
//! an explicit profile name the first directory ending in `.default-release`
//! is used.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{COOKIE_DB_FILE, DEFAULT_PROFILE_SUFFIX};
use crate::error::{FfCookiesError, Result};

#[cfg(target_os = "macos")]
const PROFILES_DIR: &[&str] = &["Library", "Application Support", "Firefox", "Profiles"];
#[cfg(target_os = "windows")]
const PROFILES_DIR: &[&str] = &["AppData", "Roaming", "Mozilla", "Firefox", "Profiles"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PROFILES_DIR: &[&str] = &[".mozilla", "firefox"];

/// Base directory holding the Firefox profiles of the current user.
pub fn profile_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        FfCookiesError::Config("cannot determine the firefox profile directory".to_string())
    })?;
    Ok(profiles_under(&home))
}

fn profiles_under(home: &Path) -> PathBuf {
    PROFILES_DIR
        .iter()
        .fold(home.to_path_buf(), |dir, part| dir.join(part))
}

/// Path of the cookie database for `profile` under `base`.
///
/// An empty profile name selects the first (by name) subdirectory ending in
/// the default-profile suffix. When none exists `base` itself is used as the
/// profile directory. The returned file is not checked for existence.
pub fn cookie_path(base: &Path, profile: &str) -> Result<PathBuf> {
    if !profile.is_empty() {
        return Ok(base.join(profile).join(COOKIE_DB_FILE));
    }

    match default_profile(base)? {
        Some(name) => {
            log::debug!("using default firefox profile {}", name);
            Ok(base.join(name).join(COOKIE_DB_FILE))
        }
        None => {
            log::debug!(
                "no {} profile under {}, reading from the base directory",
                DEFAULT_PROFILE_SUFFIX,
                base.display()
            );
            Ok(base.join(COOKIE_DB_FILE))
        }
    }
}

fn default_profile(base: &Path) -> Result<Option<String>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(DEFAULT_PROFILE_SUFFIX) {
                candidates.push(name.to_string());
            }
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::{cookie_path, profile_dir, profiles_under};
    use crate::error::FfCookiesError;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn default_profile_is_found_by_suffix() {
        let base = tempdir().expect("tempdir");
        fs::create_dir(base.path().join("abcd1234.default-release")).expect("profile dir");
        fs::create_dir(base.path().join("zzzz9999.default")).expect("other dir");

        let path = cookie_path(base.path(), "").expect("resolve");
        assert_eq!(
            path,
            base.path()
                .join("abcd1234.default-release")
                .join("cookies.sqlite")
        );
    }

    #[test]
    fn files_with_the_suffix_are_ignored() {
        let base = tempdir().expect("tempdir");
        fs::write(base.path().join("stray.default-release"), b"").expect("file");

        let path = cookie_path(base.path(), "").expect("resolve");
        assert_eq!(path, base.path().join("cookies.sqlite"));
    }

    #[test]
    fn explicit_profile_is_used_verbatim() {
        let base = Path::new("/nonexistent/profiles");
        let path = cookie_path(base, "work.profile").expect("resolve");
        assert_eq!(path, base.join("work.profile").join("cookies.sqlite"));
    }

    #[test]
    fn missing_default_profile_falls_back_to_base() {
        let base = tempdir().expect("tempdir");
        let path = cookie_path(base.path(), "").expect("resolve");
        assert_eq!(path, base.path().join("cookies.sqlite"));
    }

    #[test]
    fn unreadable_base_is_an_io_error() {
        let base = tempdir().expect("tempdir");
        let missing = base.path().join("missing");
        let err = cookie_path(&missing, "").expect_err("missing base");
        assert!(matches!(err, FfCookiesError::Io(_)));
    }

    #[test]
    fn profile_dir_lives_under_home() {
        let home = dirs::home_dir().expect("home dir");
        let dir = profile_dir().expect("profile dir");
        assert!(dir.starts_with(&home));
        assert_eq!(dir, profiles_under(&home));
    }
}
