use std::path::PathBuf;

/// Returns the root gactifs directory path.
///
/// Resolution order:
/// 1. `GACTIFS_ROOT` environment variable (if set)
/// 2. Current working directory + `.gactifs`
pub fn gactifs_root() -> PathBuf {
    if let Ok(root) = std::env::var("GACTIFS_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(".gactifs")
    }
}

/// Returns the path to the YAML configuration file.
pub fn config_path() -> PathBuf {
    gactifs_root().join("config.yaml")
}

/// Returns the path to the persisted session (token, role, user).
pub fn session_path() -> PathBuf {
    gactifs_root().join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_gactifs_root_default() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::remove_var("GACTIFS_ROOT") };
        assert_eq!(gactifs_root(), PathBuf::from(".gactifs"));
        assert_eq!(session_path(), PathBuf::from(".gactifs/session.json"));
    }

    #[test]
    #[serial]
    fn test_gactifs_root_with_env_var() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("GACTIFS_ROOT", "/custom/path/.gactifs") };
        assert_eq!(gactifs_root(), PathBuf::from("/custom/path/.gactifs"));
        assert_eq!(
            config_path(),
            PathBuf::from("/custom/path/.gactifs/config.yaml")
        );
        unsafe { std::env::remove_var("GACTIFS_ROOT") };
    }
}
