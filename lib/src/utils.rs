use std::path::PathBuf;

pub const DATABASE_FILE_NAME: &str = "profiles.db";

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Directory shared with buku for application data
pub fn get_default_dbdir() -> PathBuf {
    if let Some(path) = std::env::var_os("XDG_DATA_HOME") {
        return PathBuf::from(path).join("buku");
    }

    if let Some(home) = home_dir() {
        return home.join(".local/share/buku");
    }

    #[cfg(target_os = "windows")]
    if let Some(appdata) = std::env::var_os("APPDATA") {
        return PathBuf::from(appdata).join("buku");
    }

    PathBuf::from(".")
}

/// Profile database location; `BUKURS_PROFILE_DB` overrides it
pub fn get_default_db_path() -> PathBuf {
    match std::env::var_os("BUKURS_PROFILE_DB") {
        Some(path) => PathBuf::from(path),
        None => get_default_dbdir().join(DATABASE_FILE_NAME),
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(path).join("bukurs");
    }

    if let Some(home) = home_dir() {
        return home.join(".config/bukurs");
    }

    #[cfg(target_os = "windows")]
    if let Some(appdata) = std::env::var_os("APPDATA") {
        return PathBuf::from(appdata).join("bukurs");
    }

    PathBuf::from(".")
}
