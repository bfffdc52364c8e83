// TabStash platform paths for Windows
// Config: %APPDATA%/TabStash
// Data:   %APPDATA%/TabStash

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for TabStash on Windows.
/// `%APPDATA%/TabStash`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("TabStash")
}

/// Returns the data directory for TabStash on Windows.
/// `%APPDATA%/TabStash`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("TabStash")
}
