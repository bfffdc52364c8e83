// TabStash platform paths for Linux
// Config: ~/.config/tabstash
// Data:   ~/.local/share/tabstash

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for TabStash on Linux.
/// Uses `$XDG_CONFIG_HOME/tabstash` if set, otherwise `~/.config/tabstash`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("tabstash")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("tabstash")
    }
}

/// Returns the data directory for TabStash on Linux.
/// Uses `$XDG_DATA_HOME/tabstash` if set, otherwise `~/.local/share/tabstash`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("tabstash")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("tabstash")
    }
}
