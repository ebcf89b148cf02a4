//! Client configuration.
//!
//! Values come from compiled defaults, overridden by environment variables:
//!
//! - `INGEN_URI`: server to connect to
//! - `INGEN_BUNDLE`: explicit `ingen.lv2` bundle directory
//! - `LV2_PATH`: search path used to find the bundle otherwise

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Server URI used when none is configured.
pub const DEFAULT_URI: &str = "unix:///tmp/ingen.sock";

/// Directory name of the Ingen LV2 bundle.
pub const BUNDLE_NAME: &str = "ingen.lv2";

/// Settings for a [`Remote`](crate::Remote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub uri: String,
    pub bundle: Option<PathBuf>,
    pub lv2_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            bundle: None,
            lv2_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Empty values are ignored.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(uri) = read("INGEN_URI") {
            config.uri = uri;
        }
        config.bundle = read("INGEN_BUNDLE").map(PathBuf::from);
        config.lv2_path = read("LV2_PATH");
        config
    }

    /// Directories searched for the Ingen bundle, in order.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let home = std::env::var("HOME").ok();
        let path = self
            .lv2_path
            .clone()
            .unwrap_or_else(default_lv2_path);
        std::env::split_paths(&path)
            .map(|dir| expand_home(&dir, home.as_deref()))
            .collect()
    }

    /// The configured bundle, or the first `ingen.lv2` on the search path.
    pub fn find_bundle(&self) -> Option<PathBuf> {
        if let Some(bundle) = &self.bundle {
            return Some(bundle.clone());
        }
        let found = self
            .search_dirs()
            .into_iter()
            .map(|dir| dir.join(BUNDLE_NAME))
            .find(|bundle| bundle.is_dir());
        debug!(bundle = ?found, "searched for Ingen bundle");
        found
    }
}

#[cfg(target_os = "macos")]
fn default_lv2_path() -> String {
    [
        "~/Library/Audio/Plug-Ins/LV2",
        "~/.lv2",
        "/usr/local/lib/lv2",
        "/usr/lib/lv2",
        "/Library/Audio/Plug-Ins/LV2",
    ]
    .join(":")
}

#[cfg(windows)]
fn default_lv2_path() -> String {
    ["APPDATA", "COMMONPROGRAMFILES"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|dir| format!("{}\\LV2", dir))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(not(any(target_os = "macos", windows)))]
fn default_lv2_path() -> String {
    ["~/.lv2", "/usr/lib/lv2", "/usr/local/lib/lv2"].join(":")
}

fn expand_home(dir: &Path, home: Option<&str>) -> PathBuf {
    match (dir.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => Path::new(home).join(rest),
        _ => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_vars(vars(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.uri, DEFAULT_URI);
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_vars(vars(&[
            ("INGEN_URI", "tcp://localhost:16180"),
            ("INGEN_BUNDLE", "/opt/ingen.lv2"),
            ("LV2_PATH", ""),
        ]));
        assert_eq!(config.uri, "tcp://localhost:16180");
        assert_eq!(config.bundle, Some(PathBuf::from("/opt/ingen.lv2")));
        assert_eq!(config.lv2_path, None);
        assert_eq!(config.find_bundle(), Some(PathBuf::from("/opt/ingen.lv2")));
    }

    #[test]
    fn test_find_bundle_on_search_path() {
        let empty = tempfile::tempdir().unwrap();
        let lv2 = tempfile::tempdir().unwrap();
        std::fs::create_dir(lv2.path().join(BUNDLE_NAME)).unwrap();

        let path = std::env::join_paths([empty.path(), lv2.path()]).unwrap();
        let config = ClientConfig {
            lv2_path: Some(path.to_string_lossy().into_owned()),
            ..ClientConfig::default()
        };
        assert_eq!(config.search_dirs().len(), 2);
        assert_eq!(config.find_bundle(), Some(lv2.path().join(BUNDLE_NAME)));

        let config = ClientConfig {
            lv2_path: Some(empty.path().to_string_lossy().into_owned()),
            ..ClientConfig::default()
        };
        assert_eq!(config.find_bundle(), None);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home(Path::new("~/.lv2"), Some("/home/ingen")),
            PathBuf::from("/home/ingen/.lv2")
        );
        assert_eq!(
            expand_home(Path::new("/usr/lib/lv2"), Some("/home/ingen")),
            PathBuf::from("/usr/lib/lv2")
        );
        assert_eq!(expand_home(Path::new("~/.lv2"), None), PathBuf::from("~/.lv2"));
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"uri": "tcp://127.0.0.1:16180"}"#).unwrap();
        assert_eq!(config.uri, "tcp://127.0.0.1:16180");
        assert_eq!(config.bundle, None);
    }
}
