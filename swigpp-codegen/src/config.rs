// Configuration types for swigpp-codegen, deserialized from swigpp.config.toml.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::backends::Backend;
use crate::error::{Result, SwigppError};

/// Top-level config file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SwigppConfig {
    pub swig: SwigConfig,
    pub paths: PathsConfig,
    pub backends: BackendsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SwigConfig {
    /// Interface compiler executable (a bare name is looked up on `PATH`).
    pub executable: String,
    /// Native library name for the managed backend. Ignored for `ios`.
    pub dll_name: Option<String>,
}

impl Default for SwigConfig {
    fn default() -> Self {
        SwigConfig {
            executable: default_swig_executable(),
            dll_name: None,
        }
    }
}

fn default_swig_executable() -> String {
    "swig".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSON profile table (relative to the config file location).
    pub profiles: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    pub csharp: Option<BackendConfig>,
    pub java: Option<BackendConfig>,
    pub objc: Option<BackendConfig>,
    pub emscripten: Option<BackendConfig>,
}

impl BackendsConfig {
    pub fn get(&self, backend: Backend) -> Option<&BackendConfig> {
        match backend {
            Backend::CSharp => self.csharp.as_ref(),
            Backend::Java => self.java.as_ref(),
            Backend::Objc => self.objc.as_ref(),
            Backend::Emscripten => self.emscripten.as_ref(),
        }
    }
}

/// Per-backend overrides. Unset fields fall back to the backend's built-in defaults.
/// Path lists are semicolon-joined and may contain `{target}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub source_dirs: Option<String>,
    pub cpp_dirs: Option<String>,
    pub proxy_dir: Option<String>,
    pub wrapper_dir: Option<String>,
    pub module_dir: Option<String>,
    pub swig_lib_dirs: Option<String>,
    /// Target -> file names not processed for that target.
    pub exclude_files: Option<HashMap<String, Vec<String>>>,
}

impl SwigppConfig {
    /// Load the config file. A missing file yields the all-defaults config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(SwigppConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(SwigppError::io(path))?;
        SwigppConfig::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| SwigppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SwigppConfig::parse("", Path::new("swigpp.config.toml")).unwrap();
        assert_eq!(config.swig.executable, "swig");
        assert!(config.swig.dll_name.is_none());
        assert!(config.paths.profiles.is_none());
        assert!(config.backends.get(Backend::CSharp).is_none());
    }

    #[test]
    fn backend_sections_parse() {
        let text = r#"
[swig]
executable = "/opt/swig/bin/swig"
dll_name = "carto_mobile_sdk_custom"

[paths]
profiles = "scripts/build/sdk_profiles.json"

[backends.csharp]
source_dirs = "modules;{target}/modules"

[backends.csharp.exclude_files]
android = ["IOSUtils.i"]
"#;
        let config = SwigppConfig::parse(text, Path::new("swigpp.config.toml")).unwrap();
        assert_eq!(config.swig.executable, "/opt/swig/bin/swig");
        let cs = config.backends.get(Backend::CSharp).unwrap();
        assert_eq!(cs.source_dirs.as_deref(), Some("modules;{target}/modules"));
        assert!(cs.cpp_dirs.is_none());
        assert_eq!(cs.exclude_files.as_ref().unwrap()["android"], vec!["IOSUtils.i"]);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let err = SwigppConfig::parse("[swig\n", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SwigppConfig::load(&dir.path().join("swigpp.config.toml")).unwrap();
        assert_eq!(config.swig.executable, "swig");
    }
}
