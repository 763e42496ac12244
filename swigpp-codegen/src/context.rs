// Resolved run settings: config file, backend defaults, profile and CLI overrides merged.

use std::path::{Path, PathBuf};

use crate::backends::{Backend, BackendDriver};
use crate::config::{BackendConfig, SwigppConfig};
use crate::error::{Result, SwigppError};
use crate::profile::ProfileTable;

/// Token replaced with the target platform in configured paths.
const TARGET_TOKEN: &str = "{target}";

/// Caller overrides, usually from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub backend: Backend,
    pub target: Option<String>,
    pub profile: Option<String>,
    /// Semicolon-joined extra defines.
    pub defines: Option<String>,
    pub swig: Option<String>,
}

impl RunOptions {
    pub fn new(backend: Backend) -> Self {
        RunOptions {
            backend,
            target: None,
            profile: None,
            defines: None,
            swig: None,
        }
    }
}

/// Everything one backend run needs, with all paths absolute or relative to the
/// working directory.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub backend: Backend,
    pub target: String,
    pub profile: String,
    pub swig: String,
    pub dll_name: Option<String>,
    pub defines: Vec<String>,
    pub source_dirs: Vec<PathBuf>,
    pub cpp_dirs: Vec<PathBuf>,
    pub swig_lib_dirs: Vec<PathBuf>,
    pub proxy_dir: Option<PathBuf>,
    pub wrapper_dir: PathBuf,
    pub module_dir: PathBuf,
    pub exclude_files: Vec<String>,
}

impl RunSettings {
    pub fn resolve(config: &SwigppConfig, config_dir: &Path, opts: &RunOptions) -> Result<Self> {
        let driver = opts.backend.driver();
        let target = select_target(driver, opts.target.as_deref())?;

        let profiles = load_profiles(config, config_dir)?;
        let profile_id = match opts.profile.as_deref().or(profiles.default_id()) {
            Some(id) => id.to_string(),
            None => String::new(),
        };
        let mut defines = split_list(opts.defines.as_deref().unwrap_or(""));
        defines.extend(driver.target_defines(&target));
        if !profile_id.is_empty() {
            let profile = profiles.get(&profile_id)?;
            defines.extend(profile.define_list().map(str::to_string));
        }

        let overrides = config.backends.get(opts.backend);
        let defaults = driver.defaults();
        let paths = PathResolver {
            base: config_dir,
            target: &target,
        };

        let proxy_dir = overrides
            .and_then(|o| o.proxy_dir.as_deref())
            .or(defaults.proxy_dir)
            .map(|dir| paths.one(dir));
        let exclude_files = match overrides.and_then(|o| o.exclude_files.as_ref()) {
            Some(table) => table.get(&target).cloned().unwrap_or_default(),
            None => driver.default_excluded_files(&target),
        };
        let swig = opts
            .swig
            .clone()
            .unwrap_or_else(|| config.swig.executable.clone());
        let dll_name = driver.dll_name(config.swig.dll_name.as_deref(), &target);

        let configured = |field: fn(&BackendConfig) -> Option<&str>| overrides.and_then(field);
        let source_dirs = configured(|o| o.source_dirs.as_deref()).unwrap_or(defaults.source_dirs);
        let cpp_dirs = configured(|o| o.cpp_dirs.as_deref()).unwrap_or(defaults.cpp_dirs);
        let swig_lib_dirs =
            configured(|o| o.swig_lib_dirs.as_deref()).unwrap_or(defaults.swig_lib_dirs);
        let wrapper_dir = configured(|o| o.wrapper_dir.as_deref()).unwrap_or(defaults.wrapper_dir);
        let module_dir = configured(|o| o.module_dir.as_deref()).unwrap_or(defaults.module_dir);

        Ok(RunSettings {
            backend: opts.backend,
            profile: profile_id,
            swig,
            dll_name,
            defines,
            source_dirs: paths.list(source_dirs),
            cpp_dirs: paths.list(cpp_dirs),
            swig_lib_dirs: paths.list(swig_lib_dirs),
            proxy_dir,
            wrapper_dir: paths.one(wrapper_dir),
            module_dir: paths.one(module_dir),
            exclude_files,
            target,
        })
    }

    pub fn driver(&self) -> &'static dyn BackendDriver {
        self.backend.driver()
    }
}

/// The configured profile table, or the built-in one.
pub fn load_profiles(config: &SwigppConfig, config_dir: &Path) -> Result<ProfileTable> {
    match &config.paths.profiles {
        Some(path) => ProfileTable::load(&config_dir.join(path)),
        None => Ok(ProfileTable::builtin()),
    }
}

fn select_target(driver: &dyn BackendDriver, requested: Option<&str>) -> Result<String> {
    let targets = driver.targets();
    match requested {
        Some(target) if targets.contains(&target) => Ok(target.to_string()),
        Some(target) => Err(SwigppError::UnsupportedTarget {
            backend: driver.backend().name(),
            target: target.to_string(),
        }),
        None => match targets {
            [only] => Ok(only.to_string()),
            _ => Err(SwigppError::MissingTarget {
                backend: driver.backend().name(),
                expected: targets.join(", "),
            }),
        },
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

struct PathResolver<'a> {
    base: &'a Path,
    target: &'a str,
}

impl PathResolver<'_> {
    fn one(&self, path: &str) -> PathBuf {
        self.base.join(path.replace(TARGET_TOKEN, self.target))
    }

    fn list(&self, paths: &str) -> Vec<PathBuf> {
        split_list(paths).iter().map(|p| self.one(p)).collect()
    }
}
