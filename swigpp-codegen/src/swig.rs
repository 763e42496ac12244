// External interface compiler invocation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::backends::SwigJob;
use crate::error::{Result, SwigppError};

/// One fully assembled interface compiler command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwigInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// Module file being compiled, for error reporting.
    pub file: PathBuf,
}

impl SwigInvocation {
    /// Language arguments, defines, include path, then the module file.
    pub fn from_job(job: &SwigJob<'_>) -> Self {
        let settings = job.settings;
        let driver = settings.driver();
        let mut args = driver.language_args(job);
        args.extend(settings.defines.iter().map(|d| format!("-D{d}")));

        let mut include = |dir: &PathBuf| args.push(format!("-I{}", dir.display()));
        settings.swig_lib_dirs.iter().for_each(|d| include(d));
        include(&settings.module_dir);
        settings.source_dirs.iter().for_each(|d| include(d));
        include(&settings.wrapper_dir);
        settings.cpp_dirs.iter().for_each(|d| include(d));

        // A swig given by path carries its own Lib directory next to it.
        if let Some(swig_dir) = Path::new(&settings.swig)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            let lib = swig_dir.join("Lib");
            include(&lib.join(driver.swig_lib_name()));
            include(&lib);
        }

        args.push(job.source.display().to_string());
        SwigInvocation {
            program: settings.swig.clone(),
            args,
            file: job.source.to_path_buf(),
        }
    }

    /// Shell-like rendering for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion. Any non-zero exit is fatal.
    pub fn run(&self) -> Result<()> {
        tracing::debug!(command = %self.command_line(), "running swig");
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| SwigppError::SwigSpawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            tracing::error!(file = %self.file.display(), ?status, "swig failed");
            return Err(SwigppError::SwigFailed {
                file: self.file.clone(),
                code: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Backend;
    use crate::config::SwigppConfig;
    use crate::context::{RunOptions, RunSettings};

    fn settings(backend: Backend, target: &str, swig: &str) -> RunSettings {
        let opts = RunOptions {
            target: Some(target.to_string()),
            defines: Some("_CARTO_OFFLINE_SUPPORT".to_string()),
            swig: Some(swig.to_string()),
            ..RunOptions::new(backend)
        };
        RunSettings::resolve(&SwigppConfig::default(), Path::new("s"), &opts).unwrap()
    }

    #[test]
    fn csharp_arguments_in_order() {
        let settings = settings(Backend::CSharp, "android", "swig");
        let source = PathBuf::from("s/../generated/android-csharp/modules/core/MapPos.i");
        let job = SwigJob {
            settings: &settings,
            package: "Core",
            source: &source,
            wrapper: PathBuf::from("w/core/MapPos_wrap.cpp"),
            proxy_dir: Some(PathBuf::from("p")),
        };
        let invocation = SwigInvocation::from_job(&job);
        assert_eq!(invocation.program, "swig");
        assert_eq!(
            &invocation.args[..12],
            &[
                "-c++",
                "-csharp",
                "-namespace",
                "Carto.Core",
                "-dllimport",
                "carto_mobile_sdk",
                "-outdir",
                "p",
                "-o",
                "w/core/MapPos_wrap.cpp",
                "-doxygen",
                "-D_CARTO_OFFLINE_SUPPORT",
            ]
        );
        assert_eq!(invocation.args[12], "-Is/../scripts/swig/csharp");
        assert_eq!(invocation.args[14], "-Is/../generated/android-csharp/modules");
        assert_eq!(invocation.args.last().map(String::as_str), source.to_str());
        assert!(!invocation.args.iter().any(|a| a.ends_with("/Lib")));
        assert_eq!(invocation.file, source);
    }

    #[test]
    fn swig_path_adds_its_lib_dirs() {
        let settings = settings(Backend::Objc, "ios", "/opt/swig/bin/swig");
        let source = PathBuf::from("m/ui/MapView.i");
        let job = SwigJob {
            settings: &settings,
            package: "ui",
            source: &source,
            wrapper: PathBuf::from("w/ui/MapView_wrap.mm"),
            proxy_dir: None,
        };
        let invocation = SwigInvocation::from_job(&job);
        let n = invocation.args.len();
        assert_eq!(invocation.args[n - 3], "-I/opt/swig/bin/Lib/objc");
        assert_eq!(invocation.args[n - 2], "-I/opt/swig/bin/Lib");
        assert!(invocation.command_line().starts_with("/opt/swig/bin/swig -c++ -doxygen -objc -o"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let invocation = SwigInvocation {
            program: "swigpp-definitely-not-installed".to_string(),
            args: vec![],
            file: PathBuf::from("core/MapPos.i"),
        };
        assert!(matches!(invocation.run(), Err(SwigppError::SwigSpawn { .. })));
    }
}
