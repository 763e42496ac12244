// swigpp-codegen: rewrites extended SWIG interface trees into per-backend SWIG modules and drives swig over them.

pub mod error;
pub mod diagnostics;
pub mod directive;
pub mod decomment;
pub mod classify;
pub mod templates;
pub mod instantiate;
pub mod aggregate;
pub mod emit;
pub mod naming;
pub mod package;
pub mod polymorphic;
pub mod transform;
pub mod backends;
pub mod config;
pub mod profile;
pub mod context;
pub mod swig;
pub mod postprocess;

use std::path::Path;

use crate::backends::SwigJob;
use crate::context::RunSettings;
use crate::error::{Result, SwigppError};
use crate::package::{PackageNode, scan_packages};
use crate::swig::SwigInvocation;
use crate::transform::FileContext;

pub use crate::backends::Backend;

/// Counts reported at the end of a phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary {
    pub packages: usize,
    pub files: usize,
    pub skipped: usize,
}

/// Remove the wrapper, module and proxy output directories.
pub fn clean_outputs(settings: &RunSettings) -> Result<()> {
    postprocess::clear_dir(&settings.wrapper_dir)?;
    clean_modules(settings)?;
    if let Some(proxy_dir) = &settings.proxy_dir {
        postprocess::clear_dir(proxy_dir)?;
    }
    Ok(())
}

/// Remove only the rewritten interface tree.
pub fn clean_modules(settings: &RunSettings) -> Result<()> {
    postprocess::clear_dir(&settings.module_dir)
}

/// Rewrite every package directory of every source dir into the module dir.
/// Missing source dirs are skipped with a warning.
pub fn run_transform(settings: &RunSettings) -> Result<PhaseSummary> {
    let driver = settings.driver();
    let mut summary = PhaseSummary::default();
    tracing::info!(backend = %settings.backend, target = %settings.target, "transforming interface files");

    for source_root in &settings.source_dirs {
        if !source_root.is_dir() {
            crate::diag_warn!(dir = %source_root.display(), "source directory not found, skipping");
            continue;
        }
        for package in scan_packages(source_root, driver.package_style())? {
            package.visit_post_order(&mut |node: &PackageNode| {
                summary.packages += 1;
                for file in &node.files {
                    if !driver.accepts_source_file(file) || settings.exclude_files.contains(file) {
                        tracing::debug!(file = %file, package = %node.exposed_package, "not transformed");
                        summary.skipped += 1;
                        continue;
                    }
                    let source = source_root.join(&node.relative_path).join(file);
                    let out = settings.module_dir.join(&node.relative_path).join(file);
                    let ctx =
                        FileContext::new(driver, &node.exposed_package, &settings.source_dirs);
                    transform::transform_file(&source, &out, ctx)?;
                    summary.files += 1;
                }
                Ok(())
            })?;
        }
    }

    tracing::info!(
        packages = summary.packages,
        files = summary.files,
        skipped = summary.skipped,
        "transform complete"
    );
    Ok(summary)
}

/// Run swig over every transformed module and post-process its outputs.
/// Stops at the first failing file.
pub fn run_build(settings: &RunSettings) -> Result<PhaseSummary> {
    let driver = settings.driver();
    let mut summary = PhaseSummary::default();
    tracing::info!(backend = %settings.backend, target = %settings.target, "running swig");

    if !settings.module_dir.is_dir() {
        crate::diag_warn!(dir = %settings.module_dir.display(), "module directory not found, nothing to build");
        return Ok(summary);
    }
    create_dir(&settings.wrapper_dir)?;

    for package in scan_packages(&settings.module_dir, driver.package_style())? {
        package.visit_post_order(&mut |node: &PackageNode| {
            summary.packages += 1;
            for file in &node.files {
                if driver.skips_at_build(file) {
                    tracing::debug!(file = %file, "not compiled");
                    summary.skipped += 1;
                    continue;
                }
                build_file(settings, node, file)?;
                summary.files += 1;
            }
            Ok(())
        })?;
    }

    tracing::info!(packages = summary.packages, files = summary.files, "swig complete");
    Ok(summary)
}

fn build_file(settings: &RunSettings, node: &PackageNode, file: &str) -> Result<()> {
    let driver = settings.driver();
    let stem = file.split('.').next().unwrap_or(file);
    let source = settings.module_dir.join(&node.relative_path).join(file);
    let wrapper = settings.wrapper_dir.join(format!(
        "{stem}_wrap{}",
        driver.wrapper_extension(file, &settings.target)
    ));
    let proxy_dir = driver.proxy_dir(settings, &node.exposed_package);
    if let Some(dir) = &proxy_dir {
        create_dir(dir)?;
    }

    let job = SwigJob {
        settings,
        package: &node.exposed_package,
        source: &source,
        wrapper,
        proxy_dir,
    };
    tracing::debug!(file = %source.display(), package = %node.exposed_package, "compiling module");
    SwigInvocation::from_job(&job).run()?;
    driver.post_process(stem, job.proxy_dir.as_deref())
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(SwigppError::io(dir))
}
