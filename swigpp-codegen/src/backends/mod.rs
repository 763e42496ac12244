// Backend drivers: per-language templates, import/code rendering and swig invocation details.

pub mod csharp;
pub mod emscripten;
pub mod java;
pub mod objc;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::aggregate::ClassCodeTable;
use crate::context::RunSettings;
use crate::directive::{ExposedName, LangTag};
use crate::error::Result;
use crate::naming::NamingConvention;
use crate::package::PackageStyle;
use crate::templates::TemplateSet;
use crate::transform::FileContext;

/// The four consumer-language backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    CSharp,
    Java,
    Objc,
    Emscripten,
}

impl Backend {
    pub const ALL: [Backend; 4] = [Backend::CSharp, Backend::Java, Backend::Objc, Backend::Emscripten];

    pub fn name(self) -> &'static str {
        match self {
            Backend::CSharp => "csharp",
            Backend::Java => "java",
            Backend::Objc => "objc",
            Backend::Emscripten => "emscripten",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Backend::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn driver(self) -> &'static dyn BackendDriver {
        match self {
            Backend::CSharp => &csharp::CSharp,
            Backend::Java => &java::Java,
            Backend::Objc => &objc::Objc,
            Backend::Emscripten => &emscripten::Emscripten,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in directory defaults of a backend. Lists are semicolon-joined and may contain
/// the `{target}` token.
#[derive(Debug, Clone, Copy)]
pub struct BackendDefaults {
    pub source_dirs: &'static str,
    pub cpp_dirs: &'static str,
    pub proxy_dir: Option<&'static str>,
    pub wrapper_dir: &'static str,
    pub module_dir: &'static str,
    pub swig_lib_dirs: &'static str,
}

/// One interface compiler run: everything a backend needs to build its argument list.
#[derive(Debug)]
pub struct SwigJob<'a> {
    pub settings: &'a RunSettings,
    /// Exposed package of the module directory the file lives in.
    pub package: &'a str,
    pub source: &'a Path,
    pub wrapper: PathBuf,
    pub proxy_dir: Option<PathBuf>,
}

/// Everything that differs between backends.
pub trait BackendDriver: Sync {
    fn backend(&self) -> Backend;

    /// Language tag selecting this backend's scoped directives.
    fn tag(&self) -> LangTag;

    fn templates(&self) -> &'static TemplateSet;

    fn naming(&self) -> &'static NamingConvention;

    fn package_style(&self) -> PackageStyle;

    /// Whether `%module NAME` becomes `%module NAMEModule`.
    fn renames_module(&self) -> bool {
        true
    }

    /// Whether plain attribute lines survive (only for languages with properties).
    fn keeps_plain_attributes(&self) -> bool {
        false
    }

    /// Lines emitted once, right before the first include.
    fn include_prelude(&self) -> &'static [&'static str] {
        &[]
    }

    /// Proxy class name used as `$TYPE$`.
    fn proxy_type(&self, exposed: &ExposedName) -> String {
        exposed.leaf().to_string()
    }

    /// Import lines for an imports directive. `tag` is either `Proxy` or this backend's tag.
    fn format_imports(&self, tag: LangTag, names: &[String], ctx: &FileContext<'_>) -> Vec<String>;

    /// Block spliced at the imports marker.
    fn render_imports(&self, table: &ClassCodeTable) -> Vec<String>;

    /// Block spliced at the class-code marker.
    fn render_class_code(&self, table: &ClassCodeTable) -> Vec<String>;

    /// Supported target platforms. A single entry is the default target.
    fn targets(&self) -> &'static [&'static str];

    fn defaults(&self) -> BackendDefaults;

    /// Defines implied by the target platform.
    fn target_defines(&self, _target: &str) -> Vec<String> {
        Vec::new()
    }

    /// Native library name passed to the interface compiler, if the backend needs one.
    fn dll_name(&self, _configured: Option<&str>, _target: &str) -> Option<String> {
        None
    }

    /// Source files not processed for `target` unless the configuration says otherwise.
    fn default_excluded_files(&self, _target: &str) -> Vec<String> {
        Vec::new()
    }

    /// Whether a file of a package directory is transformed at all.
    fn accepts_source_file(&self, _file_name: &str) -> bool {
        true
    }

    /// Transformed modules that are never compiled.
    fn skips_at_build(&self, _file_name: &str) -> bool {
        false
    }

    /// Subdirectory of the interface compiler's `Lib` directory for this language.
    fn swig_lib_name(&self) -> &'static str;

    /// Language-specific leading arguments (language selector, outputs, namespace).
    fn language_args(&self, job: &SwigJob<'_>) -> Vec<String>;

    /// Proxy output directory for files of `package`.
    fn proxy_dir(&self, settings: &RunSettings, _package: &str) -> Option<PathBuf> {
        settings.proxy_dir.clone()
    }

    /// Wrapper file extension (with dot) for a module file.
    fn wrapper_extension(&self, _file_name: &str, _target: &str) -> &'static str {
        ".cpp"
    }

    /// Cleanup after a successful run on the module `stem`.
    fn post_process(&self, stem: &str, proxy_dir: Option<&Path>) -> Result<()>;
}

/// Split a dotted import into its package segments and leaf.
pub(crate) fn split_import(name: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = name.split('.').collect();
    let leaf = segments.pop().unwrap_or(name);
    (segments, leaf)
}

/// `%typemap(KIND) CLASS %{ ... %}` blocks, one per class with imports.
pub(crate) fn import_typemaps(kind: &str, prefix: &[&str], table: &ClassCodeTable) -> Vec<String> {
    let mut lines = Vec::new();
    for (class_name, entry) in table.with_imports() {
        lines.push(format!("%typemap({kind}) {class_name} %{{"));
        lines.extend(prefix.iter().map(|s| s.to_string()));
        lines.extend(entry.imports.iter().cloned());
        lines.push("%}".to_string());
    }
    lines
}

/// `%typemap(KIND) CLASS %{ code %}` blocks, one per class with code.
pub(crate) fn code_typemaps(kind: &str, table: &ClassCodeTable) -> Vec<String> {
    let mut lines = Vec::new();
    for (class_name, entry) in table.with_code() {
        lines.push(format!("%typemap({kind}) {class_name} %{{"));
        lines.extend(entry.code.iter().cloned());
        lines.push("%}".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instantiate::{TemplateArgs, expand_text};

    fn full_args() -> TemplateArgs {
        TemplateArgs::new()
            .with("CLASSNAME", "carto::Layer")
            .with("TYPE", "Layer")
            .with("RAWTYPE", "Layer")
            .with("NAMESPACE", "Carto.Layers")
            .with("PACKAGE", "com.carto.layers")
            .with("DESCRIPTOR", "Lcom/carto/layers/Layer;")
            .with("NAME", "Visible")
            .with("GETTER", "isVisible")
            .with("SETTER", "setVisible")
            .with("MODIFIER", "public")
            .with("ENUMNAME", "LayerMode")
    }

    #[test]
    fn every_template_of_every_backend_resolves() {
        let args = full_args();
        for backend in Backend::ALL {
            for template in backend.driver().templates().all() {
                let text = expand_text(template, &args)
                    .unwrap_or_else(|e| panic!("{backend}: {e}"));
                assert!(
                    !text.contains("$CLASSNAME$") && !text.contains("$TYPE$"),
                    "{}: placeholder survived",
                    template.name
                );
            }
        }
    }

    #[test]
    fn template_names_carry_backend_prefix() {
        for backend in Backend::ALL {
            for template in backend.driver().templates().all() {
                assert!(
                    template.name.starts_with(backend.name()),
                    "{} in {backend}",
                    template.name
                );
            }
        }
    }

    #[test]
    fn backend_names_round_trip() {
        for backend in Backend::ALL {
            assert_eq!(Backend::parse(backend.name()), Some(backend));
            assert_eq!(backend.driver().backend(), backend);
        }
        assert_eq!(Backend::parse("python"), None);
    }

    #[test]
    fn every_backend_has_a_default_or_required_target() {
        for backend in Backend::ALL {
            assert!(!backend.driver().targets().is_empty());
        }
        assert_eq!(Backend::CSharp.driver().targets().len(), 3);
    }

    #[test]
    fn split_import_separates_leaf() {
        assert_eq!(split_import("core.MapPos"), (vec!["core"], "MapPos"));
        assert_eq!(split_import("MapPos"), (vec![], "MapPos"));
    }
}
