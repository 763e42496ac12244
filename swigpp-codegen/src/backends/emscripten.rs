// JS-embedding backend: feature flags instead of proxy code, JVM-style imports and naming.

use std::path::Path;

use super::java::{NAMING, proxy_import, render_jvm_imports};
use super::{BackendDefaults, BackendDriver, SwigJob};
use crate::aggregate::ClassCodeTable;
use crate::backends::Backend;
use crate::directive::LangTag;
use crate::error::Result;
use crate::naming::NamingConvention;
use crate::package::PackageStyle;
use crate::templates::{PolymorphicTemplates, Template, TemplateSet};
use crate::transform::FileContext;

pub struct Emscripten;

/// Modules that are transformed but never compiled for the web.
const BUILD_SKIPPED: &[&str] = &["BaseMapView.i"];

static TEMPLATES: TemplateSet = TemplateSet {
    value_type: Some(Template::new("emscripten.value_type", "\n")),
    shared_ptr: Some(Template::new("emscripten.shared_ptr", "\n")),
    shared_ptr_code: Some(Template::new(
        "emscripten.shared_ptr_code",
        r#"
%feature("shared_ptr");
"#,
    )),
    value_template: Some(Template::new(
        "emscripten.value_template",
        r#"
  %template($TYPE$) $CLASSNAME$;
"#,
    )),
    enum_decl: Some(Template::new("emscripten.enum", "\n")),
    standard_equals: Some(Template::new("emscripten.standard_equals", "\n")),
    standard_equals_code: Some(Template::new("emscripten.standard_equals_code", "\n")),
    custom_equals: Some(Template::new("emscripten.custom_equals", "\n")),
    custom_equals_code: Some(Template::new("emscripten.custom_equals_code", "\n")),
    equals_interface: None,
    custom_tostring: None,
    ro_attribute: None,
    ro_attribute_code: None,
    rw_attribute: None,
    rw_attribute_code: None,
    polymorphic: PolymorphicTemplates {
        prelude: None,
        registration: Some(Template::new(
            "emscripten.polymorphic.registration",
            r#"static carto::ClassRegistry::Entry $TYPE$RegistryEntry(typeid(const $CLASSNAME$&), "$TYPE$");"#,
        )),
        class_name_accessor: Some(Template::new(
            "emscripten.polymorphic.class_name_accessor",
            r#"  std::string swigGetClassName() const {
    std::string className = carto::ClassRegistry::GetClassName(typeid(*$self));
    if (className.empty()) {
      className = "$TYPE$";
    }
    return className;
  }"#,
        )),
        director_accessor: Some(Template::new(
            "emscripten.polymorphic.director_accessor",
            r#"  void* swigGetDirectorObject() const {
    if (auto director = dynamic_cast<const carto::Director*>($self)) {
      return director->getDirectorObject();
    }
    return 0;
  }"#,
        )),
        proxy_typemaps: None,
        proxy_factory: Some(Template::new(
            "emscripten.polymorphic.proxy_factory",
            r#"%feature("polymorphic_shared_ptr");
"#,
        )),
        proxy_factory_interface: None,
    },
};

impl BackendDriver for Emscripten {
    fn backend(&self) -> Backend {
        Backend::Emscripten
    }

    /// Shares the JVM tag: `!java_rename` and `%javamethodmodifiers` apply here too.
    fn tag(&self) -> LangTag {
        LangTag::Java
    }

    fn templates(&self) -> &'static TemplateSet {
        &TEMPLATES
    }

    fn naming(&self) -> &'static NamingConvention {
        &NAMING
    }

    fn package_style(&self) -> PackageStyle {
        PackageStyle::Lowercase
    }

    fn format_imports(&self, tag: LangTag, names: &[String], _ctx: &FileContext<'_>) -> Vec<String> {
        names
            .iter()
            .map(|name| match tag {
                LangTag::Proxy => proxy_import(name),
                _ => format!("import {name};"),
            })
            .collect()
    }

    fn render_imports(&self, table: &ClassCodeTable) -> Vec<String> {
        render_jvm_imports(table)
    }

    /// Feature lines are emitted bare, without a per-class typemap.
    fn render_class_code(&self, table: &ClassCodeTable) -> Vec<String> {
        table
            .with_code()
            .flat_map(|(_, entry)| entry.code.iter().cloned())
            .collect()
    }

    fn targets(&self) -> &'static [&'static str] {
        &["emscripten"]
    }

    fn defaults(&self) -> BackendDefaults {
        BackendDefaults {
            source_dirs: "../all/modules;../emscripten/modules",
            cpp_dirs: "../all/native;../emscripten/native",
            proxy_dir: None,
            wrapper_dir: "../generated/emscripten-js/wrappers",
            module_dir: "../generated/emscripten-js/modules",
            swig_lib_dirs: "../scripts/swig/java;../scripts/swig",
        }
    }

    fn skips_at_build(&self, file_name: &str) -> bool {
        BUILD_SKIPPED.contains(&file_name)
    }

    fn swig_lib_name(&self) -> &'static str {
        "emscripten"
    }

    fn language_args(&self, job: &SwigJob<'_>) -> Vec<String> {
        vec![
            "-c++".to_string(),
            "-emscripten".to_string(),
            "-o".to_string(),
            job.wrapper.display().to_string(),
        ]
    }

    fn post_process(&self, _stem: &str, _proxy_dir: Option<&Path>) -> Result<()> {
        Ok(())
    }
}
