// JVM backend: JNI descriptors, package-mirrored proxy directories, lower-camel methods.

use std::path::{Path, PathBuf};

use super::{BackendDefaults, BackendDriver, SwigJob, code_typemaps, import_typemaps, split_import};
use crate::aggregate::ClassCodeTable;
use crate::backends::Backend;
use crate::context::RunSettings;
use crate::directive::LangTag;
use crate::error::Result;
use crate::naming::{MethodCase, NamingConvention};
use crate::package::PackageStyle;
use crate::postprocess;
use crate::templates::{PolymorphicTemplates, Template, TemplateSet};
use crate::transform::FileContext;

pub struct Java;

/// Root package of every generated proxy class.
pub const ROOT_PACKAGE: &str = "com.carto";

pub(crate) static NAMING: NamingConvention = NamingConvention {
    method_case: MethodCase::Lower,
    extra_rules: &[],
    skip_for_stl_wrappers: true,
};

static TEMPLATES: TemplateSet = TemplateSet {
    value_type: Some(Template::new(
        "java.value_type",
        r#"
%typemap(out) $CLASSNAME$ "*($&1_ltype*)&$result = new $1_ltype($1);"
%typemap(directorin, descriptor="$DESCRIPTOR$") $CLASSNAME$ "*($&1_ltype*)&$input = new $1_ltype($1);"
%typemap(javadirectorin) $CLASSNAME$ "new $TYPE$($jniinput, true)"
%typemap(javaout) $CLASSNAME$ { return new $TYPE$($jnicall, true); }
%typemap(javadirectorout) $CLASSNAME$ "$TYPE$.getCPtr($javacall)"

%typemap(out) const $CLASSNAME$& "*($&1_ltype)&$result = new $*1_ltype(*$1);"
%typemap(directorin, descriptor="$DESCRIPTOR$") const $CLASSNAME$& "*($&1_ltype)&$input = new $*1_ltype($1);"
%typemap(javadirectorin) const $CLASSNAME$& "new $TYPE$($jniinput, true)"
%typemap(javaout) const $CLASSNAME$& { return new $TYPE$($jnicall, true); }
%typemap(javadirectorout) const $CLASSNAME$& "$TYPE$.getCPtr($javacall)"
"#,
    )),
    shared_ptr: Some(Template::new(
        "java.shared_ptr",
        r#"
%shared_ptr($CLASSNAME$)

%typemap(directorin, descriptor="$DESCRIPTOR$") std::shared_ptr< $CLASSNAME$ > "*($&1_ltype*)&$input = new $1_ltype(*$1);"
%typemap(directorin, descriptor="$DESCRIPTOR$") std::shared_ptr< $CLASSNAME$ >& "*($&1_ltype)&$input = new $*1_ltype($1);"
"#,
    )),
    shared_ptr_code: None,
    value_template: Some(Template::new(
        "java.value_template",
        r#"
  %template($TYPE$) $CLASSNAME$;
"#,
    )),
    enum_decl: None,
    standard_equals: Some(Template::new("java.standard_equals", "\n")),
    standard_equals_code: Some(Template::new(
        "java.standard_equals_code",
        r#"
  /**
   * Checks if this object is equal to the specified object.
   * @param obj The reference object.
   * @return True when objects are equal, false otherwise.
   */
  public boolean equals(Object obj) {
    if (obj instanceof $javaclassname) {
      return (($javaclassname)obj).swigCPtr == swigCPtr;
    }
    return false;
  }

  /**
   * Returns the hash value of this object.
   * @return The hash value of this object.
   */
  public int hashCode() {
    return (int)swigCPtr;
  }
"#,
    )),
    custom_equals: Some(Template::new(
        "java.custom_equals",
        r#"
%javamethodmodifiers $CLASSNAME$::operator == "private";
%javamethodmodifiers $CLASSNAME$::hash "private";
%rename(equalsInternal) $CLASSNAME$::operator ==;
%ignore $CLASSNAME$::operator !=;
%rename(hashCodeInternal) $CLASSNAME$::hash() const;
"#,
    )),
    custom_equals_code: Some(Template::new(
        "java.custom_equals_code",
        r#"
  /**
   * Checks if this object is equal to the specified object.
   * @param obj The reference object.
   * @return True when objects are equal, false otherwise.
   */
  public boolean equals(Object obj) {
    if (obj instanceof $javaclassname) {
      return equalsInternal(($javaclassname)obj);
    }
    return false;
  }

  /**
   * Returns the hash value of this object.
   * @return The hash value of this object.
   */
  public int hashCode() {
    return hashCodeInternal();
  }
"#,
    )),
    equals_interface: None,
    custom_tostring: None,
    ro_attribute: None,
    ro_attribute_code: None,
    rw_attribute: None,
    rw_attribute_code: None,
    polymorphic: PolymorphicTemplates {
        prelude: None,
        registration: Some(Template::new(
            "java.polymorphic.registration",
            r#"static carto::ClassRegistry::Entry $TYPE$RegistryEntry(typeid(const $CLASSNAME$&), "$TYPE$");"#,
        )),
        class_name_accessor: Some(Template::new(
            "java.polymorphic.class_name_accessor",
            r#"  /**
    * Returns the actual class name of this object. This is used internally by the SDK.
    * @return The class name of this object.
    */
  std::string swigGetClassName() const {
    std::string className = carto::ClassRegistry::GetClassName(typeid(*$self));
    if (className.empty()) {
      className = "$TYPE$";
    }
    return className;
  }"#,
        )),
        director_accessor: Some(Template::new(
            "java.polymorphic.director_accessor",
            r#"  /**
    * Returns the connected director object. This is used internally by the SDK.
    * @return The connected director object or null if director is not connected.
    */
  jobject swigGetDirectorObject() const {
    if (auto director = dynamic_cast<const carto::Director*>($self)) {
      return static_cast<jobject>(director->getDirectorObject());
    }
    return 0;
  }"#,
        )),
        proxy_typemaps: Some(Template::new(
            "java.polymorphic.proxy_typemaps",
            r#"
%typemap(javaout) std::shared_ptr<$CLASSNAME$>, const std::shared_ptr<$CLASSNAME$>&, std::shared_ptr<$CLASSNAME$>& {
  long cPtr = $jnicall;
  if (cPtr == 0) {
    return null;
  }
  return $PACKAGE$.$TYPE$.swigCreatePolymorphicInstance(cPtr, true);
}

%typemap(javadirectorin) std::shared_ptr<$CLASSNAME$>, const std::shared_ptr<$CLASSNAME$>&, std::shared_ptr<$CLASSNAME$>& %{
  $PACKAGE$.$TYPE$.swigCreatePolymorphicInstance($jniinput, true)
%}
"#,
        )),
        proxy_factory: Some(Template::new(
            "java.polymorphic.proxy_factory",
            r#"
  /**
   * Creates a polymorphic instance of the given native object. This is used internally by the SDK.
   * @param cPtr The native pointer of the instance.
   * @param cMemoryOwn The ownership flag.
   * @return The created instance.
   */
  public static $PACKAGE$.$TYPE$ swigCreatePolymorphicInstance(long cPtr, boolean cMemoryOwn) {
    if (cPtr == 0) {
      return null;
    }

    Object director = $PACKAGE$.$TYPE$ModuleJNI.$TYPE$_swigGetDirectorObject(cPtr, null);
    if (director != null) {
      return ($PACKAGE$.$TYPE$) director;
    }

    String objClassName = $PACKAGE$.$TYPE$ModuleJNI.$TYPE$_swigGetClassName(cPtr, null);
    $PACKAGE$.$TYPE$ objInstance = null;
    try {
      Class<?> objClass = Class.forName("$PACKAGE$." + objClassName);
      Class<?>[] argTypes = new Class<?>[] {long.class, boolean.class};
      Object[] args = new Object[] {cPtr, cMemoryOwn};
      java.lang.reflect.Constructor<?> constructor = objClass.getDeclaredConstructor(argTypes);
      objInstance = ($PACKAGE$.$TYPE$) constructor.newInstance(args);
    } catch (Exception e) {
      com.carto.utils.Log.error("Carto Mobile SDK: Could not instantiate class: " + objClassName + " error: " + e.getMessage());
    }
    return objInstance;
  }
"#,
        )),
        proxy_factory_interface: None,
    },
};

/// `import com.carto.a.B;` for a dotted proxy name. Shared with the JS backend.
pub(crate) fn proxy_import(name: &str) -> String {
    let (segments, leaf) = split_import(name);
    if segments.is_empty() {
        format!("import {ROOT_PACKAGE}.{leaf};")
    } else {
        format!("import {ROOT_PACKAGE}.{}.{leaf};", PackageStyle::Lowercase.dotted(segments))
    }
}

/// `javaimports` typemaps plus the JNI class import pragma.
pub(crate) fn render_jvm_imports(table: &ClassCodeTable) -> Vec<String> {
    let mut lines = import_typemaps("javaimports", &[], table);
    lines.push(String::new());
    lines.push("%pragma(java) jniclassimports=%{".to_string());
    for (_, entry) in table.with_imports() {
        lines.extend(entry.imports.iter().cloned());
    }
    lines.push("%}".to_string());
    lines
}

impl BackendDriver for Java {
    fn backend(&self) -> Backend {
        Backend::Java
    }

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

    fn include_prelude(&self) -> &'static [&'static str] {
        &[r#"%include "enums.swg""#]
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

    fn render_class_code(&self, table: &ClassCodeTable) -> Vec<String> {
        code_typemaps("javacode", table)
    }

    fn targets(&self) -> &'static [&'static str] {
        &["android"]
    }

    fn defaults(&self) -> BackendDefaults {
        BackendDefaults {
            source_dirs: "../all/modules;../extensions/all/modules;../android/modules",
            cpp_dirs: "../all/native;../extensions/all/native;../android/native",
            proxy_dir: Some("../generated/android-java/proxies"),
            wrapper_dir: "../generated/android-java/wrappers",
            module_dir: "../generated/android-java/modules",
            swig_lib_dirs: "../scripts/swig/java;../scripts/swig",
        }
    }

    fn swig_lib_name(&self) -> &'static str {
        "java"
    }

    fn language_args(&self, job: &SwigJob<'_>) -> Vec<String> {
        let mut args = vec![
            "-c++".to_string(),
            "-java".to_string(),
            "-package".to_string(),
            format!("{ROOT_PACKAGE}.{}", job.package),
        ];
        if let Some(proxy_dir) = &job.proxy_dir {
            args.push("-outdir".to_string());
            args.push(proxy_dir.display().to_string());
        }
        args.push("-o".to_string());
        args.push(job.wrapper.display().to_string());
        args.push("-doxygen".to_string());
        args
    }

    /// Proxies land in `<proxy_dir>/com/carto/<package path>`.
    fn proxy_dir(&self, settings: &RunSettings, package: &str) -> Option<PathBuf> {
        let base = settings.proxy_dir.as_ref()?;
        let qualified = format!("{ROOT_PACKAGE}.{package}");
        Some(qualified.split('.').fold(base.clone(), |dir, segment| dir.join(segment)))
    }

    fn post_process(&self, stem: &str, proxy_dir: Option<&Path>) -> Result<()> {
        if let Some(dir) = proxy_dir {
            postprocess::remove_generated(&dir.join(format!("{stem}Module.java")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_imports_are_fully_qualified() {
        let ctx = FileContext::new(&Java, "core", &[]);
        let imports = Java.format_imports(
            LangTag::Proxy,
            &["vectorelements.Marker".to_string(), "MapPos".to_string()],
            &ctx,
        );
        assert_eq!(
            imports,
            vec!["import com.carto.vectorelements.Marker;", "import com.carto.MapPos;"]
        );
    }

    #[test]
    fn jvm_imports_render_typemaps_and_pragma() {
        let mut table = ClassCodeTable::new();
        table.add_imports("carto::Layer", vec!["import java.util.List;".to_string()]);
        let lines = Java.render_imports(&table);
        assert_eq!(
            lines,
            vec![
                "%typemap(javaimports) carto::Layer %{",
                "import java.util.List;",
                "%}",
                "",
                "%pragma(java) jniclassimports=%{",
                "import java.util.List;",
                "%}",
            ]
        );
    }

    #[test]
    fn enums_prelude_precedes_includes() {
        assert_eq!(Java.include_prelude(), &["%include \"enums.swg\""]);
    }
}
