// Managed (C#) backend: properties, reflection-based polymorphic factory, capitalized methods.

use std::path::Path;

use super::{BackendDefaults, BackendDriver, SwigJob, code_typemaps, import_typemaps, split_import};
use crate::aggregate::ClassCodeTable;
use crate::backends::Backend;
use crate::directive::LangTag;
use crate::error::Result;
use crate::naming::{MethodCase, NamingConvention};
use crate::package::PackageStyle;
use crate::postprocess;
use crate::templates::{PolymorphicTemplates, Template, TemplateSet};
use crate::transform::FileContext;

pub struct CSharp;

const DEFAULT_DLL_NAME: &str = "carto_mobile_sdk";
const IOS_DLL_NAME: &str = "__Internal";

/// Modules whose iOS wrappers need Objective-C++.
const IOS_OBJCXX_MODULES: &[&str] = &["AssetUtils.i", "BitmapUtils.i"];

const TYPEMAP_IMPORTS: &[&str] = &[
    "using System;",
    "using System.Runtime.InteropServices;",
    "#if WINDOWS_PHONE",
    "using System.Reflection;",
    "#endif",
];

const CLASS_IMPORTS: &[&str] = &["using System;", "using System.Runtime.InteropServices;"];

static NAMING: NamingConvention = NamingConvention {
    method_case: MethodCase::Upper,
    extra_rules: &[r#"%rename("%(camelcase)s", sourcefmt="%(undercase)s", %$isenumitem) "";"#],
    skip_for_stl_wrappers: false,
};

static TEMPLATES: TemplateSet = TemplateSet {
    value_type: Some(Template::new(
        "csharp.value_type",
        r#"
%typemap(out) $CLASSNAME$ "*($&1_ltype*)&$result = new $1_ltype($1);"
%typemap(directorin) $CLASSNAME$ "*($&1_ltype*)&$input = new $1_ltype($1);"
%typemap(csdirectorin) $CLASSNAME$ "new $TYPE$($iminput, true)"
%typemap(csout, excode=SWIGEXCODE) $CLASSNAME$ { $TYPE$ ret = new $TYPE$($imcall, true); $excode; return ret; }
%typemap(csdirectorout) $CLASSNAME$ "$TYPE$.getCPtr($cscall).Handle"

%typemap(out) const $CLASSNAME$& "*($&1_ltype)&$result = new $*1_ltype(*$1);"
%typemap(directorin) const $CLASSNAME$& "*($&1_ltype)&$input = new $*1_ltype($1);"
%typemap(csdirectorin) const $CLASSNAME$& "new $TYPE$($iminput, true)"
%typemap(csout, excode=SWIGEXCODE) const $CLASSNAME$& { $TYPE$ ret = new $TYPE$($imcall, true); $excode; return ret; }
%typemap(csdirectorout) const $CLASSNAME$& "$TYPE$.getCPtr($cscall).Handle"
"#,
    )),
    shared_ptr: Some(Template::new(
        "csharp.shared_ptr",
        r#"
%shared_ptr($CLASSNAME$)
"#,
    )),
    shared_ptr_code: None,
    value_template: Some(Template::new(
        "csharp.value_template",
        r#"
  %template($TYPE$) $CLASSNAME$;
"#,
    )),
    enum_decl: None,
    standard_equals: Some(Template::new("csharp.standard_equals", "\n")),
    standard_equals_code: Some(Template::new(
        "csharp.standard_equals_code",
        r#"
  /// <summary>
  /// Checks if this object is equal to the specified object.
  /// </summary>
  /// <param name="obj">The reference object.</param>
  /// <returns>True when objects are equal, false otherwise.</returns>
  public override bool Equals(object obj) {
    if (obj is $csclassname) {
      return (($csclassname)obj).swigCPtr.Handle == swigCPtr.Handle;
    }
    return false;
  }

  /// <summary>
  /// Returns the hash value of this object.
  /// </summary>
  /// <returns>The hash value of this object.</returns>
  public override int GetHashCode() {
    return (int)swigCPtr.Handle;
  }
"#,
    )),
    custom_equals: Some(Template::new(
        "csharp.custom_equals",
        r#"
%csmethodmodifiers $CLASSNAME$::operator == "private";
%csmethodmodifiers $CLASSNAME$::hash "private";
%rename(EqualsInternal) $CLASSNAME$::operator ==;
%ignore $CLASSNAME$::operator !=;
%rename(GetHashCodeInternal) $CLASSNAME$::hash() const;
"#,
    )),
    custom_equals_code: Some(Template::new(
        "csharp.custom_equals_code",
        r#"
  /// <summary>
  /// Checks if this object is equal to the specified object.
  /// </summary>
  /// <param name="obj">The reference object.</param>
  /// <returns>True when objects are equal, false otherwise.</returns>
  public override bool Equals(object obj) {
    if (obj is $csclassname) {
      return EqualsInternal(($csclassname)obj);
    }
    return false;
  }

  /// <summary>
  /// Returns the hash value of this object.
  /// </summary>
  /// <returns>The hash value of this object.</returns>
  public override int GetHashCode() {
    return GetHashCodeInternal();
  }
"#,
    )),
    equals_interface: None,
    custom_tostring: Some(Template::new(
        "csharp.custom_tostring",
        r#"
%csmethodmodifiers $CLASSNAME$::toString "public override";
"#,
    )),
    ro_attribute: Some(Template::new(
        "csharp.ro_attribute",
        r#"
%csmethodmodifiers $CLASSNAME$::$GETTER$ "private";
%rename($GETTER$Internal) $CLASSNAME$::$GETTER$;
"#,
    )),
    ro_attribute_code: Some(Template::new(
        "csharp.ro_attribute_code",
        r#"
  /// <summary>
  /// The $TYPE$ property.
  /// </summary>
  $MODIFIER$ $NAMESPACE$.$TYPE$ $NAME$ {
    get { return $GETTER$Internal(); }
  }
"#,
    )),
    rw_attribute: Some(Template::new(
        "csharp.rw_attribute",
        r#"
%csmethodmodifiers $CLASSNAME$::$GETTER$ "private";
%rename($GETTER$Internal) $CLASSNAME$::$GETTER$;
%csmethodmodifiers $CLASSNAME$::$SETTER$ "private";
%rename($SETTER$Internal) $CLASSNAME$::$SETTER$;
"#,
    )),
    rw_attribute_code: Some(Template::new(
        "csharp.rw_attribute_code",
        r#"
  /// <summary>
  /// The $TYPE$ property.
  /// </summary>
  $MODIFIER$ $NAMESPACE$.$TYPE$ $NAME$ {
    get { return $GETTER$Internal(); }
    set { $SETTER$Internal(value); }
  }
"#,
    )),
    polymorphic: PolymorphicTemplates {
        prelude: Some(Template::new(
            "csharp.polymorphic.prelude",
            "%apply void *VOID_INT_PTR { void * }",
        )),
        registration: Some(Template::new(
            "csharp.polymorphic.registration",
            r#"static carto::ClassRegistry::Entry $TYPE$RegistryEntry(typeid(const $CLASSNAME$&), "$TYPE$");"#,
        )),
        class_name_accessor: Some(Template::new(
            "csharp.polymorphic.class_name_accessor",
            r#"  /**
   * Returns the actual class name of this object. This is used internally by the SDK.
   * @return The class name of this object.
   */
  std::string SwigGetClassName$TYPE$() const {
    std::string className = carto::ClassRegistry::GetClassName(typeid(*$self));
    if (className.empty()) {
      className = "$TYPE$";
    }
    return className;
  }"#,
        )),
        director_accessor: Some(Template::new(
            "csharp.polymorphic.director_accessor",
            r#"  /**
   * Returns the pointer to the connected director object. This is used internally by the SDK.
   * @return The pointer to the connected director object or null if director is not connected.
   */
  void* SwigGetDirectorObject$TYPE$() const {
    if (auto director = dynamic_cast<const carto::Director*>($self)) {
      return director->getDirectorObject();
    }
    return 0;
  }"#,
        )),
        proxy_typemaps: Some(Template::new(
            "csharp.polymorphic.proxy_typemaps",
            r#"
%typemap(csout, excode=SWIGEXCODE) std::shared_ptr<$CLASSNAME$>, const std::shared_ptr<$CLASSNAME$>&, std::shared_ptr<$CLASSNAME$>& {
  System.IntPtr cPtr = $imcall; $excode;
  if (cPtr == System.IntPtr.Zero) {
    return null;
  }
  return $NAMESPACE$.$TYPE$.SwigCreatePolymorphicInstance$TYPE$(cPtr, true);
}

%typemap(csdirectorin) std::shared_ptr<$CLASSNAME$>, const std::shared_ptr<$CLASSNAME$>&, std::shared_ptr<$CLASSNAME$>& %{
  $NAMESPACE$.$TYPE$.SwigCreatePolymorphicInstance$TYPE$($iminput, true)
%}
"#,
        )),
        proxy_factory: Some(Template::new(
            "csharp.polymorphic.proxy_factory",
            r#"
  /// <summary>
  /// Creates a polymorphic instance of the given native object. This is used internally by the SDK.
  /// </summary>
  /// <param name="cPtr">The native pointer of the instance.</param>
  /// <param name="cMemoryOwn">The ownership flag.</param>
  /// <returns>The created instance.</returns>
  public static $NAMESPACE$.$TYPE$ SwigCreatePolymorphicInstance$TYPE$(System.IntPtr cPtr, bool cMemoryOwn) {
    if (cPtr == System.IntPtr.Zero) {
      return null;
    }

    HandleRef handleRef = new HandleRef(null, cPtr);
    System.IntPtr directorPtr = $NAMESPACE$.$TYPE$ModulePINVOKE.$TYPE$_SwigGetDirectorObject$TYPE$(handleRef);
    if (directorPtr != System.IntPtr.Zero) {
      return ($TYPE$)GCHandle.FromIntPtr(directorPtr).Target;
    }

    string objClassName = $NAMESPACE$.$TYPE$ModulePINVOKE.$TYPE$_SwigGetClassName$TYPE$(handleRef);
    $NAMESPACE$.$TYPE$ objInstance = null;
    try {
      #if WINDOWS_PHONE
      objInstance = ($NAMESPACE$.$TYPE$) Activator.CreateInstance(
        typeof($NAMESPACE$.$TYPE$).GetTypeInfo().Assembly.GetType("$NAMESPACE$." + objClassName),
        new object[] { cPtr, cMemoryOwn }
      );
      #else
      objInstance = ($NAMESPACE$.$TYPE$) System.Reflection.Assembly.GetExecutingAssembly().CreateInstance(
        typeName:"$NAMESPACE$." + objClassName,
        ignoreCase:false,
        bindingAttr:System.Reflection.BindingFlags.Instance | System.Reflection.BindingFlags.Public | System.Reflection.BindingFlags.NonPublic,
        binder:null,
        args: new object[] { cPtr, cMemoryOwn },
        culture:null,
        activationAttributes:null
      );
      #endif
    } catch (System.Exception) { }
    if (objInstance == null) {
      Carto.Utils.Log.Error("Carto Mobile SDK: Could not instantiate class: " + objClassName);
    }
    return objInstance;
  }
"#,
        )),
        proxy_factory_interface: None,
    },
};

impl BackendDriver for CSharp {
    fn backend(&self) -> Backend {
        Backend::CSharp
    }

    fn tag(&self) -> LangTag {
        LangTag::Cs
    }

    fn templates(&self) -> &'static TemplateSet {
        &TEMPLATES
    }

    fn naming(&self) -> &'static NamingConvention {
        &NAMING
    }

    fn package_style(&self) -> PackageStyle {
        PackageStyle::Remapped
    }

    fn keeps_plain_attributes(&self) -> bool {
        true
    }

    fn format_imports(&self, tag: LangTag, names: &[String], _ctx: &FileContext<'_>) -> Vec<String> {
        names
            .iter()
            .map(|name| match tag {
                LangTag::Proxy => {
                    let (segments, _) = split_import(name);
                    if segments.is_empty() {
                        "using Carto;".to_string()
                    } else {
                        format!("using Carto.{};", PackageStyle::Remapped.dotted(segments))
                    }
                }
                _ => format!("using {name};"),
            })
            .collect()
    }

    fn render_imports(&self, table: &ClassCodeTable) -> Vec<String> {
        let mut lines = import_typemaps("csimports", TYPEMAP_IMPORTS, table);
        lines.push(String::new());
        lines.push("%pragma(csharp) imclassimports=%{".to_string());
        for (_, entry) in table.with_imports() {
            lines.extend(CLASS_IMPORTS.iter().map(|s| s.to_string()));
            lines.extend(entry.imports.iter().cloned());
        }
        lines.push("%}".to_string());
        lines
    }

    fn render_class_code(&self, table: &ClassCodeTable) -> Vec<String> {
        code_typemaps("cscode", table)
    }

    fn targets(&self) -> &'static [&'static str] {
        &["android", "ios", "winphone"]
    }

    fn defaults(&self) -> BackendDefaults {
        BackendDefaults {
            source_dirs: "../all/modules;../extensions/modules;../{target}/modules",
            cpp_dirs: "../all/native;../extensions/native;../{target}/native",
            proxy_dir: Some("../generated/{target}-csharp/proxies"),
            wrapper_dir: "../generated/{target}-csharp/wrappers",
            module_dir: "../generated/{target}-csharp/modules",
            swig_lib_dirs: "../scripts/swig/csharp;../scripts/swig",
        }
    }

    fn target_defines(&self, target: &str) -> Vec<String> {
        if target == "winphone" {
            vec!["WINDOWS_PHONE".to_string()]
        } else {
            Vec::new()
        }
    }

    fn dll_name(&self, configured: Option<&str>, target: &str) -> Option<String> {
        if target == "ios" {
            return Some(IOS_DLL_NAME.to_string());
        }
        Some(configured.unwrap_or(DEFAULT_DLL_NAME).to_string())
    }

    fn default_excluded_files(&self, target: &str) -> Vec<String> {
        if target == "android" {
            Vec::new()
        } else {
            vec!["AndroidUtils.i".to_string()]
        }
    }

    fn accepts_source_file(&self, file_name: &str) -> bool {
        file_name.ends_with(".i")
    }

    fn swig_lib_name(&self) -> &'static str {
        "csharp"
    }

    fn language_args(&self, job: &SwigJob<'_>) -> Vec<String> {
        let mut args = vec![
            "-c++".to_string(),
            "-csharp".to_string(),
            "-namespace".to_string(),
            format!("Carto.{}", job.package),
        ];
        if let Some(dll) = &job.settings.dll_name {
            args.push("-dllimport".to_string());
            args.push(dll.clone());
        }
        if let Some(proxy_dir) = &job.proxy_dir {
            args.push("-outdir".to_string());
            args.push(proxy_dir.display().to_string());
        }
        args.push("-o".to_string());
        args.push(job.wrapper.display().to_string());
        args.push("-doxygen".to_string());
        args
    }

    fn wrapper_extension(&self, file_name: &str, target: &str) -> &'static str {
        if target == "ios" && IOS_OBJCXX_MODULES.contains(&file_name) {
            ".mm"
        } else {
            ".cpp"
        }
    }

    fn post_process(&self, stem: &str, proxy_dir: Option<&Path>) -> Result<()> {
        if let Some(dir) = proxy_dir {
            postprocess::remove_generated(&dir.join(format!("{stem}Module.cs")))?;
        }
        Ok(())
    }
}
