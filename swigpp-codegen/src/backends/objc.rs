// Objective-C backend: NT-prefixed classes, split interface/implementation code sections.

use std::path::Path;

use super::{BackendDefaults, BackendDriver, SwigJob, split_import};
use crate::aggregate::ClassCodeTable;
use crate::backends::Backend;
use crate::directive::{ExposedName, LangTag};
use crate::error::Result;
use crate::naming::{MethodCase, NamingConvention};
use crate::package::PackageStyle;
use crate::postprocess;
use crate::templates::{PolymorphicTemplates, Template, TemplateSet};
use crate::transform::FileContext;

pub struct Objc;

/// Prefix of every exposed class, enum and enum item.
pub const CLASS_PREFIX: &str = "NT";

const POINTER_DECLS: &[&str] = &[
    "-(void*)getCptr;",
    "-(id)initWithCptr: (void*)cptr swigOwnCObject: (BOOL)ownCObject;",
];

const GET_CPTR_IMPL: &[&str] = &["-(void*)getCptr {", "  return swigCPtr;", "}"];

const BASE_INIT_IMPL: &[&str] = &[
    "-(id)initWithCptr: (void*)cptr swigOwnCObject: (BOOL)ownCObject {",
    "  swigCPtr = cptr;",
    "  swigCMemOwn = ownCObject;",
    "  self = [super init];",
    "  return self;",
    "}",
];

const DERIVED_INIT_IMPL: &[&str] = &[
    "-(id)initWithCptr: (void*)cptr swigOwnCObject: (BOOL)ownCObject {",
    "  self = [super initWithCptr:cptr swigOwnCObject:ownCObject];",
    "  return self;",
    "}",
];

static NAMING: NamingConvention = NamingConvention {
    method_case: MethodCase::Lower,
    extra_rules: &[
        r#"%rename("description", fullname=1, regextarget=1, %$isfunction)  "^carto::.+::toString()$";"#,
        r#"%rename("NT%s", %$isclass) "";"#,
        r#"%rename("NT%s", %$isenum) "";"#,
        r#"%rename("NT_%s", %$isenumitem) "";"#,
    ],
    skip_for_stl_wrappers: true,
};

static TEMPLATES: TemplateSet = TemplateSet {
    value_type: Some(Template::new(
        "objc.value_type",
        r#"
%typemap(out) $CLASSNAME$ "*($&1_ltype*)&$result = new $1_ltype($1);"
%typemap(directorin) $CLASSNAME$ "*($&1_ltype*)&$input = new $1_ltype($1);"
%typemap(objcdirectorin) $CLASSNAME$ "[[$TYPE$ alloc] initWithCptr:$iminput swigOwnCObject:YES]"
%typemap(objcout) $CLASSNAME$ { return [[$TYPE$ alloc] initWithCptr:$imcall swigOwnCObject:YES]; }
%typemap(objcdirectorout) $CLASSNAME$ "[($objccall) getCptr]"

%typemap(out) const $CLASSNAME$& "*($&1_ltype)&$result = new $*1_ltype(*$1);"
%typemap(directorin) const $CLASSNAME$& "*($&1_ltype)&$input = new $*1_ltype($1);"
%typemap(objcdirectorin) const $CLASSNAME$& "[[$TYPE$ alloc] initWithCptr:$iminput swigOwnCObject:YES]"
%typemap(objcout) const $CLASSNAME$& { return [[$TYPE$ alloc] initWithCptr:$imcall swigOwnCObject:YES]; }
%typemap(objcdirectorout) const $CLASSNAME$& "[($objccall) getCptr]"
"#,
    )),
    shared_ptr: Some(Template::new(
        "objc.shared_ptr",
        r#"
%shared_ptr($CLASSNAME$)
"#,
    )),
    shared_ptr_code: None,
    value_template: Some(Template::new(
        "objc.value_template",
        r#"
  %template($TYPE$) $CLASSNAME$;
"#,
    )),
    enum_decl: None,
    standard_equals: Some(Template::new("objc.standard_equals", "\n")),
    standard_equals_code: Some(Template::new(
        "objc.standard_equals_code",
        r#"
-(BOOL)isEqual:(id)object {
  if (self == object) {
    return YES;
  }
  if (![object isKindOfClass:[$objcclassname class]]) {
    return NO;
  }
  return swigCPtr == [($objcclassname *)object getCptr];
}

-(NSUInteger)hash {
  return (NSUInteger)swigCPtr;
}
"#,
    )),
    custom_equals: Some(Template::new(
        "objc.custom_equals",
        r#"
%rename(isEqualInternal) $CLASSNAME$::operator ==;
%ignore $CLASSNAME$::operator !=;
%rename(hashInternal) $CLASSNAME$::hash() const;
"#,
    )),
    custom_equals_code: Some(Template::new(
        "objc.custom_equals_code",
        r#"
-(BOOL)isEqual:(id)object {
  if (self == object) {
    return YES;
  }
  if (![object isKindOfClass:[$objcclassname class]]) {
    return NO;
  }
  return [self isEqualInternal:($objcclassname *)object];
}

-(NSUInteger)hash {
  return (NSUInteger)[self hashInternal];
}
"#,
    )),
    equals_interface: Some(Template::new(
        "objc.equals_interface",
        r#"
/**
 * Checks if this object is equal to the specified object.
 * @return True when objects are equal, false otherwise.
 */
-(BOOL)isEqual:(id)object;

/**
 * Returns the hash value of this object.
 * @return The hash value of this object.
 */
-(NSUInteger)hash;
"#,
    )),
    custom_tostring: None,
    ro_attribute: None,
    ro_attribute_code: None,
    rw_attribute: None,
    rw_attribute_code: None,
    polymorphic: PolymorphicTemplates {
        prelude: None,
        registration: Some(Template::new(
            "objc.polymorphic.registration",
            r#"static carto::ClassRegistry::Entry $TYPE$RegistryEntry(typeid(const $CLASSNAME$&), "$RAWTYPE$");"#,
        )),
        class_name_accessor: Some(Template::new(
            "objc.polymorphic.class_name_accessor",
            r#"  /**
    * Returns the actual class name of this object. This is used internally by the SDK.
    * @return The class name of this object.
    */
  std::string swigGetClassName() const {
    std::string className = carto::ClassRegistry::GetClassName(typeid(*$self));
    if (className.empty()) {
      className = "$RAWTYPE$";
    }
    return className;
  }"#,
        )),
        director_accessor: Some(Template::new(
            "objc.polymorphic.director_accessor",
            r#"  /**
    * Returns the pointer to the connected director object. This is used internally by the SDK.
    * @return The pointer to the connected director object or null if director is not connected.
    */
  void* swigGetDirectorObject() const {
    if (auto director = dynamic_cast<const carto::Director*>($self)) {
      return director->getDirectorObject();
    }
    return 0;
  }"#,
        )),
        proxy_typemaps: Some(Template::new(
            "objc.polymorphic.proxy_typemaps",
            r#"
%typemap(objcout) std::shared_ptr<$CLASSNAME$>, const std::shared_ptr<$CLASSNAME$>&, std::shared_ptr<$CLASSNAME$>& {
  void* cPtr = $imcall;
  if (!cPtr) {
    return nil;
  }
  return [$TYPE$ swigCreatePolymorphicInstance:cPtr swigOwnCObject:YES];
}

%typemap(objcdirectorin) std::shared_ptr<$CLASSNAME$>, const std::shared_ptr<$CLASSNAME$>&, std::shared_ptr<$CLASSNAME$>& %{
  [$TYPE$ swigCreatePolymorphicInstance:$iminput swigOwnCObject:YES]
%}
"#,
        )),
        proxy_factory: Some(Template::new(
            "objc.polymorphic.proxy_factory",
            r#"
+($TYPE$*)swigCreatePolymorphicInstance:(void*)cPtr swigOwnCObject:(BOOL)cMemoryOwn {
  if (!cPtr) {
    return nil;
  }

  void* directorPtr = Objc_$RAWTYPE$_$TYPE$_swigGetDirectorObject(cPtr);
  if (directorPtr) {
    return ($TYPE$*)CFBridgingRelease(directorPtr);
  }

  NSString* objClassName = [NSString stringWithFormat:@"NT%@", Objc_$RAWTYPE$_$TYPE$_swigGetClassName(cPtr)];
  $TYPE$* objInstance = nil;
  @try {
    objInstance = [[NSClassFromString(objClassName) alloc] initWithCptr:cPtr swigOwnCObject:cMemoryOwn];
  }
  @catch (NSException* e) {
  }
  if (!objInstance) {
    NSLog(@"Carto Mobile SDK: Could not instantiate class: %@", objClassName);
  }
  return objInstance;
}
"#,
        )),
        proxy_factory_interface: Some(Template::new(
            "objc.polymorphic.proxy_factory_interface",
            r#"
/**
 * Creates a polymorphic instance of the given native object. This is used internally by the SDK.
 */
+($TYPE$*)swigCreatePolymorphicInstance:(void*)cPtr swigOwnCObject:(BOOL)cMemoryOwn;
"#,
        )),
    },
};

fn lines<'a>(items: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    items.iter().map(|s| s.to_string())
}

/// Whether a module file for the dotted name exists in any source directory.
fn module_exists(name: &str, ctx: &FileContext<'_>) -> bool {
    let relative = format!("{}.i", name.replace('.', "/"));
    ctx.source_dirs.iter().any(|dir| dir.join(&relative).is_file())
}

impl BackendDriver for Objc {
    fn backend(&self) -> Backend {
        Backend::Objc
    }

    fn tag(&self) -> LangTag {
        LangTag::Objc
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

    fn renames_module(&self) -> bool {
        false
    }

    fn proxy_type(&self, exposed: &ExposedName) -> String {
        format!("{CLASS_PREFIX}{}", exposed.leaf())
    }

    /// Proxies with a module get an `#import`, the rest a forward declaration.
    fn format_imports(&self, tag: LangTag, names: &[String], ctx: &FileContext<'_>) -> Vec<String> {
        if tag != LangTag::Proxy {
            return names.iter().map(|name| format!("#import {name}")).collect();
        }
        let mut imports = Vec::new();
        let mut forward = Vec::new();
        for name in names {
            let (_, leaf) = split_import(name);
            if module_exists(name, ctx) {
                imports.push(format!("#import \"{leaf}_proxy.h\""));
            } else {
                forward.push(format!("@class {CLASS_PREFIX}{leaf};"));
            }
        }
        imports.extend(forward);
        imports
    }

    fn render_imports(&self, table: &ClassCodeTable) -> Vec<String> {
        let mut out = Vec::new();
        for (_, entry) in table.with_imports() {
            out.push("%pragma(objc) declmoduleimports=%{".to_string());
            out.extend(entry.imports.iter().cloned());
            out.push("%}".to_string());
        }
        out
    }

    /// Interface sections first, then implementation sections, each in a base-class and
    /// a derived-class variant.
    fn render_class_code(&self, table: &ClassCodeTable) -> Vec<String> {
        let mut out = Vec::new();
        for (class_name, entry) in table.with_interface() {
            out.push(format!("%typemap(objcinterfacecode) {class_name} %{{"));
            out.extend(lines(&["{", "  void *swigCPtr;", "  BOOL swigCMemOwn;", "}"]));
            out.extend(lines(POINTER_DECLS));
            out.extend(entry.interface.iter().cloned());
            out.push("%}".to_string());

            out.push(format!("%typemap(objcinterfacecode_derived) {class_name} %{{"));
            out.extend(lines(POINTER_DECLS));
            out.extend(entry.interface.iter().cloned());
            out.push("%}".to_string());
        }
        for (class_name, entry) in table.with_code() {
            out.push(format!("%typemap(objcimplementationcode) {class_name} %{{"));
            out.extend(lines(GET_CPTR_IMPL));
            out.extend(lines(BASE_INIT_IMPL));
            out.extend(entry.code.iter().cloned());
            out.push("%}".to_string());

            out.push(format!("%typemap(objcimplementationcode_derived) {class_name} %{{"));
            out.extend(lines(GET_CPTR_IMPL));
            out.extend(lines(DERIVED_INIT_IMPL));
            out.extend(entry.code.iter().cloned());
            out.push("%}".to_string());
        }
        out
    }

    fn targets(&self) -> &'static [&'static str] {
        &["ios"]
    }

    fn defaults(&self) -> BackendDefaults {
        BackendDefaults {
            source_dirs: "../all/modules;../ios/modules",
            cpp_dirs: "../all/native;../all/libs;../ios/native",
            proxy_dir: Some("../generated/ios-objc/proxies"),
            wrapper_dir: "../generated/ios-objc/wrappers",
            module_dir: "../generated/ios-objc/modules",
            swig_lib_dirs: "../scripts/swig/objc;../scripts/swig",
        }
    }

    fn swig_lib_name(&self) -> &'static str {
        "objc"
    }

    fn language_args(&self, job: &SwigJob<'_>) -> Vec<String> {
        let mut args = vec!["-c++".to_string(), "-doxygen".to_string(), "-objc".to_string()];
        if let Some(proxy_dir) = &job.proxy_dir {
            args.push("-outdir".to_string());
            args.push(proxy_dir.display().to_string());
        }
        args.push("-o".to_string());
        args.push(job.wrapper.display().to_string());
        args
    }

    fn wrapper_extension(&self, _file_name: &str, _target: &str) -> &'static str {
        ".mm"
    }

    fn post_process(&self, stem: &str, proxy_dir: Option<&Path>) -> Result<()> {
        match proxy_dir {
            Some(dir) => postprocess::rename_objc_proxies(dir, stem, CLASS_PREFIX),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn proxy_imports_check_for_module_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("core")).unwrap();
        fs::write(dir.path().join("core/MapPos.i"), "").unwrap();
        let source_dirs = vec![dir.path().to_path_buf()];
        let ctx = FileContext::new(&Objc, "core", &source_dirs);

        let imports = Objc.format_imports(
            LangTag::Proxy,
            &["ui.MapView".to_string(), "core.MapPos".to_string()],
            &ctx,
        );
        assert_eq!(imports, vec!["#import \"MapPos_proxy.h\"", "@class NTMapView;"]);
    }

    #[test]
    fn proxy_type_is_prefixed() {
        assert_eq!(Objc.proxy_type(&ExposedName::new("core.MapPos")), "NTMapPos");
    }

    #[test]
    fn class_code_wraps_interface_and_implementation() {
        let mut table = ClassCodeTable::new();
        table.add_interface("carto::Layer", vec!["-(NSUInteger)hash;".to_string()]);
        table.add_code("carto::Layer", vec!["-(NSUInteger)hash { return 0; }".to_string()]);
        let out = Objc.render_class_code(&table);

        let heads: Vec<&str> = out
            .iter()
            .filter(|l| l.starts_with("%typemap"))
            .map(String::as_str)
            .collect();
        assert_eq!(
            heads,
            vec![
                "%typemap(objcinterfacecode) carto::Layer %{",
                "%typemap(objcinterfacecode_derived) carto::Layer %{",
                "%typemap(objcimplementationcode) carto::Layer %{",
                "%typemap(objcimplementationcode_derived) carto::Layer %{",
            ]
        );
        assert_eq!(out.iter().filter(|l| *l == "-(NSUInteger)hash;").count(), 2);
        assert!(out.contains(&"  self = [super initWithCptr:cptr swigOwnCObject:ownCObject];".to_string()));
    }

    #[test]
    fn module_name_is_kept() {
        assert!(!Objc.renames_module());
        assert_eq!(Objc.naming().extra_rules.len(), 4);
    }
}
