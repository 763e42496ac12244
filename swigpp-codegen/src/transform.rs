// Per-file directive transform: pass 1 scans and collects, pass 2 resolves markers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::aggregate::ClassCodeTable;
use crate::backends::BackendDriver;
use crate::backends::java::ROOT_PACKAGE;
use crate::classify::{LineClass, Pattern, classify, classify_from};
use crate::decomment::read_uncommented_lines;
use crate::directive::{AttributeSpec, Directive, ExposedName, LangTag};
use crate::emit::{Marker, OutputBuffer};
use crate::error::{Result, SwigppError};
use crate::instantiate::{TemplateArgs, instantiate};
use crate::package::{BASE_INTERFACE_FILE, PackageStyle};
use crate::polymorphic::expand_polymorphic;
use crate::templates::Template;

/// Root namespace of the managed backend.
pub const ROOT_NAMESPACE: &str = "Carto";

const DEFAULT_MODIFIER: &str = "public";

/// Read-only inputs of one file's transform.
#[derive(Clone, Copy)]
pub struct FileContext<'a> {
    pub driver: &'a dyn BackendDriver,
    /// Exposed package of the directory holding the file, in the backend's style.
    pub package: &'a str,
    /// Source roots, used to check whether an imported proxy has a module.
    pub source_dirs: &'a [PathBuf],
}

impl<'a> FileContext<'a> {
    pub fn new(driver: &'a dyn BackendDriver, package: &'a str, source_dirs: &'a [PathBuf]) -> Self {
        FileContext {
            driver,
            package,
            source_dirs,
        }
    }
}

impl std::fmt::Debug for FileContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContext")
            .field("backend", &self.driver.backend())
            .field("package", &self.package)
            .finish()
    }
}

/// Placeholder values derived from a class and its exposed name.
fn type_args(ctx: &FileContext<'_>, class_name: &str, exposed: &ExposedName) -> TemplateArgs {
    let prefix = exposed.package_segments();
    let leaf = exposed.leaf();

    let namespace = if prefix.is_empty() {
        format!("{ROOT_NAMESPACE}.{}", ctx.package)
    } else {
        format!("{ROOT_NAMESPACE}.{}", PackageStyle::Remapped.dotted(prefix.iter().copied()))
    };
    let java_package = if prefix.is_empty() {
        format!("{ROOT_PACKAGE}.{}", ctx.package)
    } else {
        format!("{ROOT_PACKAGE}.{}", prefix.join("."))
    };
    let descriptor = format!("L{};", format!("{java_package}.{leaf}").replace('.', "/"));

    TemplateArgs::new()
        .with("CLASSNAME", class_name)
        .with("TYPE", ctx.driver.proxy_type(exposed))
        .with("RAWTYPE", leaf)
        .with("NAMESPACE", namespace)
        .with("PACKAGE", java_package)
        .with("DESCRIPTOR", descriptor)
}

/// Mutable state of one file. Dropped when the file is done.
struct FileTransform<'a> {
    ctx: FileContext<'a>,
    out: OutputBuffer,
    table: ClassCodeTable,
    /// `Class::method` -> modifier, from this backend's method-modifier lines.
    modifiers: HashMap<String, String>,
    stl_wrapper: bool,
}

impl<'a> FileTransform<'a> {
    fn new(ctx: FileContext<'a>) -> Self {
        FileTransform {
            ctx,
            out: OutputBuffer::new(),
            table: ClassCodeTable::new(),
            modifiers: HashMap::new(),
            stl_wrapper: false,
        }
    }

    fn emit(&mut self, template: &Option<Template>, args: &TemplateArgs) -> Result<()> {
        if let Some(t) = template {
            self.out.extend(instantiate(t, args)?);
        }
        Ok(())
    }

    fn defer(&mut self, class_name: &str, template: &Option<Template>, args: &TemplateArgs) -> Result<()> {
        if let Some(t) = template {
            self.table.add_code(class_name, instantiate(t, args)?);
        }
        Ok(())
    }

    fn defer_interface(
        &mut self,
        class_name: &str,
        template: &Option<Template>,
        args: &TemplateArgs,
    ) -> Result<()> {
        if let Some(t) = template {
            self.table.add_interface(class_name, instantiate(t, args)?);
        }
        Ok(())
    }

    fn line(&mut self, line: &str) -> Result<()> {
        let mut text = line.to_string();
        let mut class = classify(line);
        // An imports directive hands its trailing text back for the later patterns.
        loop {
            match class {
                LineClass::Directive(Directive::Imports {
                    tag,
                    class_name,
                    imports,
                    trailing,
                }) => {
                    if tag != LangTag::Proxy && tag != self.ctx.driver.tag() {
                        return Ok(());
                    }
                    let formatted = self.ctx.driver.format_imports(tag, &imports, &self.ctx);
                    self.table.add_imports(&class_name, formatted);
                    self.out.mark(Marker::Imports);
                    class = classify_from(&trailing, Pattern::StandardEquals);
                    text = trailing;
                }
                other => return self.classified(other, text),
            }
        }
    }

    fn classified(&mut self, class: LineClass, text: String) -> Result<()> {
        let driver = self.ctx.driver;
        match class {
            LineClass::Module { head, name } => {
                if driver.renames_module() {
                    self.out.push(format!("{head}{name}Module"));
                } else {
                    self.out.push(text);
                }
            }
            LineClass::MethodModifier { tag, method, modifier } => {
                if tag != driver.tag() {
                    return Ok(());
                }
                if let (Some(method), Some(modifier)) = (method, modifier) {
                    self.modifiers.insert(method, modifier);
                }
                self.out.push(text);
            }
            LineClass::Attribute => {
                if driver.keeps_plain_attributes() {
                    self.out.push(text);
                }
            }
            LineClass::StlTemplate => {
                self.stl_wrapper = true;
                self.out.push(text);
            }
            LineClass::Include { quoted } => self.include(quoted.as_deref(), text),
            LineClass::Directive(directive) => self.directive(directive, text)?,
            LineClass::Literal => self.out.push(text),
        }
        Ok(())
    }

    fn include(&mut self, quoted: Option<&str>, text: String) {
        let driver = self.ctx.driver;
        if !self.out.is_marked(Marker::ClassCode) {
            self.out.extend(driver.include_prelude().iter().map(|s| s.to_string()));
            self.out.mark(Marker::ClassCode);
        }
        if let Some(name) = quoted {
            if driver.naming().applies_to(name, BASE_INTERFACE_FILE, self.stl_wrapper) {
                self.out.extend(driver.naming().rule_block());
            }
        }
        self.out.push(text);
    }

    fn directive(&mut self, directive: Directive, text: String) -> Result<()> {
        let driver = self.ctx.driver;
        let templates = driver.templates();
        if let Some(tag) = directive.scope() {
            if tag != driver.tag() {
                tracing::trace!(
                    kind = ?directive.kind(),
                    class = ?directive.class_name(),
                    tag = tag.as_str(),
                    "directive scoped to another backend"
                );
                return Ok(());
            }
        }
        match directive {
            Directive::Rename { rest, .. } => self.out.push(format!("%rename{rest}")),
            Directive::PolymorphicAttribute {
                class_name,
                exposed,
                attribute,
            } => self.polymorphic_attribute(&class_name, &exposed, attribute)?,
            Directive::ValueType { class_name, exposed } => {
                let args = type_args(&self.ctx, &class_name, &exposed);
                self.emit(&templates.value_type, &args)?;
            }
            Directive::SharedPtr { class_name, exposed } => {
                let args = type_args(&self.ctx, &class_name, &exposed);
                self.defer(&class_name, &templates.shared_ptr_code, &args)?;
                self.emit(&templates.shared_ptr, &args)?;
            }
            Directive::PolymorphicSharedPtr { class_name, exposed } => {
                let args = type_args(&self.ctx, &class_name, &exposed);
                let expansion = expand_polymorphic(templates, &args)?;
                self.table.add_interface(&class_name, expansion.class_interface);
                self.table.add_code(&class_name, expansion.code);
                self.out.extend(expansion.interface);
            }
            Directive::ValueTemplate { class_name, exposed } => {
                let args = type_args(&self.ctx, &class_name, &exposed);
                self.emit(&templates.value_template, &args)?;
            }
            Directive::Enum { name } => match &templates.enum_decl {
                Some(t) => {
                    let args = TemplateArgs::new().with("ENUMNAME", name);
                    self.out.extend(instantiate(t, &args)?);
                }
                None => self.out.push(text),
            },
            Directive::StandardEquals { class_name } => {
                let args = TemplateArgs::new().with("CLASSNAME", class_name.as_str());
                self.defer_interface(&class_name, &templates.equals_interface, &args)?;
                self.defer(&class_name, &templates.standard_equals_code, &args)?;
                self.emit(&templates.standard_equals, &args)?;
            }
            Directive::CustomEquals { class_name } => {
                let args = TemplateArgs::new().with("CLASSNAME", class_name.as_str());
                self.defer_interface(&class_name, &templates.equals_interface, &args)?;
                self.defer(&class_name, &templates.custom_equals_code, &args)?;
                self.emit(&templates.custom_equals, &args)?;
            }
            Directive::CustomToString { class_name } => {
                let args = TemplateArgs::new().with("CLASSNAME", class_name);
                self.emit(&templates.custom_tostring, &args)?;
            }
            Directive::CodeInjection { class_name, code, .. } => {
                self.table.add_code(&class_name, [code]);
            }
            // Handled in `line` before dispatch.
            Directive::Imports { .. } => {}
        }
        Ok(())
    }

    fn polymorphic_attribute(
        &mut self,
        class_name: &str,
        exposed: &ExposedName,
        attribute: AttributeSpec,
    ) -> Result<()> {
        let templates = self.ctx.driver.templates();
        let (interface, code) = match attribute.setter {
            Some(_) => (&templates.rw_attribute, &templates.rw_attribute_code),
            None => (&templates.ro_attribute, &templates.ro_attribute_code),
        };
        let modifier = self
            .modifiers
            .get(&format!("{class_name}::{}", attribute.name))
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODIFIER.to_string());

        let mut args = type_args(&self.ctx, class_name, exposed);
        args.set("NAME", attribute.name);
        args.set("GETTER", attribute.getter);
        args.set("SETTER", attribute.setter.unwrap_or_default());
        args.set("MODIFIER", modifier);

        self.defer(class_name, code, &args)?;
        self.emit(interface, &args)
    }

    /// Pass 2: splice the collected blocks at their markers.
    fn finish(self) -> Vec<String> {
        let FileTransform { ctx, out, table, .. } = self;
        if table.has_code() && !out.is_marked(Marker::ClassCode) {
            crate::diag_warn!(
                backend = %ctx.driver.backend(),
                package = ctx.package,
                "class code collected but the file has no include; dropping it"
            );
        }
        out.resolve(|marker| match marker {
            Marker::Imports => ctx.driver.render_imports(&table),
            Marker::ClassCode => ctx.driver.render_class_code(&table),
        })
    }
}

/// Transform the decommented lines of one interface file.
pub fn transform_lines(lines: &[String], ctx: FileContext<'_>) -> Result<Vec<String>> {
    let mut state = FileTransform::new(ctx);
    for line in lines {
        state.line(line)?;
    }
    Ok(state.finish())
}

/// Transform `source` into `out`, creating parent directories as needed.
pub fn transform_file(source: &Path, out: &Path, ctx: FileContext<'_>) -> Result<()> {
    let lines = read_uncommented_lines(source)?;
    let transformed = transform_lines(&lines, ctx)?;

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(SwigppError::io(parent))?;
    }
    let mut text = transformed.join("\n");
    text.push('\n');
    std::fs::write(out, text).map_err(SwigppError::io(out))?;

    debug!(
        source = %source.display(),
        lines_in = lines.len(),
        lines_out = transformed.len(),
        "transformed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Backend;

    fn run(backend: Backend, package: &str, src: &str) -> Vec<String> {
        let lines: Vec<String> = src.lines().map(str::to_string).collect();
        transform_lines(&lines, FileContext::new(backend.driver(), package, &[])).unwrap()
    }

    fn index_of(lines: &[String], needle: &str) -> usize {
        lines
            .iter()
            .position(|l| l == needle)
            .unwrap_or_else(|| panic!("{needle:?} not in {lines:#?}"))
    }

    #[test]
    fn plain_file_passes_through() {
        let src = "%{\n#include \"core/MapPos.h\"\n%}\n%import \"core/MapBounds.i\"\n";
        for backend in [Backend::CSharp, Backend::Objc] {
            let out = run(backend, "core", src);
            let expected: Vec<String> = src.lines().map(str::to_string).collect();
            assert_eq!(out, expected, "{backend}");
        }
    }

    #[test]
    fn module_is_renamed_per_backend() {
        assert_eq!(run(Backend::CSharp, "core", "%module(directors=\"1\") MapPos"), vec![
            "%module(directors=\"1\") MapPosModule"
        ]);
        assert_eq!(run(Backend::Objc, "core", "%module MapPos"), vec!["%module MapPos"]);
    }

    #[test]
    fn standard_equals_defers_handle_comparison() {
        let src = "%module Foo\n!standard_equals(carto::Foo);\n%include \"Foo.h\"";
        let out = run(Backend::CSharp, "core", src);

        let block = index_of(&out, "%typemap(cscode) carto::Foo %{");
        let include = index_of(&out, "%include \"Foo.h\"");
        assert!(block < include);
        assert!(out.iter().any(|l| l.contains("swigCPtr.Handle == swigCPtr.Handle")));
        assert!(out.iter().any(|l| l.contains("return (int)swigCPtr.Handle;")));
        assert!(!out.iter().any(|l| l.starts_with("%typemap(out)")));
    }

    #[test]
    fn polymorphic_namespace_and_registration() {
        let src = "!polymorphic_shared_ptr(carto::Bar, mypkg.Bar)\n%include \"Bar.h\"";
        let out = run(Backend::CSharp, "VectorElements", src);
        assert!(out.iter().any(|l| l.contains(r#"typeid(const carto::Bar&), "Bar");"#)));
        assert!(out.iter().any(|l| l.contains("public static Carto.Mypkg.Bar SwigCreatePolymorphicInstanceBar")));
    }

    #[test]
    fn unqualified_exposed_name_uses_directory_namespace() {
        let src = "!polymorphic_shared_ptr(carto::Bar, Bar)\n%include \"Bar.h\"";
        let out = run(Backend::CSharp, "VectorElements", src);
        assert!(out.iter().any(|l| l.contains("Carto.VectorElements.Bar SwigCreatePolymorphicInstanceBar")));
    }

    #[test]
    fn imports_are_spliced_once_before_include() {
        let src = "%module Baz\n!cs_imports(carto::Baz, System.Collections.Generic)\n%{\n#include \"Baz.h\"\n%}\n%include \"Baz.h\"";
        let out = run(Backend::CSharp, "core", src);

        assert_eq!(out.iter().filter(|l| *l == "using System.Collections.Generic;").count(), 2);
        let typemap = index_of(&out, "%typemap(csimports) carto::Baz %{");
        let include = index_of(&out, "%include \"Baz.h\"");
        assert_eq!(typemap, 1);
        assert!(typemap < include);
        assert_eq!(out.iter().filter(|l| l.starts_with("%typemap(csimports)")).count(), 1);
    }

    #[test]
    fn foreign_imports_are_dropped_with_their_line() {
        let out = run(Backend::Java, "core", "!cs_imports(carto::Baz, System.Linq) trailing");
        assert!(out.is_empty());
    }

    #[test]
    fn imports_trailing_text_is_kept() {
        let src = "!proxy_imports(carto::Layer, core.MapPos) !standard_equals(carto::Layer)\n%include \"Layer.h\"";
        let out = run(Backend::Java, "layers", src);
        assert!(out.contains(&"import com.carto.core.MapPos;".to_string()));
        assert!(out.iter().any(|l| l.contains("(($javaclassname)obj).swigCPtr == swigCPtr")));

        let out = run(Backend::Java, "layers", "!java_imports(carto::Layer, java.util.List) // tail");
        assert_eq!(out.last().map(String::as_str), Some(" // tail"));
    }

    #[test]
    fn per_class_code_keeps_directive_order() {
        let src = concat!(
            "!polymorphic_shared_ptr(carto::Layer, layers.Layer)\n",
            "%typemap(cscode) carto::Other %{ int other; %}\n",
            "%typemap(cscode) carto::Layer %{ int marker; %}\n",
            "!custom_equals(carto::Layer)\n",
            "%include \"Layer.h\"",
        );
        let out = run(Backend::CSharp, "Layers", src);

        let layer_block = index_of(&out, "%typemap(cscode) carto::Layer %{");
        let other_block = index_of(&out, "%typemap(cscode) carto::Other %{");
        assert!(layer_block < other_block);
        assert_eq!(out.iter().filter(|l| *l == "%typemap(cscode) carto::Layer %{").count(), 1);

        let factory = out.iter().position(|l| l.contains("SwigCreatePolymorphicInstanceLayer(System.IntPtr")).unwrap();
        let injected = index_of(&out, " int marker; ");
        let equals = out.iter().position(|l| l.contains("return EqualsInternal(")).unwrap();
        assert!(layer_block < factory && factory < injected && injected < equals);
        assert!(equals < other_block);
    }

    #[test]
    fn naming_block_precedes_first_real_include() {
        let src = "%include \"NutiSwig.i\"\n%include \"Layer.h\"";
        let out = run(Backend::CSharp, "core", src);
        let base = index_of(&out, "%include \"NutiSwig.i\"");
        let layer = index_of(&out, "%include \"Layer.h\"");
        let rules = out.iter().filter(|l| l.contains("%$isfunction")).count();
        assert_eq!(rules, 26);
        let first_rule = out.iter().position(|l| l.contains("%$isfunction")).unwrap();
        assert!(base < first_rule && first_rule < layer);
        assert_eq!(out[layer - 1], "");
        assert!(out[layer - 2].contains("%$isenumitem"));
    }

    #[test]
    fn stl_wrappers_skip_naming_except_managed() {
        let src = "%template(StringVector) std::vector<std::string>;\n%include \"Strings.h\"";
        let java = run(Backend::Java, "core", src);
        assert!(!java.iter().any(|l| l.contains("%$isfunction")));
        let cs = run(Backend::CSharp, "core", src);
        assert_eq!(cs.iter().filter(|l| l.contains("%$isfunction")).count(), 26);
    }

    #[test]
    fn jvm_prelude_is_inserted_once() {
        let src = "%include <std_string.i>\n%include \"Layer.h\"";
        let out = run(Backend::Java, "core", src);
        assert_eq!(out.iter().filter(|l| *l == "%include \"enums.swg\"").count(), 1);
        assert_eq!(out[0], "%include \"enums.swg\"");
        assert_eq!(out[1], "%include <std_string.i>");
    }

    #[test]
    fn scoped_lines_follow_backend() {
        let src = concat!(
            "!java_rename(Foo) carto::Layer::foo;\n",
            "!cs_rename(Bar) carto::Layer::bar;\n",
            "%javamethodmodifiers carto::Layer::update \"protected\";\n",
            "%csmethodmodifiers carto::Layer::update \"internal\";\n",
        );
        assert_eq!(run(Backend::Java, "core", src), vec![
            "%rename(Foo) carto::Layer::foo;",
            "%javamethodmodifiers carto::Layer::update \"protected\";",
        ]);
        assert_eq!(run(Backend::Emscripten, "core", src), run(Backend::Java, "core", src));
        assert_eq!(run(Backend::CSharp, "core", src), vec![
            "%rename(Bar) carto::Layer::bar;",
            "%csmethodmodifiers carto::Layer::update \"internal\";",
        ]);
        assert!(run(Backend::Objc, "core", src).is_empty());
    }

    #[test]
    fn polymorphic_attribute_uses_recorded_modifier() {
        let src = concat!(
            "%csmethodmodifiers carto::Marker::Style \"protected\";\n",
            "!attributestring_polymorphic(carto::Marker, styles.MarkerStyle, Style, getStyle, setStyle)\n",
            "!attributestring_polymorphic(carto::Marker, core.MapPos, Pos, getPos)\n",
            "%include \"Marker.h\"",
        );
        let out = run(Backend::CSharp, "VectorElements", src);
        assert!(out.contains(&"  protected Carto.Styles.MarkerStyle Style {".to_string()));
        assert!(out.contains(&"    set { setStyleInternal(value); }".to_string()));
        assert!(out.contains(&"  public Carto.Core.MapPos Pos {".to_string()));
        assert!(out.contains(&"%rename(getPosInternal) carto::Marker::getPos;".to_string()));

        let java = run(Backend::Java, "vectorelements", src);
        assert!(!java.iter().any(|l| l.contains("attributestring_polymorphic")));
    }

    #[test]
    fn plain_attributes_only_survive_managed() {
        let src = "%attribute(carto::Layer, bool, Visible, isVisible, setVisible);";
        assert_eq!(run(Backend::CSharp, "core", src).len(), 1);
        assert!(run(Backend::Objc, "core", src).is_empty());
    }

    #[test]
    fn enum_directive_expands_only_for_js() {
        assert_eq!(run(Backend::Emscripten, "core", "!enum(LayerMode)"), vec!["", ""]);
        assert_eq!(run(Backend::CSharp, "core", "!enum(LayerMode)"), vec!["!enum(LayerMode)"]);
    }

    #[test]
    fn java_descriptor_uses_exposed_path() {
        let out = run(Backend::Java, "core", "!value_type(carto::MapPos, core.MapPos)");
        assert!(out.iter().any(|l| l.contains(r#"descriptor="Lcom/carto/core/MapPos;""#)));
    }

    #[test]
    fn files_do_not_share_class_code() {
        let first = "%typemap(cscode) carto::Handler %{ int nml; %}\n%include \"Handler.h\"";
        let second = "%typemap(cscode) carto::Handler %{ int routing; %}\n%include \"Handler.h\"";
        let out_first = run(Backend::CSharp, "Nml", first);
        let out_second = run(Backend::CSharp, "Routing", second);
        assert!(out_first.contains(&" int nml; ".to_string()));
        assert!(!out_first.contains(&" int routing; ".to_string()));
        assert!(out_second.contains(&" int routing; ".to_string()));
        assert!(!out_second.contains(&" int nml; ".to_string()));
    }

    #[test]
    fn transform_file_writes_mirrored_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Layer.i");
        std::fs::write(&source, "%module Layer /* module */\n// comment only\n%include \"Layer.h\"\n").unwrap();
        let out = dir.path().join("out/layers/Layer.i");

        transform_file(&source, &out, FileContext::new(Backend::Objc.driver(), "layers", &[])).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("%module Layer"));
        assert!(text.ends_with("%include \"Layer.h\"\n"));
        assert!(text.contains("%rename(\"NT%s\", %$isclass) \"\";"));
    }
}
