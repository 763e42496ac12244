// Directive data model: recognized macro invocations and their arguments.

use std::fmt;

/// Language tag used by backend-scoped directives (`!cs_rename`, `%javamethodmodifiers`,
/// `!objc_imports`, ...). `Proxy` is the backend-neutral import form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LangTag {
    Cs,
    Java,
    Objc,
    Proxy,
}

impl LangTag {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "cs" => Some(LangTag::Cs),
            "java" => Some(LangTag::Java),
            "objc" => Some(LangTag::Objc),
            "proxy" => Some(LangTag::Proxy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LangTag::Cs => "cs",
            LangTag::Java => "java",
            LangTag::Objc => "objc",
            LangTag::Proxy => "proxy",
        }
    }
}

impl fmt::Display for LangTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted consumer-language name of a class, e.g. `vectorelements.Marker`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExposedName(String);

impl ExposedName {
    pub fn new(dotted: &str) -> Self {
        ExposedName(dotted.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment: the class name itself.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// All segments but the last. Empty for an unqualified name.
    pub fn package_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.0.split('.').collect();
        segments.pop();
        segments
    }
}

impl fmt::Display for ExposedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Property accessors of a polymorphic attribute. `setter` is `None` for read-only ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: String,
    pub getter: String,
    pub setter: Option<String>,
}

/// A recognized custom macro line. Constructed per matched line and consumed by
/// template expansion or the class code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `!cs_rename(...)`, `!java_rename(...)`, `!objc_rename(...)`.
    Rename { tag: LangTag, rest: String },
    /// `!attributestring_polymorphic(Class, pkg.Type, name, getter[, setter])`.
    PolymorphicAttribute {
        class_name: String,
        exposed: ExposedName,
        attribute: AttributeSpec,
    },
    /// `!value_type(Class, pkg.Type)`.
    ValueType { class_name: String, exposed: ExposedName },
    /// `!shared_ptr(Class, pkg.Type)`.
    SharedPtr { class_name: String, exposed: ExposedName },
    /// `!polymorphic_shared_ptr(Class, pkg.Type)`.
    PolymorphicSharedPtr { class_name: String, exposed: ExposedName },
    /// `!value_template(Template<Args>, pkg.Type)`.
    ValueTemplate { class_name: String, exposed: ExposedName },
    /// `!enum(Name)`.
    Enum { name: String },
    /// `!proxy_imports(Class, a.B, ...)` and the language-scoped variants.
    /// `trailing` is whatever followed the closing parenthesis.
    Imports {
        tag: LangTag,
        class_name: String,
        imports: Vec<String>,
        trailing: String,
    },
    /// `!standard_equals(Class)`.
    StandardEquals { class_name: String },
    /// `!custom_equals(Class)`.
    CustomEquals { class_name: String },
    /// `!custom_tostring(Class)`.
    CustomToString { class_name: String },
    /// `%typemap(cscode) Class %{ ... %}` and the `javacode`/`objccode` forms.
    CodeInjection {
        tag: LangTag,
        class_name: String,
        code: String,
    },
}

/// Fieldless discriminant of [`Directive`], used for logging and template lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Rename,
    PolymorphicAttribute,
    ValueType,
    SharedPtr,
    PolymorphicSharedPtr,
    ValueTemplate,
    Enum,
    Imports,
    StandardEquals,
    CustomEquals,
    CustomToString,
    CodeInjection,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Rename { .. } => DirectiveKind::Rename,
            Directive::PolymorphicAttribute { .. } => DirectiveKind::PolymorphicAttribute,
            Directive::ValueType { .. } => DirectiveKind::ValueType,
            Directive::SharedPtr { .. } => DirectiveKind::SharedPtr,
            Directive::PolymorphicSharedPtr { .. } => DirectiveKind::PolymorphicSharedPtr,
            Directive::ValueTemplate { .. } => DirectiveKind::ValueTemplate,
            Directive::Enum { .. } => DirectiveKind::Enum,
            Directive::Imports { .. } => DirectiveKind::Imports,
            Directive::StandardEquals { .. } => DirectiveKind::StandardEquals,
            Directive::CustomEquals { .. } => DirectiveKind::CustomEquals,
            Directive::CustomToString { .. } => DirectiveKind::CustomToString,
            Directive::CodeInjection { .. } => DirectiveKind::CodeInjection,
        }
    }

    /// Native class the directive attaches to, if any.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Directive::Rename { .. } | Directive::Enum { .. } => None,
            Directive::PolymorphicAttribute { class_name, .. }
            | Directive::ValueType { class_name, .. }
            | Directive::SharedPtr { class_name, .. }
            | Directive::PolymorphicSharedPtr { class_name, .. }
            | Directive::ValueTemplate { class_name, .. }
            | Directive::Imports { class_name, .. }
            | Directive::StandardEquals { class_name }
            | Directive::CustomEquals { class_name }
            | Directive::CustomToString { class_name }
            | Directive::CodeInjection { class_name, .. } => Some(class_name),
        }
    }

    /// Language scope of the directive; `None` for backend-neutral directives.
    pub fn scope(&self) -> Option<LangTag> {
        match self {
            Directive::Rename { tag, .. } | Directive::CodeInjection { tag, .. } => Some(*tag),
            Directive::Imports { tag, .. } if *tag != LangTag::Proxy => Some(*tag),
            _ => None,
        }
    }
}
