// Line classifier: matches each decommented line against the ordered directive patterns.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::directive::{AttributeSpec, Directive, ExposedName, LangTag};

/// Ordered pattern list. The first pattern that matches a line wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pattern {
    Module,
    MethodModifier,
    Rename,
    PolymorphicRwAttribute,
    PolymorphicRoAttribute,
    Attribute,
    ValueType,
    SharedPtr,
    PolymorphicSharedPtr,
    ValueTemplate,
    Enum,
    Imports,
    StandardEquals,
    CustomEquals,
    CustomToString,
    StlTemplate,
    CodeInjection,
    Include,
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// `%module NAME` (with optional options in parentheses). `head` keeps
    /// everything up to the name so it can be re-emitted verbatim.
    Module { head: String, name: String },
    /// `%csmethodmodifiers Class::method "modifier";` and friends. The method and
    /// modifier are only captured for the quoted form.
    MethodModifier {
        tag: LangTag,
        method: Option<String>,
        modifier: Option<String>,
    },
    /// Plain `%attribute`/`%staticattribute`/`!attribute...` lines.
    Attribute,
    /// `%template(Name) std::...;` instantiation of a library container.
    StlTemplate,
    /// `%include ...`; `quoted` is the file name for the `"File"` form.
    Include { quoted: Option<String> },
    /// A custom directive to expand.
    Directive(Directive),
    /// Anything else, passed through unchanged.
    Literal,
}

static PATTERNS: LazyLock<Vec<(Pattern, Regex)>> = LazyLock::new(|| {
    let table: [(Pattern, &str); 18] = [
        (Pattern::Module, r"^\s*(%module(?:[(].*[)]|)\s+)(\S*)\s*$"),
        (
            Pattern::MethodModifier,
            r#"^\s*%(java|cs|objc)methodmodifiers(?:\s+(\S+)\s+"([^"]*)")?.*$"#,
        ),
        (Pattern::Rename, r"^\s*!(java|cs|objc)_rename(.*)$"),
        (
            Pattern::PolymorphicRwAttribute,
            r"^\s*!attributestring_polymorphic\s*[(]([^,]*),([^,]*),([^,]*),([^,]*),([^)]*)[)].*",
        ),
        (
            Pattern::PolymorphicRoAttribute,
            r"^\s*!attributestring_polymorphic\s*[(]([^,]*),([^,]*),([^,]*),([^)]*)[)].*",
        ),
        (Pattern::Attribute, r"^\s*(%|!)(static|)attribute.*$"),
        (Pattern::ValueType, r"^\s*!value_type\s*[(]([^)]*),([^)]*)[)].*$"),
        (Pattern::SharedPtr, r"^\s*!shared_ptr\s*[(]([^)]*),([^)]*)[)].*$"),
        (
            Pattern::PolymorphicSharedPtr,
            r"^\s*!polymorphic_shared_ptr\s*[(]([^,]*),([^)]*)[)].*",
        ),
        (Pattern::ValueTemplate, r"^\s*!value_template\s*[(]([^)]*),([^)]*)[)].*$"),
        (Pattern::Enum, r"^\s*!enum\s*[(]([^)]*)[)].*$"),
        (Pattern::Imports, r"^\s*!(proxy|java|cs|objc)_imports\s*[(]([^)]*)[)](.*)$"),
        (Pattern::StandardEquals, r"^\s*!standard_equals\s*[(]([^)]*)[)].*"),
        (Pattern::CustomEquals, r"^\s*!custom_equals\s*[(]([^)]*)[)].*"),
        (Pattern::CustomToString, r"^\s*!custom_tostring\s*[(]([^)]*)[)].*"),
        (Pattern::StlTemplate, r"^\s*%template\(.*\)\s*std::.*$"),
        (
            Pattern::CodeInjection,
            r"^\s*%typemap[(](cs|java|objc)code[)]\s*(.*?)\s*%\{(.*)%\}",
        ),
        (Pattern::Include, r"^\s*%include\s+(.*)$"),
    ];
    table
        .into_iter()
        .map(|(pattern, re)| (pattern, Regex::new(re).expect("invalid directive pattern")))
        .collect()
});

static QUOTED_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*%include\s+"(.*)".*$"#).expect("invalid include pattern"));

/// Classify a line against the full pattern list.
pub fn classify(line: &str) -> LineClass {
    classify_from(line, Pattern::Module)
}

/// Classify a line using only the patterns at or after `start`.
///
/// Used for the text that trails an imports directive: it continues through the
/// rest of the pipeline instead of being dropped.
pub fn classify_from(line: &str, start: Pattern) -> LineClass {
    for (pattern, re) in PATTERNS.iter().filter(|(p, _)| *p >= start) {
        if let Some(caps) = re.captures(line) {
            return build(*pattern, &caps, line);
        }
    }
    LineClass::Literal
}

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index).map_or(String::new(), |m| m.as_str().trim().to_string())
}

fn tag(caps: &Captures<'_>, index: usize) -> LangTag {
    // The alternation in every scoped pattern only admits known tags.
    caps.get(index)
        .and_then(|m| LangTag::parse(m.as_str()))
        .unwrap_or(LangTag::Proxy)
}

fn build(pattern: Pattern, caps: &Captures<'_>, line: &str) -> LineClass {
    match pattern {
        Pattern::Module => LineClass::Module {
            head: caps.get(1).map_or(String::new(), |m| m.as_str().to_string()),
            name: group(caps, 2),
        },
        Pattern::MethodModifier => LineClass::MethodModifier {
            tag: tag(caps, 1),
            method: caps.get(2).map(|m| m.as_str().to_string()),
            modifier: caps.get(3).map(|m| m.as_str().to_string()),
        },
        Pattern::Rename => LineClass::Directive(Directive::Rename {
            tag: tag(caps, 1),
            rest: caps.get(2).map_or(String::new(), |m| m.as_str().to_string()),
        }),
        Pattern::PolymorphicRwAttribute => LineClass::Directive(Directive::PolymorphicAttribute {
            class_name: group(caps, 1),
            exposed: ExposedName::new(&group(caps, 2)),
            attribute: AttributeSpec {
                name: group(caps, 3),
                getter: group(caps, 4),
                setter: Some(group(caps, 5)),
            },
        }),
        Pattern::PolymorphicRoAttribute => LineClass::Directive(Directive::PolymorphicAttribute {
            class_name: group(caps, 1),
            exposed: ExposedName::new(&group(caps, 2)),
            attribute: AttributeSpec {
                name: group(caps, 3),
                getter: group(caps, 4),
                setter: None,
            },
        }),
        Pattern::Attribute => LineClass::Attribute,
        Pattern::ValueType => LineClass::Directive(Directive::ValueType {
            class_name: group(caps, 1),
            exposed: ExposedName::new(&group(caps, 2)),
        }),
        Pattern::SharedPtr => LineClass::Directive(Directive::SharedPtr {
            class_name: group(caps, 1),
            exposed: ExposedName::new(&group(caps, 2)),
        }),
        Pattern::PolymorphicSharedPtr => LineClass::Directive(Directive::PolymorphicSharedPtr {
            class_name: group(caps, 1),
            exposed: ExposedName::new(&group(caps, 2)),
        }),
        Pattern::ValueTemplate => LineClass::Directive(Directive::ValueTemplate {
            class_name: group(caps, 1),
            exposed: ExposedName::new(&group(caps, 2)),
        }),
        Pattern::Enum => LineClass::Directive(Directive::Enum { name: group(caps, 1) }),
        Pattern::Imports => {
            let args = caps.get(2).map_or("", |m| m.as_str());
            let mut parts = args.split(',').map(|part| part.trim().to_string());
            let class_name = parts.next().unwrap_or_default();
            LineClass::Directive(Directive::Imports {
                tag: tag(caps, 1),
                class_name,
                imports: parts.collect(),
                trailing: caps.get(3).map_or(String::new(), |m| m.as_str().to_string()),
            })
        }
        Pattern::StandardEquals => LineClass::Directive(Directive::StandardEquals {
            class_name: group(caps, 1),
        }),
        Pattern::CustomEquals => LineClass::Directive(Directive::CustomEquals {
            class_name: group(caps, 1),
        }),
        Pattern::CustomToString => LineClass::Directive(Directive::CustomToString {
            class_name: group(caps, 1),
        }),
        Pattern::StlTemplate => LineClass::StlTemplate,
        Pattern::CodeInjection => LineClass::Directive(Directive::CodeInjection {
            tag: tag(caps, 1),
            class_name: group(caps, 2),
            code: caps.get(3).map_or(String::new(), |m| m.as_str().to_string()),
        }),
        Pattern::Include => LineClass::Include {
            quoted: QUOTED_INCLUDE
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
        },
    }
}
