// Template instantiation: literal, single-pass placeholder substitution.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SwigppError};
use crate::templates::Template;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Z][A-Z_]*)\$").expect("invalid placeholder pattern"));

/// Placeholder values, keyed by name without the surrounding `$`.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    values: BTreeMap<&'static str, String>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        TemplateArgs::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Substitute all placeholders of `template` and return the resulting text.
///
/// Every `$NAME$` is replaced in one pass over the template text, so a value that
/// itself contains `$OTHER$` is never substituted again. A placeholder without a
/// value is a template-table bug and is reported as fatal.
pub fn expand_text(template: &Template, args: &TemplateArgs) -> Result<String> {
    let text = template.text;
    let mut out = String::with_capacity(text.len() + 64);
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = args
            .get(key.as_str())
            .ok_or_else(|| SwigppError::UnresolvedPlaceholder {
                placeholder: key.as_str().to_string(),
                template: template.name,
            })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&text[last..]);

    Ok(out)
}

/// Expand a template into output lines (split on `\n`, leading and trailing blank
/// lines of the template included).
pub fn instantiate(template: &Template, args: &TemplateArgs) -> Result<Vec<String>> {
    Ok(expand_text(template, args)?
        .split('\n')
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Template = Template::new(
        "test.sample",
        "\nstatic carto::ClassRegistry::Entry $TYPE$RegistryEntry(typeid(const $CLASSNAME$&), \"$TYPE$\");\n",
    );

    #[test]
    fn substitutes_every_occurrence() {
        let args = TemplateArgs::new()
            .with("TYPE", "Marker")
            .with("CLASSNAME", "carto::Marker");
        let lines = instantiate(&SAMPLE, &args).unwrap();
        assert_eq!(
            lines,
            vec![
                "",
                "static carto::ClassRegistry::Entry MarkerRegistryEntry(typeid(const carto::Marker&), \"Marker\");",
                "",
            ]
        );
    }

    #[test]
    fn swig_variables_are_not_placeholders() {
        let t = Template::new("test.swig", "%typemap(out) $CLASSNAME$ \"*($&1_ltype*)&$result = new $1_ltype($1);\"");
        let args = TemplateArgs::new().with("CLASSNAME", "carto::MapPos");
        assert_eq!(
            expand_text(&t, &args).unwrap(),
            "%typemap(out) carto::MapPos \"*($&1_ltype*)&$result = new $1_ltype($1);\""
        );
    }

    #[test]
    fn substitution_is_not_recursive() {
        let t = Template::new("test.recursive", "$TYPE$/$NAMESPACE$");
        let args = TemplateArgs::new()
            .with("TYPE", "$NAMESPACE$")
            .with("NAMESPACE", "Carto.Core");
        assert_eq!(expand_text(&t, &args).unwrap(), "$NAMESPACE$/Carto.Core");
    }

    #[test]
    fn missing_value_is_fatal() {
        let t = Template::new("test.missing", "new $TYPE$($iminput, true)");
        let err = expand_text(&t, &TemplateArgs::new()).unwrap_err();
        match err {
            SwigppError::UnresolvedPlaceholder { placeholder, template } => {
                assert_eq!(placeholder, "TYPE");
                assert_eq!(template, "test.missing");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_template_yields_two_blank_lines() {
        let t = Template::new("test.empty", "\n");
        assert_eq!(instantiate(&t, &TemplateArgs::new()).unwrap(), vec!["", ""]);
    }
}
