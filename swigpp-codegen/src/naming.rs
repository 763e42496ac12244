// Method naming convention: per-letter rename rules emitted before native includes.

/// Root native namespace the rename rules are restricted to.
pub const ROOT_NAMESPACE: &str = "carto";

/// Casing of the first character of exposed method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodCase {
    /// `getVisible` is exposed as `GetVisible`.
    Upper,
    /// `GetVisible` is exposed as `getVisible`.
    Lower,
}

/// Naming rules of one backend.
#[derive(Debug)]
pub struct NamingConvention {
    pub method_case: MethodCase,
    /// Rules appended after the per-letter block (enum items, class prefixes, ...).
    pub extra_rules: &'static [&'static str],
    /// Do not emit the block once a standard-library template instantiation was seen.
    pub skip_for_stl_wrappers: bool,
}

impl NamingConvention {
    /// The complete rule block, terminated by a blank line.
    pub fn rule_block(&self) -> Vec<String> {
        let mut lines: Vec<String> = letter_rules(self.method_case)
            .iter()
            .map(RenameRule::render)
            .collect();
        lines.extend(self.extra_rules.iter().map(|r| r.to_string()));
        lines.push(String::new());
        lines
    }

    /// Whether the block is emitted before an include of `include_name`.
    pub fn applies_to(&self, include_name: &str, sentinel: &str, stl_wrapper: bool) -> bool {
        include_name != sentinel && !(stl_wrapper && self.skip_for_stl_wrappers)
    }
}

/// Rename of every `ROOT::...::<from><rest>` method to `<to><rest>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameRule {
    pub from: char,
    pub to: char,
}

impl RenameRule {
    /// Regex matching the fully qualified native names this rule targets.
    pub fn target_pattern(&self) -> String {
        format!("^{ROOT_NAMESPACE}::.+::{}[^:]*$", self.from)
    }

    /// The directive line understood by the interface compiler.
    pub fn render(&self) -> String {
        format!(
            r#"%rename("%(regex:/::{from}([^:]*)$/{to}\\1/)s", fullname=1, regextarget=1, %$isfunction) "{target}";"#,
            from = self.from,
            to = self.to,
            target = self.target_pattern(),
        )
    }
}

/// One rule per ASCII letter, in alphabetical order.
pub fn letter_rules(case: MethodCase) -> Vec<RenameRule> {
    ('a'..='z')
        .map(|lower| {
            let upper = lower.to_ascii_uppercase();
            match case {
                MethodCase::Upper => RenameRule { from: lower, to: upper },
                MethodCase::Lower => RenameRule { from: upper, to: lower },
            }
        })
        .collect()
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    /// What the interface compiler does with `rule` for one native method name.
    fn apply(rule: RenameRule, qualified: &str) -> Option<String> {
        let target = Regex::new(&rule.target_pattern()).unwrap();
        if !target.is_match(qualified) {
            return None;
        }
        let tail = qualified.rsplit("::").next().unwrap();
        let mut exposed = String::new();
        exposed.push(rule.to);
        exposed.push_str(&tail[rule.from.len_utf8()..]);
        Some(exposed)
    }

    /// Exposed name after the whole letter block; untargeted names keep their last segment.
    fn expose_method_name(qualified: &str, case: MethodCase) -> String {
        letter_rules(case)
            .into_iter()
            .find_map(|rule| apply(rule, qualified))
            .unwrap_or_else(|| qualified.rsplit("::").next().unwrap().to_string())
    }

    #[test]
    fn renders_upper_case_rule() {
        let rule = letter_rules(MethodCase::Upper)[6];
        assert_eq!(
            rule.render(),
            r#"%rename("%(regex:/::g([^:]*)$/G\\1/)s", fullname=1, regextarget=1, %$isfunction) "^carto::.+::g[^:]*$";"#
        );
    }

    #[test]
    fn renders_lower_case_rule() {
        let rule = letter_rules(MethodCase::Lower)[0];
        assert_eq!(
            rule.render(),
            r#"%rename("%(regex:/::A([^:]*)$/a\\1/)s", fullname=1, regextarget=1, %$isfunction) "^carto::.+::A[^:]*$";"#
        );
    }

    #[test]
    fn rule_block_covers_every_letter() {
        let convention = NamingConvention {
            method_case: MethodCase::Upper,
            extra_rules: &["%rename(\"X\") \"\";"],
            skip_for_stl_wrappers: false,
        };
        let block = convention.rule_block();
        assert_eq!(block.len(), 26 + 1 + 1);
        assert_eq!(block[26], "%rename(\"X\") \"\";");
        assert_eq!(block[27], "");
    }

    #[test]
    fn every_lower_initial_method_is_capitalized() {
        for letter in 'a'..='z' {
            let native = format!("carto::Layer::{letter}ookup");
            let exposed = expose_method_name(&native, MethodCase::Upper);
            assert_eq!(exposed, format!("{}ookup", letter.to_ascii_uppercase()));
        }
    }

    #[test]
    fn every_upper_initial_method_is_lowered() {
        for letter in 'A'..='Z' {
            let native = format!("carto::vt::Tile{letter}::{letter}etValue");
            let exposed = expose_method_name(&native, MethodCase::Lower);
            assert_eq!(exposed, format!("{}etValue", letter.to_ascii_lowercase()));
        }
    }

    #[test]
    fn names_outside_root_namespace_are_untouched() {
        assert_eq!(
            expose_method_name("std::vector::push_back", MethodCase::Upper),
            "push_back"
        );
        // Needs at least one class segment below the root.
        assert_eq!(
            expose_method_name("carto::free", MethodCase::Upper),
            "free"
        );
    }

    #[test]
    fn stl_wrappers_only_skip_when_configured() {
        let skipping = NamingConvention {
            method_case: MethodCase::Lower,
            extra_rules: &[],
            skip_for_stl_wrappers: true,
        };
        assert!(skipping.applies_to("Layer.h", "NutiSwig.i", false));
        assert!(!skipping.applies_to("Layer.h", "NutiSwig.i", true));
        assert!(!skipping.applies_to("NutiSwig.i", "NutiSwig.i", false));

        let never = NamingConvention {
            method_case: MethodCase::Upper,
            extra_rules: &[],
            skip_for_stl_wrappers: false,
        };
        assert!(never.applies_to("Layer.h", "NutiSwig.i", true));
    }

    #[test]
    fn capitalize_first_char() {
        assert_eq!(capitalize("core"), "Core");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("Ui"), "Ui");
    }
}
