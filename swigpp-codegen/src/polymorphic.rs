// Polymorphic dispatch fragments: registration, accessors, proxy typemaps and factory.

use crate::error::Result;
use crate::instantiate::{TemplateArgs, instantiate};
use crate::templates::{Template, TemplateSet};

const REGISTRY_INCLUDES: [&str; 2] = [
    r#"#include "components/ClassRegistry.h""#,
    r#"#include "components/Director.h""#,
];

/// Output of one directive: inline interface lines plus deferred per-class content.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Emitted at the directive site.
    pub interface: Vec<String>,
    /// Deferred into the class code block.
    pub code: Vec<String>,
    /// Deferred into the class interface section (split-section backends only).
    pub class_interface: Vec<String>,
}

fn lines_of(template: &Option<Template>, args: &TemplateArgs) -> Result<Vec<String>> {
    match template {
        Some(t) => instantiate(t, args),
        None => Ok(Vec::new()),
    }
}

/// Expand a polymorphic shared-pointer directive.
///
/// Interface order: shared-pointer declaration, prelude, native registration block,
/// `%extend` with the class-name accessor before the director accessor, proxy typemaps.
pub fn expand_polymorphic(set: &TemplateSet, args: &TemplateArgs) -> Result<Expansion> {
    let p = &set.polymorphic;
    let class_name = args.get("CLASSNAME").unwrap_or_default().to_string();

    let mut interface = lines_of(&set.shared_ptr, args)?;
    interface.extend(lines_of(&p.prelude, args)?);

    if let Some(registration) = &p.registration {
        interface.push(String::new());
        interface.push("%{".to_string());
        interface.extend(REGISTRY_INCLUDES.iter().map(|s| s.to_string()));
        interface.extend(instantiate(registration, args)?);
        interface.push("%}".to_string());
    }

    let accessors: Vec<Vec<String>> = [&p.class_name_accessor, &p.director_accessor]
        .into_iter()
        .map(|t| lines_of(t, args))
        .collect::<Result<_>>()?;
    if accessors.iter().any(|a| !a.is_empty()) {
        interface.push(String::new());
        interface.push(format!("%extend {class_name} {{"));
        let mut first = true;
        for accessor in accessors.into_iter().filter(|a| !a.is_empty()) {
            if !first {
                interface.push(String::new());
            }
            interface.extend(accessor);
            first = false;
        }
        interface.push("}".to_string());
    }

    interface.extend(lines_of(&p.proxy_typemaps, args)?);

    let mut code = lines_of(&set.shared_ptr_code, args)?;
    code.extend(lines_of(&p.proxy_factory, args)?);

    Ok(Expansion {
        interface,
        code,
        class_interface: lines_of(&p.proxy_factory_interface, args)?,
    })
}
