// Directive template table: per-backend parameterized text. Pure data, no logic.

/// One parameterized text template. Placeholders are written `$NAME$`.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Qualified name used in diagnostics, e.g. `csharp.value_type`.
    pub name: &'static str,
    pub text: &'static str,
}

impl Template {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Template { name, text }
    }
}

/// Templates for the four polymorphic dispatch fragments plus their typemap glue.
#[derive(Debug)]
pub struct PolymorphicTemplates {
    /// Interface lines emitted right after the shared-pointer declaration.
    pub prelude: Option<Template>,
    /// Static class-identity registration statement (native side).
    pub registration: Option<Template>,
    /// Body of the class-name accessor, placed inside `%extend`.
    pub class_name_accessor: Option<Template>,
    /// Body of the director accessor, placed inside `%extend`.
    pub director_accessor: Option<Template>,
    /// Output typemaps routing every outward crossing through the factory.
    pub proxy_typemaps: Option<Template>,
    /// Proxy-side factory deferred into the class code block.
    pub proxy_factory: Option<Template>,
    /// Declaration of the factory for backends with separate interface sections.
    pub proxy_factory_interface: Option<Template>,
}

/// Complete template set of one backend. `None` means the directive expands to
/// nothing and the source line is dropped.
#[derive(Debug)]
pub struct TemplateSet {
    pub value_type: Option<Template>,
    pub shared_ptr: Option<Template>,
    /// Deferred class code contributed by every shared-pointer directive.
    pub shared_ptr_code: Option<Template>,
    pub value_template: Option<Template>,
    pub enum_decl: Option<Template>,
    pub standard_equals: Option<Template>,
    pub standard_equals_code: Option<Template>,
    pub custom_equals: Option<Template>,
    pub custom_equals_code: Option<Template>,
    /// Interface-section declaration of the equality methods.
    pub equals_interface: Option<Template>,
    pub custom_tostring: Option<Template>,
    pub ro_attribute: Option<Template>,
    pub ro_attribute_code: Option<Template>,
    pub rw_attribute: Option<Template>,
    pub rw_attribute_code: Option<Template>,
    pub polymorphic: PolymorphicTemplates,
}

impl TemplateSet {
    /// Every template present in the set.
    pub fn all(&self) -> Vec<&Template> {
        let p = &self.polymorphic;
        [
            &self.value_type,
            &self.shared_ptr,
            &self.shared_ptr_code,
            &self.value_template,
            &self.enum_decl,
            &self.standard_equals,
            &self.standard_equals_code,
            &self.custom_equals,
            &self.custom_equals_code,
            &self.equals_interface,
            &self.custom_tostring,
            &self.ro_attribute,
            &self.ro_attribute_code,
            &self.rw_attribute,
            &self.rw_attribute_code,
            &p.prelude,
            &p.registration,
            &p.class_name_accessor,
            &p.director_accessor,
            &p.proxy_typemaps,
            &p.proxy_factory,
            &p.proxy_factory_interface,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
        .collect()
    }
}
