// Per-class deferred content: imports and code bodies collected during the scan.

use indexmap::{IndexMap, IndexSet};

/// Deferred content of one native class.
#[derive(Debug, Default, Clone)]
pub struct ClassCodeEntry {
    /// Import lines, deduplicated, in first-seen order.
    pub imports: IndexSet<String>,
    /// Code fragments in directive encounter order.
    pub code: Vec<String>,
    /// Interface-section fragments (declarations), for backends that split them.
    pub interface: Vec<String>,
}

/// All deferred content of one file, keyed by native class name in encounter order.
/// Lives for exactly one file.
#[derive(Debug, Default)]
pub struct ClassCodeTable {
    entries: IndexMap<String, ClassCodeEntry>,
}

impl ClassCodeTable {
    pub fn new() -> Self {
        ClassCodeTable::default()
    }

    fn entry(&mut self, class_name: &str) -> &mut ClassCodeEntry {
        self.entries.entry(class_name.to_string()).or_default()
    }

    pub fn add_imports<I>(&mut self, class_name: &str, imports: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entry(class_name).imports.extend(imports);
    }

    pub fn add_code<I>(&mut self, class_name: &str, code: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entry(class_name).code.extend(code);
    }

    pub fn add_interface<I>(&mut self, class_name: &str, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entry(class_name).interface.extend(lines);
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassCodeEntry> {
        self.entries.get(class_name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classes that contributed at least one import.
    pub fn with_imports(&self) -> impl Iterator<Item = (&str, &ClassCodeEntry)> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.imports.is_empty())
            .map(|(k, e)| (k.as_str(), e))
    }

    /// Classes that contributed at least one code fragment.
    pub fn with_code(&self) -> impl Iterator<Item = (&str, &ClassCodeEntry)> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.code.is_empty())
            .map(|(k, e)| (k.as_str(), e))
    }

    /// Classes that contributed at least one interface fragment.
    pub fn with_interface(&self) -> impl Iterator<Item = (&str, &ClassCodeEntry)> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.interface.is_empty())
            .map(|(k, e)| (k.as_str(), e))
    }

    pub fn has_imports(&self) -> bool {
        self.with_imports().next().is_some()
    }

    pub fn has_code(&self) -> bool {
        self.entries
            .values()
            .any(|e| !e.code.is_empty() || !e.interface.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn imports_are_deduplicated_in_order() {
        let mut table = ClassCodeTable::new();
        table.add_imports("carto::Layer", lines(&["using Carto.Core;", "using Carto.Ui;"]));
        table.add_imports("carto::Layer", lines(&["using Carto.Core;", "using System;"]));
        let entry = table.get("carto::Layer").unwrap();
        let imports: Vec<&str> = entry.imports.iter().map(String::as_str).collect();
        assert_eq!(imports, vec!["using Carto.Core;", "using Carto.Ui;", "using System;"]);
    }

    #[test]
    fn code_keeps_directive_order() {
        let mut table = ClassCodeTable::new();
        table.add_code("carto::Marker", lines(&["first"]));
        table.add_code("carto::Layer", lines(&["other"]));
        table.add_code("carto::Marker", lines(&["second", "third"]));

        let classes: Vec<&str> = table.with_code().map(|(k, _)| k).collect();
        assert_eq!(classes, vec!["carto::Marker", "carto::Layer"]);
        assert_eq!(table.get("carto::Marker").unwrap().code, lines(&["first", "second", "third"]));
    }

    #[test]
    fn filters_skip_empty_sections() {
        let mut table = ClassCodeTable::new();
        table.add_imports("carto::A", lines(&["import com.carto.core.MapPos;"]));
        table.add_code("carto::B", lines(&["code"]));
        assert_eq!(table.with_imports().count(), 1);
        assert_eq!(table.with_code().count(), 1);
        assert_eq!(table.with_interface().count(), 0);
        assert!(table.has_imports());
        assert!(table.has_code());
    }
}
