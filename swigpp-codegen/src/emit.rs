// Output buffer with insertion markers, resolved in the second pass.

/// Deferred insertion points of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Where the collected import block goes (first imports directive).
    Imports,
    /// Where the collected per-class code goes (first include).
    ClassCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Line(String),
    Marker(Marker),
}

/// Ordered list of emitted lines plus at most one marker of each kind.
///
/// Markers hold their place in the stream, so splicing several blocks never shifts
/// another insertion point.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    items: Vec<Item>,
    imports_placed: bool,
    class_code_placed: bool,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.items.push(Item::Line(line.into()));
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.items.extend(lines.into_iter().map(Item::Line));
    }

    /// Place `marker` at the current position unless it was placed before.
    /// Returns whether it was placed now.
    pub fn mark(&mut self, marker: Marker) -> bool {
        let placed = match marker {
            Marker::Imports => &mut self.imports_placed,
            Marker::ClassCode => &mut self.class_code_placed,
        };
        if *placed {
            return false;
        }
        *placed = true;
        self.items.push(Item::Marker(marker));
        true
    }

    pub fn is_marked(&self, marker: Marker) -> bool {
        match marker {
            Marker::Imports => self.imports_placed,
            Marker::ClassCode => self.class_code_placed,
        }
    }

    /// Second pass: replace each marker with the block `render` produces for it.
    pub fn resolve<F>(self, mut render: F) -> Vec<String>
    where
        F: FnMut(Marker) -> Vec<String>,
    {
        let mut out = Vec::with_capacity(self.items.len());
        for item in self.items {
            match item {
                Item::Line(line) => out.push(line),
                Item::Marker(marker) => out.extend(render(marker)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_placed_once() {
        let mut buf = OutputBuffer::new();
        assert!(buf.mark(Marker::Imports));
        assert!(!buf.mark(Marker::Imports));
        assert!(buf.is_marked(Marker::Imports));
        assert!(!buf.is_marked(Marker::ClassCode));
    }

    #[test]
    fn resolve_splices_blocks_at_their_markers() {
        let mut buf = OutputBuffer::new();
        buf.push("%module LayerModule");
        buf.mark(Marker::Imports);
        buf.push("");
        buf.mark(Marker::ClassCode);
        buf.push("%include \"Layer.h\"");

        let out = buf.resolve(|m| match m {
            Marker::Imports => vec!["IMPORTS".to_string()],
            Marker::ClassCode => vec!["CODE1".to_string(), "CODE2".to_string()],
        });
        assert_eq!(
            out,
            vec!["%module LayerModule", "IMPORTS", "", "CODE1", "CODE2", "%include \"Layer.h\""]
        );
    }

    #[test]
    fn empty_blocks_leave_lines_untouched() {
        let mut buf = OutputBuffer::new();
        buf.push("a");
        buf.mark(Marker::ClassCode);
        buf.push("b");
        assert_eq!(buf.resolve(|_| Vec::new()), vec!["a", "b"]);
    }
}
