// Package tree walker: mirrors source directories and computes exposed package names.

use std::path::{Path, PathBuf};

use crate::error::{Result, SwigppError};
use crate::naming::capitalize;

/// Shared base interface file, skipped at every level.
pub const BASE_INTERFACE_FILE: &str = "NutiSwig.i";

/// Irregular directory names of the managed backend's namespaces.
const PACKAGE_NAME_REMAP: &[(&str, &str)] = &[
    ("datasources", "DataSources"),
    ("packagemanager", "PackageManager"),
    ("vectorelements", "VectorElements"),
    ("vectortiles", "VectorTiles"),
    ("wrappedcommons", "WrappedCommons"),
];

/// How one directory name becomes one exposed package segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStyle {
    /// Remap table first, else first letter capitalized (`vectorelements` -> `VectorElements`).
    Remapped,
    /// Whole segment lowercased (`core` -> `core`).
    Lowercase,
}

impl PackageStyle {
    pub fn segment(self, name: &str) -> String {
        match self {
            PackageStyle::Remapped => PACKAGE_NAME_REMAP
                .iter()
                .find(|(from, _)| *from == name)
                .map(|(_, to)| to.to_string())
                .unwrap_or_else(|| capitalize(name)),
            PackageStyle::Lowercase => name.to_lowercase(),
        }
    }

    /// Apply [`PackageStyle::segment`] to every segment of a dotted name.
    pub fn dotted<'a, I>(self, segments: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .map(|s| self.segment(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// One directory of the source tree.
#[derive(Debug, Clone)]
pub struct PackageNode {
    /// Path relative to the source root.
    pub relative_path: PathBuf,
    /// Directory basename.
    pub source_name: String,
    /// Dotted exposed package, ancestors included.
    pub exposed_package: String,
    pub children: Vec<PackageNode>,
    /// Interface files directly inside this directory (base interface excluded).
    pub files: Vec<String>,
}

impl PackageNode {
    /// Visit children before this directory, recursively.
    pub fn visit_post_order<F>(&self, visit: &mut F) -> Result<()>
    where
        F: FnMut(&PackageNode) -> Result<()>,
    {
        for child in &self.children {
            child.visit_post_order(visit)?;
        }
        visit(self)
    }
}

/// Scan the package directories below `root`. Files directly in `root` belong to no
/// package and are not part of the tree.
pub fn scan_packages(root: &Path, style: PackageStyle) -> Result<Vec<PackageNode>> {
    scan_children(root, Path::new(""), "", style)
}

fn scan_children(
    dir: &Path,
    relative: &Path,
    parent_package: &str,
    style: PackageStyle,
) -> Result<Vec<PackageNode>> {
    let (dirs, _) = list_dir(dir)?;
    let mut nodes = Vec::with_capacity(dirs.len());
    for name in dirs {
        let path = dir.join(&name);
        let relative_path = relative.join(&name);
        let segment = style.segment(&name);
        let exposed_package = if parent_package.is_empty() {
            segment
        } else {
            format!("{parent_package}.{segment}")
        };
        let children = scan_children(&path, &relative_path, &exposed_package, style)?;
        let (_, files) = list_dir(&path)?;
        nodes.push(PackageNode {
            relative_path,
            source_name: name,
            exposed_package,
            children,
            files,
        });
    }
    Ok(nodes)
}

/// Sorted visible subdirectories and sorted regular files of `dir`.
fn list_dir(dir: &Path) -> Result<(Vec<String>, Vec<String>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(SwigppError::io(dir))? {
        let entry = entry.map_err(SwigppError::io(dir))?;
        let file_type = entry.file_type().map_err(SwigppError::io(entry.path()))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            crate::diag_warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        if file_type.is_dir() {
            if !name.starts_with('.') {
                dirs.push(name);
            }
        } else if file_type.is_file() && name != BASE_INTERFACE_FILE {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();
    Ok((dirs, files))
}
