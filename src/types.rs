/// Core domain types for parsed Java sources.
use std::path::PathBuf;

/// An import statement as it appears at the top of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportSpec {
    /// A single fully-qualified class import such as `import other.Thing;`.
    Single {
        /// Simple class name (`Thing`).
        class: String,
        /// Declaring package (`other`).
        package: String,
    },
    /// A wildcard package import such as `import java.util.*;`.
    Wildcard(
        /// The imported package name without the trailing `.*`.
        String,
    ),
}

impl ImportSpec {
    /// Parse a raw import token (`a.b.Thing` or `a.b.*`).
    /// A token without a dot is treated as a wildcard on itself — the
    /// parser has no way to tell a lone class in the default package
    /// from a package name, and the original resolved both through the
    /// package table anyway.
    pub fn parse(raw: &str) -> ImportSpec {
        if let Some(package) = raw.strip_suffix(".*") {
            return ImportSpec::Wildcard(package.to_owned());
        }
        match raw.rsplit_once('.') {
            Some((package, class)) => ImportSpec::Single {
                package: package.to_owned(),
                class: class.to_owned(),
            },
            None => ImportSpec::Wildcard(raw.to_owned()),
        }
    }

    /// The package this import brings into scope.
    pub fn package(&self) -> &str {
        match self {
            ImportSpec::Single { package, .. } => package,
            ImportSpec::Wildcard(package) => package,
        }
    }
}

/// A class, interface, enum, or record declaration found in a source file.
/// Nested types carry their enclosing type as a dotted prefix
/// (`Outer.Inner`). The filename is shared by every type in the file, since
/// all of them link to the one HTML page generated for that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Stem of the declaring file, without path or `.java` extension.
    pub filename: String,
    /// Qualified-within-file name (`Outer`, `Outer.Inner`, ...).
    pub name: String,
}

/// One parsed source file. Immutable once the parser has produced it;
/// deduplicated per run by the symbol table's file cache.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Stem of the file, without path or `.java` extension.
    pub filename: String,
    /// Imports in file order, always seeded with the implicit `java.lang.*`.
    pub imports: Vec<ImportSpec>,
    /// Declared package, empty string for the default package.
    pub package: String,
    /// Absolute path of the file on disk.
    pub path: PathBuf,
    /// Type declarations in declaration order, nested types included.
    pub types: Vec<TypeDeclaration>,
}

/// Strip the path and the `.java` extension from a source path.
pub fn filename_stem(path: &std::path::Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".java") {
        Some(stem) => stem.to_owned(),
        None => name,
    }
}
