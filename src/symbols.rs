//! Project-wide symbol table: packages, their declared types, and the
//! per-run cache of parsed files.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::Encoding;
use crate::error::Error;
use crate::parser;
use crate::scanner::SourceFilter;
use crate::types::{SourceFile, TypeDeclaration};

/// A named bucket of declared types sharing a dotted namespace. The empty
/// name is the default package.
#[derive(Debug, Default)]
pub struct Package {
    name: String,
    /// Keyed by qualified-within-file type name; last declaration wins.
    types: BTreeMap<String, TypeDeclaration>,
}

impl Package {
    pub fn new(name: &str) -> Self {
        Package {
            name: name.to_owned(),
            types: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merge a declaration into this package, replacing any previous type
    /// of the same name.
    pub fn add_type(&mut self, decl: TypeDeclaration) {
        self.types.insert(decl.name.clone(), decl);
    }

    /// Look up a type by its (possibly dotted) within-file name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDeclaration> {
        self.types.get(name)
    }

    /// All types in the package, ordered by name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values()
    }
}

/// Per-run cache mapping source path to its parse result, so each file is
/// parsed at most once. Constructed once per run and passed down — there is
/// no process-wide state.
#[derive(Debug)]
pub struct FileCache {
    encoding: Encoding,
    files: HashMap<PathBuf, SourceFile>,
}

impl FileCache {
    pub fn new(encoding: Encoding) -> Self {
        FileCache {
            encoding,
            files: HashMap::new(),
        }
    }

    /// Get a file's parse result, parsing it on first sight.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound`, `Error::Io`, or `Error::Decode` from
    /// the underlying parse.
    pub fn get(&mut self, path: &Path) -> Result<&SourceFile, Error> {
        if !self.files.contains_key(path) {
            let parsed = parser::parse_source(path, self.encoding)?;
            self.files.insert(path.to_path_buf(), parsed);
        }
        Ok(&self.files[path])
    }

    /// Get an already-parsed file without touching the disk.
    pub fn cached(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }
}

/// All packages seen in one run, assembled by scanning every source root
/// once. Read-only once population finishes; the transform phase only ever
/// borrows it immutably.
#[derive(Debug)]
pub struct SymbolTable {
    cache: FileCache,
    packages: BTreeMap<String, Package>,
    /// Roots already processed; re-processing one is a no-op.
    roots: HashSet<PathBuf>,
}

impl SymbolTable {
    pub fn new(encoding: Encoding) -> Self {
        SymbolTable {
            cache: FileCache::new(encoding),
            packages: BTreeMap::new(),
            roots: HashSet::new(),
        }
    }

    /// Look up a package by dotted name (empty string = default package).
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// All packages, ordered by name.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// A previously-parsed file, by path.
    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.cache.cached(path)
    }

    /// Scan a source root, parse every matching file, and merge each file's
    /// declarations into the package named by its declaration. Returns the
    /// matched file paths in scan order; a root processed before yields an
    /// empty list and does no work.
    ///
    /// # Errors
    ///
    /// Any scan or parse failure aborts the run — there is no
    /// partial-success contract at this level.
    pub fn process(&mut self, root: &Path, filter: &SourceFilter) -> Result<Vec<PathBuf>, Error> {
        if !self.roots.insert(root.to_path_buf()) {
            return Ok(Vec::new());
        }

        let files = filter.find_sources(root)?;
        for path in &files {
            let parsed = self.cache.get(path)?;
            let package_name = parsed.package.clone();
            let types = parsed.types.clone();

            let package = self
                .packages
                .entry(package_name.clone())
                .or_insert_with(|| Package::new(&package_name));
            for decl in types {
                package.add_type(decl);
            }
        }

        Ok(files)
    }
}
