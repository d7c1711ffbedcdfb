//! Run orchestration: prune roots, populate the symbol table, transform
//! every source file, then render the navigation index and stylesheet.

use std::path::{Path, PathBuf};

use crate::config::Options;
use crate::error::Error;
use crate::index::DirectoryIndexer;
use crate::scanner::SourceFilter;
use crate::symbols::SymbolTable;
use crate::template::Templates;
use crate::transform::FileTransformer;

/// Counters reported after a successful run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    /// Source files transformed into pages.
    pub files: usize,
    /// Distinct packages seen across all roots.
    pub packages: usize,
}

/// One cross-referencing run over a set of source roots.
pub struct Xref<'a> {
    dest: &'a Path,
    options: &'a Options,
    verbose: bool,
}

impl<'a> Xref<'a> {
    pub fn new(options: &'a Options, dest: &'a Path, verbose: bool) -> Self {
        Xref {
            dest,
            options,
            verbose,
        }
    }

    /// Run the whole pipeline. Scanning and symbol collection finish over
    /// every root before the first page is written, so cross-root
    /// references resolve regardless of root order.
    ///
    /// # Errors
    ///
    /// The first scan, parse, template, or write failure aborts the run.
    pub fn run(&self, source_roots: &[PathBuf]) -> Result<RunSummary, Error> {
        let filter = SourceFilter::with_defaults(&self.options.includes, &self.options.excludes)?;
        let roots = filter.prune_roots(source_roots);

        let mut symbols = SymbolTable::new(self.options.input_encoding);
        let mut scanned: Vec<PathBuf> = Vec::new();
        for root in &roots {
            scanned.extend(symbols.process(root, &filter)?);
        }

        let transformer = FileTransformer::new(&symbols, self.options);
        for path in &scanned {
            let dest = self.dest_page(&symbols, path)?;
            if self.verbose {
                eprintln!("{} -> {}", path.display(), dest.display());
            }
            transformer.transform(path, &dest)?;
        }

        let templates = Templates::new(
            self.options.template_dir.as_deref(),
            &self.options.templates_version,
        );
        DirectoryIndexer::new(&symbols, &templates, self.options, self.dest).process()?;
        self.write_stylesheet(&templates)?;

        Ok(RunSummary {
            files: scanned.len(),
            packages: symbols.packages().count(),
        })
    }

    /// Destination page for a scanned file: the package's directory under
    /// the destination root, plus the file stem with an `.html` extension.
    /// Keeps page locations consistent with every href the highlighter
    /// emits, even when the source tree layout disagrees with the package
    /// statements.
    fn dest_page(&self, symbols: &SymbolTable, source: &Path) -> Result<PathBuf, Error> {
        let file = symbols.file(source).ok_or_else(|| Error::FileNotFound {
            path: source.to_path_buf(),
        })?;
        let mut dest = self.dest.to_path_buf();
        if !file.package.is_empty() {
            dest.push(file.package.replace('.', "/"));
        }
        dest.push(format!("{}.html", file.filename));
        Ok(dest)
    }

    fn write_stylesheet(&self, templates: &Templates) -> Result<(), Error> {
        let css = templates.stylesheet()?;
        let path = self.dest.join("stylesheet.css");
        std::fs::write(&path, css).map_err(|e| Error::OutputWrite {
            path,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_source(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn run_produces_pages_index_and_stylesheet() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        write_source(&src, "foo/Bar.java", "package foo;\npublic class Bar { }\n");
        write_source(&src, "foo/Test.java", "package foo;\npublic class Test { }\n");

        let out = tmp.path().join("xref");
        std::fs::create_dir_all(&out).unwrap();
        let options = Options::default();
        let summary = Xref::new(&options, &out, false).run(&[src]).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.packages, 1);
        for page in [
            "foo/Bar.html",
            "foo/Test.html",
            "index.html",
            "stylesheet.css",
            "foo/package-summary.html",
        ] {
            assert!(out.join(page).exists(), "missing {page}");
        }
    }

    #[test]
    fn cross_root_references_resolve() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        write_source(&first, "a/Used.java", "package a;\npublic class Used { }\n");
        write_source(
            &second,
            "b/User.java",
            "package b;\nimport a.Used;\npublic class User { Used u; }\n",
        );

        let out = tmp.path().join("xref");
        std::fs::create_dir_all(&out).unwrap();
        let options = Options::default();
        Xref::new(&options, &out, false)
            .run(&[first, second])
            .unwrap();

        let page = std::fs::read_to_string(out.join("b/User.html")).unwrap();
        assert!(
            page.contains("href=\"../a/Used.html#Used\""),
            "reference across roots must link: {page}"
        );
    }

    #[test]
    fn default_package_pages_land_at_the_root() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        write_source(&src, "deep/dir/Lone.java", "class Lone { }\n");

        let out = tmp.path().join("xref");
        std::fs::create_dir_all(&out).unwrap();
        let options = Options::default();
        Xref::new(&options, &out, false).run(&[src]).unwrap();
        assert!(out.join("Lone.html").exists());
    }

    #[test]
    fn two_runs_over_the_same_tree_are_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        write_source(&src, "a/A.java", "package a;\npublic class A { A next; }\n");
        write_source(&src, "a/B.java", "package a;\nimport a.A;\nclass B { }\n");

        let mut options = Options::default();
        options.bottom = "fixed footer".to_owned();

        let render = |out: &Path| -> Vec<(String, Vec<u8>)> {
            std::fs::create_dir_all(out).unwrap();
            Xref::new(&options, out, false).run(&[src.clone()]).unwrap();
            let mut pages: Vec<(String, Vec<u8>)> = walkdir::WalkDir::new(out)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| {
                    let rel = e
                        .path()
                        .strip_prefix(out)
                        .unwrap()
                        .to_string_lossy()
                        .into_owned();
                    (rel, std::fs::read(e.path()).unwrap())
                })
                .collect();
            pages.sort();
            pages
        };

        let first = render(&tmp.path().join("out1"));
        let second = render(&tmp.path().join("out2"));
        assert_eq!(first, second);
    }
}
