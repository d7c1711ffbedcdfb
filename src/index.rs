//! Navigation index over the generated pages: a frameset entry point,
//! project-wide package and class lists, and per-package summary pages.
//!
//! The view model is rebuilt from the symbol table and ordered maps keep
//! every listing alphabetical, so the same tree always renders the same
//! pages.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Options;
use crate::error::Error;
use crate::symbols::SymbolTable;
use crate::template::Templates;

/// Display name and directory used for types without a package statement.
const DEFAULT_PACKAGE_NAME: &str = "(default package)";

/// One linkable type in the navigation pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Directory of the page, relative to the destination root.
    pub dir: String,
    /// Page file stem (the declaring file's stem).
    pub filename: String,
    /// Display name, nested prefix included.
    pub name: String,
}

/// One package and its types.
#[derive(Debug)]
pub struct PackageInfo {
    /// Types keyed by display name.
    pub classes: BTreeMap<String, ClassInfo>,
    /// Directory of the package's pages, relative to the destination root.
    pub dir: String,
    /// Display name.
    pub name: String,
    /// Prefix climbing from `dir` back to the destination root.
    pub root_ref: String,
}

/// The whole project as the navigation pages see it.
#[derive(Debug)]
pub struct ProjectInfo {
    /// Every type in every package, keyed `name#package` so equal class
    /// names in different packages both survive.
    pub all_classes: BTreeMap<String, ClassInfo>,
    /// Packages keyed by display name.
    pub packages: BTreeMap<String, PackageInfo>,
}

impl ProjectInfo {
    /// Build the view model from a populated symbol table.
    pub fn build(symbols: &SymbolTable) -> Self {
        let mut packages = BTreeMap::new();
        let mut all_classes = BTreeMap::new();

        for package in symbols.packages() {
            let (name, dir, root_ref) = if package.name().is_empty() {
                (
                    DEFAULT_PACKAGE_NAME.to_owned(),
                    ".".to_owned(),
                    "./".to_owned(),
                )
            } else {
                let dir = package.name().replace('.', "/");
                let depth = package.name().split('.').count();
                (package.name().to_owned(), dir, "../".repeat(depth))
            };

            let mut classes = BTreeMap::new();
            for decl in package.types() {
                let info = ClassInfo {
                    dir: dir.clone(),
                    filename: decl.filename.clone(),
                    name: decl.name.clone(),
                };
                all_classes.insert(format!("{}#{name}", decl.name), info.clone());
                classes.insert(decl.name.clone(), info);
            }

            packages.insert(
                name.clone(),
                PackageInfo {
                    classes,
                    dir,
                    name,
                    root_ref,
                },
            );
        }

        ProjectInfo {
            all_classes,
            packages,
        }
    }
}

/// Renders the navigation pages into a destination root.
pub struct DirectoryIndexer<'a> {
    dest: &'a Path,
    options: &'a Options,
    project: ProjectInfo,
    templates: &'a Templates,
}

impl<'a> DirectoryIndexer<'a> {
    pub fn new(
        symbols: &SymbolTable,
        templates: &'a Templates,
        options: &'a Options,
        dest: &'a Path,
    ) -> Self {
        DirectoryIndexer {
            dest,
            options,
            project: ProjectInfo::build(symbols),
            templates,
        }
    }

    /// Render all navigation pages: four at the destination root, two per
    /// package directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateNotFound` for a missing template and
    /// `Error::OutputWrite` if a page cannot be written.
    pub fn process(&self) -> Result<(), Error> {
        let common = [
            ("windowTitle", self.options.window_title.as_str()),
            ("docTitle", self.options.doc_title.as_str()),
            ("bottom", self.options.bottom.as_str()),
            ("outputEncoding", self.options.output_encoding.name()),
            // Not used by the built-in sets, but external templates can
            // print it.
            ("revision", self.options.revision.as_str()),
        ];

        let package_list = self.package_list_fragment();
        let all_classes = self.all_classes_fragment();
        let package_summary = self.package_summary_fragment();

        self.render_to(self.dest.join("index.html"), "index", &common)?;
        self.render_to(
            self.dest.join("overview-frame.html"),
            "overview-frame",
            &with(&common, &[("packageListFragment", package_list.as_str())]),
        )?;
        self.render_to(
            self.dest.join("allclasses-frame.html"),
            "allclasses-frame",
            &with(&common, &[("allClassesFragment", all_classes.as_str())]),
        )?;
        self.render_to(
            self.dest.join("overview-summary.html"),
            "overview-summary",
            &with(&common, &[(
                "packageSummaryFragment",
                package_summary.as_str(),
            )]),
        )?;

        for package in self.project.packages.values() {
            let class_list = class_list_fragment(package);
            let class_summary = class_summary_fragment(package);
            let package_vars = [
                ("packageName", package.name.as_str()),
                ("rootRef", package.root_ref.as_str()),
            ];

            let dir = self.dest.join(&package.dir);
            self.render_to(
                dir.join("package-frame.html"),
                "package-frame",
                &with(&common, &[
                    package_vars[0],
                    package_vars[1],
                    ("classListFragment", class_list.as_str()),
                ]),
            )?;
            self.render_to(
                dir.join("package-summary.html"),
                "package-summary",
                &with(&common, &[
                    package_vars[0],
                    package_vars[1],
                    ("classSummaryFragment", class_summary.as_str()),
                ]),
            )?;
        }

        Ok(())
    }

    fn render_to(
        &self,
        path: std::path::PathBuf,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<(), Error> {
        let page = self.templates.render(template, vars)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::OutputWrite {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        std::fs::write(&path, self.options.output_encoding.encode(&page)).map_err(|e| {
            Error::OutputWrite {
                path,
                reason: e.to_string(),
            }
        })
    }

    /// `<li>` items linking each package's frame page, for the top-left
    /// navigation frame.
    fn package_list_fragment(&self) -> String {
        let mut out = String::new();
        for package in self.project.packages.values() {
            out.push_str(&format!(
                "<li><a href=\"{}/package-frame.html\" target=\"packageFrame\">{}</a></li>\n",
                package.dir, package.name,
            ));
        }
        out
    }

    /// `<li>` items linking every class page in the project.
    fn all_classes_fragment(&self) -> String {
        let mut out = String::new();
        for class in self.project.all_classes.values() {
            out.push_str(&format!(
                "<li><a href=\"{}/{}.html\" target=\"classFrame\">{}</a></li>\n",
                class.dir, class.filename, class.name,
            ));
        }
        out
    }

    /// Table rows linking each package's summary page.
    fn package_summary_fragment(&self) -> String {
        let mut out = String::new();
        for package in self.project.packages.values() {
            out.push_str(&format!(
                "<tr><td><a href=\"{}/package-summary.html\">{}</a></td></tr>\n",
                package.dir, package.name,
            ));
        }
        out
    }
}

/// `<li>` items for a package's own frame page. The page sits inside the
/// package directory, so links are bare file names.
fn class_list_fragment(package: &PackageInfo) -> String {
    let mut out = String::new();
    for class in package.classes.values() {
        out.push_str(&format!(
            "<li><a href=\"{}.html\" target=\"classFrame\">{}</a></li>\n",
            class.filename, class.name,
        ));
    }
    out
}

/// Table rows for a package's summary page.
fn class_summary_fragment(package: &PackageInfo) -> String {
    let mut out = String::new();
    for class in package.classes.values() {
        out.push_str(&format!(
            "<tr><td><a href=\"{}.html\">{}</a></td></tr>\n",
            class.filename, class.name,
        ));
    }
    out
}

/// Common variables plus page-specific ones, in one slice.
fn with<'v>(common: &[(&'v str, &'v str)], extra: &[(&'v str, &'v str)]) -> Vec<(&'v str, &'v str)> {
    let mut vars = common.to_vec();
    vars.extend_from_slice(extra);
    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Encoding;
    use crate::scanner::SourceFilter;

    fn populated_table(files: &[(&str, &str)]) -> (tempfile::TempDir, SymbolTable) {
        let tmp = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = tmp.path().join("src").join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        let mut table = SymbolTable::new(Encoding::Utf8);
        table
            .process(
                &tmp.path().join("src"),
                &SourceFilter::with_defaults(&[], &[]).unwrap(),
            )
            .unwrap();
        (tmp, table)
    }

    #[test]
    fn project_info_maps_packages_to_directories() {
        let (_tmp, table) = populated_table(&[(
            "a/b/C.java",
            "package a.b;\nclass C { }\n",
        )]);
        let project = ProjectInfo::build(&table);
        let package = project.packages.get("a.b").unwrap();
        assert_eq!(package.dir, "a/b");
        assert_eq!(package.root_ref, "../../");
    }

    #[test]
    fn default_package_gets_display_name_and_dot_dir() {
        let (_tmp, table) = populated_table(&[("Lone.java", "class Lone { }\n")]);
        let project = ProjectInfo::build(&table);
        let package = project.packages.get(DEFAULT_PACKAGE_NAME).unwrap();
        assert_eq!(package.dir, ".");
        assert_eq!(package.root_ref, "./");
    }

    #[test]
    fn equal_class_names_in_different_packages_both_survive() {
        let (_tmp, table) = populated_table(&[
            ("a/Dup.java", "package a;\nclass Dup { }\n"),
            ("b/Dup.java", "package b;\nclass Dup { }\n"),
        ]);
        let project = ProjectInfo::build(&table);
        assert_eq!(project.all_classes.len(), 2);
        assert!(project.all_classes.contains_key("Dup#a"));
        assert!(project.all_classes.contains_key("Dup#b"));
    }

    #[test]
    fn nested_types_appear_in_listings() {
        let (_tmp, table) = populated_table(&[(
            "a/Outer.java",
            "package a;\nclass Outer { class Inner { } }\n",
        )]);
        let project = ProjectInfo::build(&table);
        let package = project.packages.get("a").unwrap();
        let inner = package.classes.get("Outer.Inner").unwrap();
        assert_eq!(inner.filename, "Outer");
    }

    #[test]
    fn process_writes_root_and_package_pages() {
        let (_tmp, table) = populated_table(&[
            ("a/A.java", "package a;\nclass A { }\n"),
            ("b/c/D.java", "package b.c;\nclass D { }\n"),
        ]);
        let out = tempfile::tempdir().unwrap();
        let options = Options::default();
        let templates = Templates::new(None, &options.templates_version);
        let indexer = DirectoryIndexer::new(&table, &templates, &options, out.path());
        indexer.process().unwrap();

        for page in [
            "index.html",
            "overview-frame.html",
            "allclasses-frame.html",
            "overview-summary.html",
            "a/package-frame.html",
            "a/package-summary.html",
            "b/c/package-frame.html",
            "b/c/package-summary.html",
        ] {
            assert!(out.path().join(page).exists(), "missing {page}");
        }

        let all = std::fs::read_to_string(out.path().join("allclasses-frame.html")).unwrap();
        assert!(all.contains("<a href=\"a/A.html\" target=\"classFrame\">A</a>"));
        assert!(all.contains("<a href=\"b/c/D.html\" target=\"classFrame\">D</a>"));

        let summary = std::fs::read_to_string(out.path().join("b/c/package-summary.html")).unwrap();
        assert!(summary.contains("Package b.c"));
        assert!(summary.contains("<a href=\"D.html\">D</a>"));
        assert!(summary.contains("href=\"../../stylesheet.css\""));
    }
}
