//! Navigation page templates.
//!
//! Templates are plain HTML with `${name}` placeholders; rendering is a
//! flat substitution pass with no conditionals or loops. Anything
//! repetitive (package lists, class tables) is pre-rendered by the
//! indexer and passed in as one fragment variable.
//!
//! Four built-in generations ship inside the binary, selected by the
//! configured templates version. An external template directory overrides
//! the built-ins entirely.

use std::path::{Path, PathBuf};

use crate::error::Error;

/// Built-in template generations, oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Legacy,
    Jdk4,
    Jdk7,
    Jdk8,
}

impl Generation {
    /// Pick the newest generation whose minimum version the configured
    /// version string reaches. Unparseable versions land on the newest.
    pub fn select(version: &str) -> Generation {
        if version_at_least(version, "1.8") {
            Generation::Jdk8
        } else if version_at_least(version, "1.7") {
            Generation::Jdk7
        } else if version_at_least(version, "1.4") {
            Generation::Jdk4
        } else {
            Generation::Legacy
        }
    }

    fn dir_name(self) -> &'static str {
        match self {
            Generation::Legacy => "legacy",
            Generation::Jdk4 => "jdk4",
            Generation::Jdk7 => "jdk7",
            Generation::Jdk8 => "jdk8",
        }
    }
}

/// Where templates come from for this run.
#[derive(Debug)]
enum TemplateSource {
    /// One of the embedded generations.
    Builtin(Generation),
    /// A directory of `<name>.html` files supplied by the user.
    External(PathBuf),
}

/// Resolved template set for one run.
#[derive(Debug)]
pub struct Templates {
    source: TemplateSource,
}

impl Templates {
    /// Resolve the template set: an external directory when configured,
    /// otherwise the built-in generation matching the version tag.
    pub fn new(template_dir: Option<&Path>, templates_version: &str) -> Self {
        let source = match template_dir {
            Some(dir) => TemplateSource::External(dir.to_path_buf()),
            None => TemplateSource::Builtin(Generation::select(templates_version)),
        };
        Templates { source }
    }

    /// Render a page template with the given variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateNotFound` if the named template does not
    /// exist in the configured location.
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, Error> {
        let raw = self.raw(name)?;
        Ok(substitute(&raw, vars))
    }

    /// The stylesheet that accompanies this template set, written once to
    /// the destination root.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateNotFound` if an external directory has no
    /// `stylesheet.css`.
    pub fn stylesheet(&self) -> Result<String, Error> {
        match &self.source {
            TemplateSource::Builtin(generation) => Ok(builtin_stylesheet(*generation).to_owned()),
            TemplateSource::External(dir) => std::fs::read_to_string(dir.join("stylesheet.css"))
                .map_err(|_| Error::TemplateNotFound {
                    location: dir.display().to_string(),
                    name: "stylesheet".to_owned(),
                }),
        }
    }

    fn raw(&self, name: &str) -> Result<String, Error> {
        match &self.source {
            TemplateSource::Builtin(generation) => builtin_page(*generation, name)
                .map(str::to_owned)
                .ok_or_else(|| Error::TemplateNotFound {
                    location: format!("built-in set `{}`", generation.dir_name()),
                    name: name.to_owned(),
                }),
            TemplateSource::External(dir) => {
                let path = dir.join(format!("{name}.html"));
                std::fs::read_to_string(&path).map_err(|_| Error::TemplateNotFound {
                    location: dir.display().to_string(),
                    name: name.to_owned(),
                })
            },
        }
    }
}

/// Replace every `${name}` occurrence with its value. Unknown placeholders
/// stay as-is, visible in the output rather than silently dropped.
fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (name, value) in vars {
        out = out.replace(&format!("${{{name}}}"), value);
    }
    out
}

/// Compare a dotted version string against a minimum, segment by segment.
/// Missing segments count as zero; non-numeric segments as newest.
fn version_at_least(version: &str, minimum: &str) -> bool {
    let parse = |s: &str| -> Vec<u64> {
        s.split('.')
            .map(|seg| seg.trim().parse::<u64>().unwrap_or(u64::MAX))
            .collect()
    };
    let have = parse(version);
    let want = parse(minimum);
    let len = have.len().max(want.len());
    for i in 0..len {
        let h = have.get(i).copied().unwrap_or(0);
        let w = want.get(i).copied().unwrap_or(0);
        if h != w {
            return h > w;
        }
    }
    true
}

fn builtin_page(generation: Generation, name: &str) -> Option<&'static str> {
    macro_rules! pages {
        ($dir:literal) => {
            match name {
                "allclasses-frame" => Some(include_str!(concat!(
                    "templates/",
                    $dir,
                    "/allclasses-frame.html"
                ))),
                "index" => Some(include_str!(concat!("templates/", $dir, "/index.html"))),
                "overview-frame" => Some(include_str!(concat!(
                    "templates/",
                    $dir,
                    "/overview-frame.html"
                ))),
                "overview-summary" => Some(include_str!(concat!(
                    "templates/",
                    $dir,
                    "/overview-summary.html"
                ))),
                "package-frame" => Some(include_str!(concat!(
                    "templates/",
                    $dir,
                    "/package-frame.html"
                ))),
                "package-summary" => Some(include_str!(concat!(
                    "templates/",
                    $dir,
                    "/package-summary.html"
                ))),
                _ => None,
            }
        };
    }
    match generation {
        Generation::Legacy => pages!("legacy"),
        Generation::Jdk4 => pages!("jdk4"),
        Generation::Jdk7 => pages!("jdk7"),
        Generation::Jdk8 => pages!("jdk8"),
    }
}

fn builtin_stylesheet(generation: Generation) -> &'static str {
    match generation {
        Generation::Legacy => include_str!("templates/legacy/stylesheet.css"),
        Generation::Jdk4 => include_str!("templates/jdk4/stylesheet.css"),
        Generation::Jdk7 => include_str!("templates/jdk7/stylesheet.css"),
        Generation::Jdk8 => include_str!("templates/jdk8/stylesheet.css"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_selection_by_version() {
        assert_eq!(Generation::select("1.8"), Generation::Jdk8);
        assert_eq!(Generation::select("11"), Generation::Jdk8);
        assert_eq!(Generation::select("1.7"), Generation::Jdk7);
        assert_eq!(Generation::select("1.6"), Generation::Jdk4);
        assert_eq!(Generation::select("1.4"), Generation::Jdk4);
        assert_eq!(Generation::select("1.3"), Generation::Legacy);
    }

    #[test]
    fn substitution_replaces_all_occurrences() {
        let out = substitute("${a} and ${a}, plus ${b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x, plus y");
    }

    #[test]
    fn unknown_placeholder_is_left_visible() {
        let out = substitute("${known} ${unknown}", &[("known", "v")]);
        assert_eq!(out, "v ${unknown}");
    }

    #[test]
    fn every_builtin_page_exists_in_every_generation() {
        let names = [
            "allclasses-frame",
            "index",
            "overview-frame",
            "overview-summary",
            "package-frame",
            "package-summary",
        ];
        for generation in [
            Generation::Legacy,
            Generation::Jdk4,
            Generation::Jdk7,
            Generation::Jdk8,
        ] {
            for name in names {
                assert!(
                    builtin_page(generation, name).is_some(),
                    "{name} missing from {generation:?}"
                );
            }
        }
    }

    #[test]
    fn external_directory_overrides_builtins() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), "<title>${windowTitle}</title>").unwrap();
        let templates = Templates::new(Some(tmp.path()), "1.8");
        let out = templates.render("index", &[("windowTitle", "Mine")]).unwrap();
        assert_eq!(out, "<title>Mine</title>");
    }

    #[test]
    fn missing_external_template_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let templates = Templates::new(Some(tmp.path()), "1.8");
        assert!(matches!(
            templates.render("index", &[]),
            Err(Error::TemplateNotFound { .. })
        ));
    }
}
