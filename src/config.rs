//! Run configuration: `jxref.toml` plus CLI overrides, source/output
//! encodings, and footer placeholder expansion.

use std::path::{Path, PathBuf};

use chrono::Datelike as _;

use crate::error::Error;

/// Character encodings jxref can read and write. UTF-8 is the default;
/// ISO-8859-1 is kept for the older trees this tool is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Latin1,
    Utf8,
}

impl Encoding {
    /// Parse an encoding name as configured.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedEncoding` for anything but UTF-8 and
    /// ISO-8859-1 spellings.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            _ => Err(Error::UnsupportedEncoding {
                name: name.to_owned(),
            }),
        }
    }

    /// Canonical name, as emitted into HTML meta tags.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Utf8 => "UTF-8",
        }
    }

    /// Decode raw file bytes. `None` means the bytes are not valid under
    /// this encoding (ISO-8859-1 accepts any byte sequence).
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode text for output. Characters outside ISO-8859-1 become
    /// numeric character references so the page stays lossless.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for c in text.chars() {
                    let code = u32::from(c);
                    if code <= 0xFF {
                        out.push(code as u8);
                    } else {
                        out.extend_from_slice(format!("&#{code};").as_bytes());
                    }
                }
                out
            },
        }
    }
}

/// Everything the pipeline needs to know for one run, fully resolved:
/// file config and CLI flags have already been merged by the time this
/// struct exists.
#[derive(Debug, Clone)]
pub struct Options {
    /// Footer text for every generated page, placeholders already expanded.
    pub bottom: String,
    /// Page heading for the summary pages.
    pub doc_title: String,
    /// Exclude glob patterns (built-in excludes are appended later).
    pub excludes: Vec<String>,
    /// Include glob patterns (empty = default `**/*.java`).
    pub includes: Vec<String>,
    /// Encoding of the source files.
    pub input_encoding: Encoding,
    /// Location of generated javadoc to link against, if any.
    pub javadoc_dir: Option<PathBuf>,
    /// Encoding of the generated HTML.
    pub output_encoding: Encoding,
    /// Revision label threaded through for page footers; informational.
    pub revision: String,
    /// External template directory overriding the built-in set.
    pub template_dir: Option<PathBuf>,
    /// Version tag selecting one of the built-in template generations.
    pub templates_version: String,
    /// `<title>` text for the navigation frameset.
    pub window_title: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            bottom: String::new(),
            doc_title: "jxref".to_owned(),
            excludes: Vec::new(),
            includes: Vec::new(),
            input_encoding: Encoding::Utf8,
            javadoc_dir: None,
            output_encoding: Encoding::Utf8,
            revision: String::new(),
            template_dir: None,
            templates_version: "1.8".to_owned(),
            window_title: "jxref".to_owned(),
        }
    }
}

/// Raw TOML structure for `jxref.toml`. Every field is optional; CLI flags
/// override whatever is set here.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub doc_title: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub inception_year: Option<i32>,
    #[serde(default)]
    pub input_encoding: Option<String>,
    #[serde(default)]
    pub javadoc_dir: Option<PathBuf>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub output_encoding: Option<String>,
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    #[serde(default)]
    pub templates_version: Option<String>,
    #[serde(default)]
    pub window_title: Option<String>,
}

impl FileConfig {
    /// Load `jxref.toml` from the working directory. Returns defaults if
    /// the file doesn't exist. Returns an error if the file exists but is
    /// malformed — never silently falls back when the user wrote a config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let path = dir.join("jxref.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        Ok(toml::from_str(&content)?)
    }
}

/// Expand `{currentYear}`, `{inceptionYear}`, and `{organizationName}` in
/// the footer text. An inception year equal to the current year collapses
/// the `{inceptionYear}-{currentYear}` range to the single year. The
/// expansion happens here, before the text ever reaches the transform or
/// index code — those treat the footer as opaque.
pub fn expand_bottom(template: &str, inception_year: Option<i32>, organization: &str) -> String {
    expand_bottom_with_year(
        template,
        chrono::Local::now().year(),
        inception_year,
        organization,
    )
}

fn expand_bottom_with_year(
    template: &str,
    current_year: i32,
    inception_year: Option<i32>,
    organization: &str,
) -> String {
    let current = current_year.to_string();
    let mut text = template.to_owned();

    match inception_year {
        Some(year) if year != current_year => {
            text = text.replace("{inceptionYear}", &year.to_string());
        },
        _ => {
            // Same year or unknown: collapse the range.
            text = text
                .replace("{inceptionYear}-{currentYear}", "{currentYear}")
                .replace("{inceptionYear}", &current);
        },
    }

    text.replace("{currentYear}", &current)
        .replace("{organizationName}", organization)
}
