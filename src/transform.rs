//! Assembles one HTML page per source file: header, numbered and
//! highlighted source lines, footer.

use std::path::Path;

use crate::config::Options;
use crate::error::Error;
use crate::highlight::{self, LineHighlighter};
use crate::symbols::SymbolTable;
use crate::types::SourceFile;

/// Per-run page assembler. Borrows the populated symbol table; a fresh
/// `LineHighlighter` is created for every file so no highlighting state
/// leaks between files.
pub struct FileTransformer<'a> {
    options: &'a Options,
    symbols: &'a SymbolTable,
}

impl<'a> FileTransformer<'a> {
    pub fn new(symbols: &'a SymbolTable, options: &'a Options) -> Self {
        FileTransformer { symbols, options }
    }

    /// Transform one already-scanned source file into an HTML page at
    /// `dest`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the file was never scanned,
    /// `Error::Decode` if it no longer decodes, and `Error::OutputWrite`
    /// if the destination cannot be written.
    pub fn transform(&self, source: &Path, dest: &Path) -> Result<(), Error> {
        let file = self
            .symbols
            .file(source)
            .ok_or_else(|| Error::FileNotFound {
                path: source.to_path_buf(),
            })?;

        let bytes = std::fs::read(source)?;
        let content = self
            .options
            .input_encoding
            .decode(&bytes)
            .ok_or_else(|| Error::Decode {
                encoding: self.options.input_encoding.name().to_owned(),
                path: source.to_path_buf(),
            })?;

        let page = self.render_page(file, &content);

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::OutputWrite {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        std::fs::write(dest, self.options.output_encoding.encode(&page)).map_err(|e| {
            Error::OutputWrite {
                path: dest.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    fn render_page(&self, file: &SourceFile, content: &str) -> String {
        let mut page = String::with_capacity(content.len() * 3);
        self.append_header(&mut page, file);

        let mut highlighter = LineHighlighter::new(self.symbols, file);
        for (number, line) in content.lines().enumerate() {
            let number = number + 1;
            page.push_str(&line_anchor(number));
            page.push_str(&highlighter.highlight(line));
            page.push('\n');
        }

        self.append_footer(&mut page);
        page
    }

    fn append_header(&self, page: &mut String, file: &SourceFile) {
        let root = highlight::package_root(&file.package);
        page.push_str(concat!(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" ",
            "\"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n",
        ));
        page.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\n");
        page.push_str("<head>\n");
        page.push_str(&format!(
            "<meta http-equiv=\"content-type\" content=\"text/html; charset={}\" />\n",
            self.options.output_encoding.name(),
        ));
        page.push_str(&format!("<title>{} xref</title>\n", file.filename));
        page.push_str(&format!(
            "<link type=\"text/css\" rel=\"stylesheet\" href=\"{root}stylesheet.css\" />\n",
        ));
        page.push_str("</head>\n<body>\n");

        if let Some(href) = self.javadoc_href(file) {
            page.push_str(&format!(
                "<div id=\"overview\"><a href=\"{href}\">View Javadoc</a></div>\n",
            ));
        }

        page.push_str("<pre>\n");
    }

    fn append_footer(&self, page: &mut String) {
        page.push_str("</pre>\n<hr/>\n");
        page.push_str(&format!(
            "<div id=\"footer\">{}</div>\n",
            self.options.bottom,
        ));
        page.push_str("</body>\n</html>\n");
    }

    /// Link to the javadoc page mirroring this file, when a javadoc
    /// directory is configured. An absolute directory is used verbatim; a
    /// relative one is resolved against the destination root, so the link
    /// climbs out of the package directory first.
    fn javadoc_href(&self, file: &SourceFile) -> Option<String> {
        let javadoc_dir = self.options.javadoc_dir.as_ref()?;
        let dir = javadoc_dir.to_string_lossy().replace('\\', "/");
        let mut href = if javadoc_dir.is_absolute() {
            dir
        } else {
            format!("{}{dir}", highlight::package_root(&file.package))
        };
        if !href.ends_with('/') {
            href.push('/');
        }
        if !file.package.is_empty() {
            href.push_str(&file.package.replace('.', "/"));
            href.push('/');
        }
        href.push_str(&file.filename);
        href.push_str(".html");
        Some(href)
    }
}

/// The numbered self-link that starts every source line, space-padded so
/// columns line up through three digits.
fn line_anchor(number: usize) -> String {
    let pad = if number < 10 {
        "   "
    } else if number < 100 {
        "  "
    } else {
        " "
    };
    format!("<a class=\"jxr_linenumber\" name=\"L{number}\" href=\"#L{number}\">{number}</a>{pad}")
}
