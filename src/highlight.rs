//! Line-by-line syntax highlighter and cross-reference linker.
//!
//! Each source line is rewritten into HTML by a cascade of filters, each
//! handling one concern and handing the rest of the line to the next:
//!
//! ```text
//!  html_filter
//!    └─ ongoing_multiline_comment_filter ─ uri_filter
//!         └─ inline_comment_filter
//!              └─ begin_multiline_comment_filter ─ ongoing_multiline_comment_filter
//!                   └─ string_filter
//!                        └─ keyword_filter
//!                             └─ uri_filter
//!                                  └─ jxr_filter
//!                                       └─ import_filter
//! ```
//!
//! A `LineHighlighter` is created fresh for every file: the only mutable
//! state it owns is the comment state carried from one line into the next,
//! so transforming two files never shares anything but the read-only
//! symbol table.

use crate::symbols::SymbolTable;
use crate::tokenizer;
use crate::types::{ImportSpec, SourceFile, TypeDeclaration};

/// Java reserved words, carried verbatim from the original highlighter.
/// This is configuration data, not a statement about any language level:
/// it contains pre-1.0 leftovers (`byvalue`, `cast`, `inner`) and `var`,
/// and is missing some newer contextual keywords.
pub const RESERVED_WORDS: [&str; 56] = [
    "abstract", "boolean", "break", "byvalue", "case", "cast", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "generic", "goto", "if", "implements", "import", "inner", "int", "interface", "long",
    "native", "new", "null", "operator", "outer", "package", "private", "protected", "public",
    "rest", "return", "short", "static", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "var", "void", "volatile", "while",
];

/// Navigation page a package name links to.
pub const PACKAGE_INDEX: &str = "package-summary.html";

const COMMENT_START: &str = "<em class=\"jxr_comment\">";
const COMMENT_END: &str = "</em>";
const JAVADOC_COMMENT_START: &str = "<em class=\"jxr_javadoccomment\">";
const JAVADOC_COMMENT_END: &str = "</em>";
const STRING_START: &str = "<span class=\"jxr_string\">";
const STRING_END: &str = "</span>";
const KEYWORD_START: &str = "<strong class=\"jxr_keyword\">";
const KEYWORD_END: &str = "</strong>";

const URI_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Characters allowed in a URI besides alphanumerics, per RFC 2396.
const URI_CHARS: [char; 20] = [
    '?', '+', '%', '&', ':', '/', '.', '@', '_', ';', '=', '$', ',', '-', '!', '~', '*', '\'',
    '(', ')',
];

/// Whether the highlighter is inside a multi-line comment, and which kind.
/// Carried from one line's processing into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentState {
    /// Inside a `/* ... */` comment.
    Block,
    /// Inside a `/** ... */` doc comment.
    Doc,
    /// Not inside any multi-line comment.
    None,
}

/// Per-file line rewriting engine. Construct one per file.
pub struct LineHighlighter<'a> {
    file: &'a SourceFile,
    state: CommentState,
    symbols: &'a SymbolTable,
}

impl<'a> LineHighlighter<'a> {
    pub fn new(symbols: &'a SymbolTable, file: &'a SourceFile) -> Self {
        LineHighlighter {
            symbols,
            file,
            state: CommentState::None,
        }
    }

    /// Current comment state, exposed for tests.
    pub fn state(&self) -> CommentState {
        self.state
    }

    /// Rewrite one source line into HTML, updating the comment state for
    /// the next line. Never fails: unresolvable identifiers stay plain.
    pub fn highlight(&mut self, line: &str) -> String {
        self.html_filter(line)
    }

    /// Escape markup-significant characters. Always runs first, so every
    /// later filter operates on escaped text.
    fn html_filter(&mut self, line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }
        let escaped = line
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace("\\\\", "&#92;&#92;")
            .replace("\\\"", "\\&quot;")
            .replace("'\"'", "'&quot;'");
        self.ongoing_multiline_comment_filter(&escaped)
    }

    /// Handle a line while inside a multi-line comment, closing it if the
    /// terminator appears. The remainder after the terminator re-enters
    /// the cascade as a fresh line start.
    fn ongoing_multiline_comment_filter(&mut self, line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }
        let (start_tag, end_tag) = match self.state {
            CommentState::Doc => (JAVADOC_COMMENT_START, JAVADOC_COMMENT_END),
            CommentState::Block => (COMMENT_START, COMMENT_END),
            CommentState::None => return self.inline_comment_filter(line),
        };

        let terminator = line.find("*/");
        // Only filter the portion before the terminator: `*` and `/` are
        // valid URI characters and would get glued onto a trailing link.
        let comment = match terminator {
            Some(index) => self.uri_filter(&line[..index]),
            None => self.uri_filter(line),
        };

        let mut buf = String::with_capacity(line.len() + 64);
        buf.push_str(start_tag);
        buf.push_str(&comment);
        if let Some(index) = terminator {
            self.state = CommentState::None;
            buf.push_str("*/");
            buf.push_str(end_tag);
            if line.len() > index + 2 {
                buf.push_str(&self.inline_comment_filter(&line[index + 2..]));
            }
        } else {
            buf.push_str(end_tag);
        }
        buf
    }

    /// Wrap a `//` comment, unless the marker sits inside a string literal.
    fn inline_comment_filter(&mut self, line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }
        if let Some(index) = line.find("//")
            && !is_inside_string(line, index)
        {
            return format!(
                "{}{COMMENT_START}{}{COMMENT_END}",
                self.begin_multiline_comment_filter(&line[..index]),
                &line[index..],
            );
        }
        self.begin_multiline_comment_filter(line)
    }

    /// Detect the start of a multi-line comment and switch state. The
    /// text from the opener onward is re-processed so a same-line `*/`
    /// closes it again.
    fn begin_multiline_comment_filter(&mut self, line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }
        if let Some(index) = line.find("/*")
            && !is_inside_string(line, index)
        {
            let from_index = &line[index..];
            if from_index.starts_with("/**") && !from_index.starts_with("/**/") {
                self.state = CommentState::Doc;
            } else {
                self.state = CommentState::Block;
            }
            let before = self.string_filter(&line[..index]);
            return format!("{before}{}", self.ongoing_multiline_comment_filter(from_index));
        }
        self.string_filter(line)
    }

    /// Wrap string literals, alternating plain/string segments on quote
    /// characters. Plain segments continue down the cascade.
    fn string_filter(&mut self, line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }
        if !line.contains('"') {
            return self.keyword_filter(line);
        }

        let mut buf = String::with_capacity(line.len() + 32);
        let mut rest = line;
        let mut in_string = false;
        while let Some(index) = rest.find('"') {
            if in_string {
                buf.push_str(&rest[..=index]);
                buf.push_str(STRING_END);
            } else {
                buf.push_str(&self.keyword_filter(&rest[..index]));
                buf.push_str(STRING_START);
                buf.push('"');
            }
            in_string = !in_string;
            rest = &rest[index + 1..];
        }
        buf.push_str(&self.keyword_filter(rest));
        buf
    }

    /// Wrap reserved words. A `class` immediately followed by `=` is a CSS
    /// class attribute from earlier markup insertion, not the keyword, and
    /// stays plain.
    fn keyword_filter(&mut self, line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }

        let mut out = String::with_capacity(line.len() + 32);
        let mut chars = line.char_indices().peekable();
        while let Some(&(start, c)) = chars.peek() {
            if !c.is_ascii_alphabetic() {
                out.push(c);
                chars.next();
                continue;
            }
            let mut end = start;
            while let Some(&(i, w)) = chars.peek() {
                if w.is_ascii_alphabetic() {
                    end = i + w.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &line[start..end];
            let next_char = chars.peek().map(|&(_, n)| n);
            if word == "class" && next_char == Some('=') {
                out.push_str(word);
            } else if RESERVED_WORDS.contains(&word) {
                out.push_str(KEYWORD_START);
                out.push_str(word);
                out.push_str(KEYWORD_END);
            } else {
                out.push_str(word);
            }
        }
        self.uri_filter(&out)
    }

    /// Turn recognized URIs into anchors, then hand the line to the
    /// cross-reference filter — unless a multi-line comment is open, in
    /// which case cross-referencing is skipped.
    fn uri_filter(&mut self, line: &str) -> String {
        let mut line = line.to_owned();
        for scheme in URI_SCHEMES {
            let Some(start) = line.find(scheme) else {
                continue;
            };
            let mut end = start;
            for (offset, c) in line[start..].char_indices() {
                if !c.is_alphanumeric() && !URI_CHARS.contains(&c) {
                    break;
                }
                end = start + offset + c.len_utf8();
            }
            if end > start {
                let uri = line[start..end].to_owned();
                let anchor = format!("<a href=\"{uri}\" target=\"alexandria_uri\">{uri}</a>");
                line = line.replace(uri.as_str(), &anchor);
            }
        }

        if self.state == CommentState::None {
            return self.jxr_filter(&line);
        }
        line
    }

    /// Cross-reference identifiers against the symbol table: plain simple
    /// names resolve through the in-scope packages (current ∪ imported);
    /// dotted names resolve as fully-qualified references against any
    /// known package, imported or not.
    fn jxr_filter(&mut self, line: &str) -> String {
        let mut line = line.to_owned();

        // In-scope packages, deduplicated and ordered for determinism.
        let mut packages: Vec<&str> = self.file.imports.iter().map(|i| i.package()).collect();
        packages.push(&self.file.package);
        packages.sort_unstable();
        packages.dedup();

        let words = tokenizer::tokenize(&line);
        for word in &words {
            if let Some((fqpn_package, fqpn_class)) = word.text.rsplit_once('.') {
                // A fully-qualified reference doesn't need an import; it
                // links whenever the named package was scanned.
                if let Some(target) = self.symbols.get(fqpn_package)
                    && let Some(decl) = target.get_type(fqpn_class)
                {
                    line = self.link_word(&line, &word.text, fqpn_package, decl);
                }
            } else {
                for pkg in &packages {
                    let Some(scoped) = self.symbols.get(pkg) else {
                        continue;
                    };
                    if let Some(decl) = scoped.get_type(&word.text) {
                        line = self.link_type(&line, pkg, decl);
                        break;
                    }
                }
            }
        }

        self.import_filter(&line)
    }

    /// Replace every whole-word occurrence of a simple type name with a
    /// named anchor linking to its declaration page.
    fn link_type(&self, line: &str, package: &str, decl: &TypeDeclaration) -> String {
        let href = self.type_href(package, decl);
        let link = format!("<a name=\"{0}\" href=\"{href}\">{0}</a>", decl.name);
        replace_tokens_reverse(line, &decl.name, &link)
    }

    /// Replace every whole-word occurrence of a fully-qualified reference
    /// with an anchor to the named type's page.
    fn link_word(&self, line: &str, word: &str, package: &str, decl: &TypeDeclaration) -> String {
        let href = self.type_href(package, decl);
        let link = format!("<a href=\"{href}\">{word}</a>");
        replace_tokens_reverse(line, word, &link)
    }

    /// Hyperlink the package (and, for single-class imports, the class) of
    /// a `package`/`import` statement line. The line has already been
    /// keyword-wrapped, so detection works on a tag-stripped copy.
    fn import_filter(&self, line: &str) -> String {
        let plain = strip_tags(line);
        let trimmed = plain.trim_start();
        let is_package = trimmed.starts_with("package ");
        let is_import = trimmed.starts_with("import ");
        if !is_package && !is_import {
            return line.to_owned();
        }

        let Some(statement) = trimmed.split_whitespace().nth(1) else {
            return line.to_owned();
        };
        let statement = statement.trim_end_matches(';');

        let mut pkg = statement.to_owned();
        let mut classname: Option<&str> = None;
        if let Some(stripped) = statement.strip_suffix(".*") {
            pkg = stripped.to_owned();
        } else if is_import {
            if let Some((package_part, class_part)) = statement.rsplit_once('.') {
                pkg = package_part.to_owned();
                classname = Some(class_part);
            }
        }

        // A package statement always refers to a directory that exists in
        // the output; an import only links when the package was scanned.
        if !is_package && self.symbols.get(&pkg).is_none() {
            return line.to_owned();
        }

        let pkg_href = self.package_href(&pkg);
        let mut out = line.to_owned();
        if let Some(class) = classname {
            // Guard against lookalike text (a commented-out import, say):
            // the class link only appears for an import the parser saw.
            let declared = self.file.imports.iter().any(|import| {
                matches!(import, ImportSpec::Single { package, class: c }
                    if *package == pkg && c == class)
            });
            if !declared {
                return out;
            }
            let target = format!("{pkg}.{class}");
            let replacement = format!(
                "<a href=\"{pkg_href}/{PACKAGE_INDEX}\">{pkg}</a>.<a href=\"{pkg_href}/{class}.html\">{class}</a>",
            );
            if let Some(found) = find_statement_target(&out, &target) {
                out.replace_range(found..found + target.len(), &replacement);
            }
        } else if let Some(found) = find_statement_target(&out, &pkg) {
            let replacement = format!("<a href=\"{pkg_href}/{PACKAGE_INDEX}\">{pkg}</a>");
            out.replace_range(found..found + pkg.len(), &replacement);
        }
        out
    }

    fn package_root(&self) -> String {
        package_root(&self.file.package)
    }

    /// Root-relative href to a package's directory (no trailing slash).
    fn package_href(&self, package: &str) -> String {
        let root = self.package_root();
        let path = package.replace(".*", "").replace('.', "/");
        if path.is_empty() {
            format!("{root}.")
        } else {
            format!("{root}{path}")
        }
    }

    /// Href to the page and anchor of a type declaration.
    fn type_href(&self, package: &str, decl: &TypeDeclaration) -> String {
        format!("{}/{}.html#{}", self.package_href(package), decl.filename, decl.name)
    }
}

/// `../` once per segment of a package name: the prefix that climbs from
/// a file's output directory back to the destination root. Empty for the
/// default package, whose pages live at the root already.
pub fn package_root(package: &str) -> String {
    if package.is_empty() {
        return String::new();
    }
    let segments = package.split('.').count();
    "../".repeat(segments)
}

/// Whether a position sits between string delimiters: an odd number of
/// quote characters strictly before it and an odd number after.
fn is_inside_string(line: &str, position: usize) -> bool {
    if !line.contains('"') {
        return false;
    }
    let left = line[..position].matches('"').count();
    let right = line[position..].matches('"').count();
    left % 2 != 0 && right % 2 != 0
}

/// Replace every whole-token occurrence of `find`, walking matches in
/// reverse offset order so the edits cannot shift not-yet-processed
/// offsets while the line length changes.
fn replace_tokens_reverse(line: &str, find: &str, replacement: &str) -> String {
    let mut buf = line.to_owned();
    let tokens = tokenizer::tokenize_matching(line, find);
    for token in tokens.iter().rev() {
        buf.replace_range(token.start..token.start + find.len(), replacement);
    }
    buf
}

/// Remove `<...>` markup spans, leaving the text content.
fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {},
        }
    }
    out
}

/// Find an occurrence of `text` in a processed line that stands on its
/// own: preceded by whitespace or a tag boundary and followed by
/// whitespace, `;`, or end of line. Keeps single-letter package names from
/// matching inside earlier markup.
fn find_statement_target(line: &str, text: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(relative) = line[search_from..].find(text) {
        let start = search_from + relative;
        let end = start + text.len();
        let before_ok = start == 0
            || line[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace() || c == '>');
        // `.` after the match covers wildcard imports, where the package
        // name is followed by `.*`.
        let after_ok = end == line.len()
            || line[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || c == ';' || c == '.');
        if before_ok && after_ok {
            return Some(start);
        }
        search_from = end;
    }
    None
}
