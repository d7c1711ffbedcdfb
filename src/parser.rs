//! Lightweight Java source parser.
//!
//! Extracts the package declaration, import statements, and (possibly
//! nested) type declarations from a file without building an AST. The
//! token stream deliberately mirrors the quirks of the original stream
//! tokenizer it replaces: `*` outside a word starts a skip-to-end-of-line
//! comment, so a wildcard import like `import test.*;` surfaces as the
//! word `test.` and has its `*` restored afterwards.
//!
//! Parsing is best-effort by design. Unexpected token sequences are
//! skipped — worst case a type or import goes missing — and only I/O or
//! decode problems surface as errors.

use std::path::Path;

use crate::config::Encoding;
use crate::error::Error;
use crate::types::{ImportSpec, SourceFile, TypeDeclaration, filename_stem};

/// Keywords that introduce a named type declaration.
const TYPE_INTRODUCERS: [&str; 4] = ["class", "interface", "enum", "record"];

/// Parse one source file into its package/import/type skeleton.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the path does not exist, `Error::Io`
/// for other read failures, and `Error::Decode` if the bytes are not valid
/// under the given encoding.
pub fn parse_source(path: &Path, encoding: Encoding) -> Result<SourceFile, Error> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        },
        Err(e) => return Err(Error::Io(e)),
    };
    let content = encoding.decode(&bytes).ok_or_else(|| Error::Decode {
        encoding: encoding.name().to_owned(),
        path: path.to_path_buf(),
    })?;

    Ok(parse_content(path, &content))
}

/// Parse already-decoded source text. Never fails: malformed input just
/// yields fewer declarations.
pub fn parse_content(path: &Path, content: &str) -> SourceFile {
    let filename = filename_stem(path);
    let mut file = SourceFile {
        path: path.to_path_buf(),
        filename,
        package: String::new(),
        // The runtime always imports java.lang.* implicitly; without this
        // entry the linker would never resolve unqualified java.lang names.
        imports: vec![ImportSpec::Wildcard("java.lang".to_owned())],
        types: Vec::new(),
    };

    let mut lexer = Lexer::new(content);
    parse_frame("", &mut lexer, &mut file);
    file
}

/// One recursion frame: consumes tokens until the brace that closes the
/// enclosing type (or end of input at the top level), emitting declarations
/// with the given nesting prefix.
fn parse_frame(prefix: &str, lexer: &mut Lexer<'_>, file: &mut SourceFile) {
    let mut open_braces = 0i32;
    let mut prev_was_quote = false;
    let mut in_text_block = false;

    while let Some(token) = lexer.next_token() {
        // Two consecutive quote tokens is how a text block opener (or
        // closer) appears in this token stream. While the flag is set,
        // everything — braces included — is literal text and must not
        // touch the nesting count.
        if let Token::Quoted = token {
            if prev_was_quote {
                in_text_block = !in_text_block;
            }
            prev_was_quote = true;
            continue;
        }
        prev_was_quote = false;
        if in_text_block {
            continue;
        }

        match token {
            Token::Quoted => {},
            Token::Sym(c) => {
                if c == '{' {
                    open_braces += 1;
                } else if c == '}' {
                    open_braces -= 1;
                    if open_braces == 0 {
                        return;
                    }
                }
            },
            Token::Word(word) => {
                if word == "package"
                    && let Some(Token::Word(name)) = lexer.next_token()
                {
                    file.package = name;
                } else if word == "import"
                    && let Some(Token::Word(mut name)) = lexer.next_token()
                {
                    // The `*` comment quirk eats the star of a wildcard
                    // import, leaving a trailing dot. Restore it.
                    if name.ends_with('.') {
                        name.push('*');
                    }
                    file.imports.push(ImportSpec::parse(&name));
                } else if TYPE_INTRODUCERS.contains(&word.as_str())
                    && let Some(Token::Word(name)) = lexer.next_token()
                {
                    file.types.push(TypeDeclaration {
                        name: format!("{prefix}{name}"),
                        filename: file.filename.clone(),
                    });
                    let nested_prefix = format!("{prefix}{name}.");
                    parse_frame(&nested_prefix, lexer, file);
                }
            },
        }
    }
}

/// Token kinds the parser cares about. Comments never surface: the lexer
/// swallows them.
#[derive(Debug, PartialEq, Eq)]
enum Token {
    /// A quoted string or character literal; content is irrelevant here.
    Quoted,
    /// A single structural character (braces, semicolons, operators...).
    Sym(char),
    /// A word: letters, digits, `_`, `$` and `.` (dotted names come back
    /// as one word).
    Word(String),
}

/// Character-level tokenizer over the decoded source text.
struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(content: &'a str) -> Self {
        Lexer {
            chars: content.chars().peekable(),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            let c = self.chars.next()?;

            if c.is_whitespace() {
                continue;
            }

            if c == '/' {
                match self.chars.peek() {
                    Some('/') => {
                        self.skip_to_line_end();
                        continue;
                    },
                    Some('*') => {
                        self.chars.next();
                        self.skip_block_comment();
                        continue;
                    },
                    _ => return Some(Token::Sym('/')),
                }
            }

            // The comment-continuation quirk: a bare `*` swallows the rest
            // of the line. This is what clips wildcard imports to `name.`.
            if c == '*' {
                self.skip_to_line_end();
                continue;
            }

            if c == '"' || c == '\'' {
                self.skip_quoted(c);
                return Some(Token::Quoted);
            }

            if is_word_start(c) {
                let mut word = String::new();
                word.push(c);
                while let Some(&next) = self.chars.peek() {
                    if is_word_part(next) {
                        word.push(next);
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                return Some(Token::Word(word));
            }

            return Some(Token::Sym(c));
        }
    }

    /// Consume up to (not including) the next newline.
    fn skip_to_line_end(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                return;
            }
            self.chars.next();
        }
    }

    /// Consume a `/* ... */` comment, terminator included.
    fn skip_block_comment(&mut self) {
        let mut prev = '\0';
        for c in self.chars.by_ref() {
            if prev == '*' && c == '/' {
                return;
            }
            prev = c;
        }
    }

    /// Consume a quoted literal up to the closing quote, a newline, or end
    /// of input, honoring backslash escapes. Mirrors a tokenizer that never
    /// lets a plain literal span lines.
    fn skip_quoted(&mut self, quote: char) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                return;
            }
            self.chars.next();
            if c == '\\' {
                // Skip the escaped character, whatever it is.
                self.chars.next();
            } else if c == quote {
                return;
            }
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_word_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}
