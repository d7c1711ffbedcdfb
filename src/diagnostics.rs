use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the fix is
/// in the user's hands, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::Decode { encoding, path } => format!(
            "\
# Error: Cannot Decode Source

`{}` is not valid {encoding}.

## Fix

Pass the encoding the tree was written in, e.g. `--input-encoding ISO-8859-1`.
",
            path.display()
        ),

        Error::FileNotFound { path } => format!(
            "\
# Error: File Not Found

`{}` does not exist.
",
            path.display()
        ),

        Error::InvalidPattern { pattern, reason } => format!(
            "\
# Error: Invalid Pattern

`{pattern}` is not a valid glob: {reason}

## Fix

Check the `--include`/`--exclude` flags and the `include`/`exclude` lists
in `jxref.toml`.
"
        ),

        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),

        Error::OutputWrite { path, reason } => format!(
            "\
# Error: Cannot Write Output

`{}`: {reason}

## Fix

Check that the destination directory is writable.
",
            path.display()
        ),

        Error::TemplateNotFound { location, name } => format!(
            "\
# Error: Template Not Found

No template named `{name}` in {location}.

## Fix

An external template directory must provide all of: index, overview-frame,
allclasses-frame, overview-summary, package-frame, package-summary (as
`.html` files) plus `stylesheet.css`.
"
        ),

        Error::TomlDe(e) => format!(
            "\
# Error: Invalid TOML

{e}

## Fix

Correct `jxref.toml` or remove it to run with defaults.
"
        ),

        Error::UnsupportedEncoding { name } => format!(
            "\
# Error: Unsupported Encoding

`{name}` is not supported; only UTF-8 and ISO-8859-1 are.
"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn every_variant_renders_a_titled_block() {
        let errors = [
            Error::Decode {
                encoding: "UTF-8".to_owned(),
                path: PathBuf::from("/src/A.java"),
            },
            Error::FileNotFound {
                path: PathBuf::from("/src/B.java"),
            },
            Error::InvalidPattern {
                pattern: "a{".to_owned(),
                reason: "unclosed alternate group".to_owned(),
            },
            Error::OutputWrite {
                path: PathBuf::from("/out/C.html"),
                reason: "permission denied".to_owned(),
            },
            Error::TemplateNotFound {
                location: "/templates".to_owned(),
                name: "index".to_owned(),
            },
            Error::UnsupportedEncoding {
                name: "shift-jis".to_owned(),
            },
        ];
        for e in errors {
            let md = render_error(&e);
            assert!(md.starts_with("# Error"), "no title for {e}: {md}");
        }
    }

    #[test]
    fn decode_error_names_the_file_and_encoding() {
        let md = render_error(&Error::Decode {
            encoding: "UTF-8".to_owned(),
            path: PathBuf::from("/src/Broken.java"),
        });
        assert!(md.contains("Broken.java"));
        assert!(md.contains("UTF-8"));
        assert!(md.contains("## Fix"));
    }
}
