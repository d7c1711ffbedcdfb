mod config;
mod diagnostics;
mod error;
mod highlight;
mod index;
mod parser;
mod scanner;
mod symbols;
mod template;
mod tokenizer;
mod transform;
mod types;
mod xref;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{Encoding, FileConfig, Options};
use crate::xref::Xref;

#[derive(Parser)]
#[command(
    name = "jxref",
    about = "Cross-referenced, syntax-highlighted HTML mirrors of Java source trees"
)]
struct Cli {
    /// Source root directories to cross-reference
    #[arg(required = true)]
    source_dirs: Vec<PathBuf>,

    /// Destination directory for the generated HTML
    #[arg(short, long, default_value = "xref")]
    dest: PathBuf,

    /// Include glob pattern, relative to each source root (repeatable)
    #[arg(long, value_name = "GLOB")]
    include: Vec<String>,

    /// Exclude glob pattern, relative to each source root (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Title of the navigation frameset window
    #[arg(long)]
    window_title: Option<String>,

    /// Heading shown on the summary pages
    #[arg(long)]
    doc_title: Option<String>,

    /// Footer text; {currentYear}, {inceptionYear}, and {organizationName}
    /// are expanded
    #[arg(long)]
    bottom: Option<String>,

    /// Encoding of the source files (UTF-8 or ISO-8859-1)
    #[arg(long, value_name = "NAME")]
    input_encoding: Option<String>,

    /// Encoding of the generated HTML (UTF-8 or ISO-8859-1)
    #[arg(long, value_name = "NAME")]
    output_encoding: Option<String>,

    /// Javadoc directory to add "View Javadoc" links against
    #[arg(long, value_name = "DIR")]
    javadoc_dir: Option<PathBuf>,

    /// Directory of custom templates, overriding the built-in set
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Version tag selecting a built-in template generation
    #[arg(long, value_name = "VERSION")]
    templates_version: Option<String>,

    /// Revision label recorded in page footers
    #[arg(long)]
    revision: Option<String>,

    /// Print each file as it is transformed
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<(), error::Error> {
    let file_config = FileConfig::load(&PathBuf::from("."))?;
    let options = merge(&cli, &file_config)?;

    std::fs::create_dir_all(&cli.dest).map_err(|e| error::Error::OutputWrite {
        path: cli.dest.clone(),
        reason: e.to_string(),
    })?;

    let summary = Xref::new(&options, &cli.dest, cli.verbose).run(&cli.source_dirs)?;
    println!(
        "Cross-referenced {} files in {} packages into {}",
        summary.files,
        summary.packages,
        cli.dest.display()
    );
    Ok(())
}

/// Resolve final options: CLI flags win over `jxref.toml`, which wins over
/// defaults. Footer placeholders are expanded here, once, so everything
/// downstream treats the footer as opaque text.
fn merge(cli: &Cli, file: &FileConfig) -> Result<Options, error::Error> {
    let defaults = Options::default();

    let input_encoding = match cli.input_encoding.as_ref().or(file.input_encoding.as_ref()) {
        Some(name) => Encoding::parse(name)?,
        None => defaults.input_encoding,
    };
    let output_encoding = match cli
        .output_encoding
        .as_ref()
        .or(file.output_encoding.as_ref())
    {
        Some(name) => Encoding::parse(name)?,
        None => defaults.output_encoding,
    };

    let bottom_template = cli
        .bottom
        .clone()
        .or_else(|| file.bottom.clone())
        .unwrap_or(defaults.bottom);
    let organization = file.organization.clone().unwrap_or_default();
    let bottom = config::expand_bottom(&bottom_template, file.inception_year, &organization);

    let mut includes = cli.include.clone();
    if includes.is_empty() {
        includes = file.include.clone();
    }
    let mut excludes = file.exclude.clone();
    excludes.extend(cli.exclude.iter().cloned());

    Ok(Options {
        bottom,
        doc_title: cli
            .doc_title
            .clone()
            .or_else(|| file.doc_title.clone())
            .unwrap_or(defaults.doc_title),
        excludes,
        includes,
        input_encoding,
        javadoc_dir: cli.javadoc_dir.clone().or_else(|| file.javadoc_dir.clone()),
        output_encoding,
        revision: cli.revision.clone().unwrap_or(defaults.revision),
        template_dir: cli.templates.clone().or_else(|| file.template_dir.clone()),
        templates_version: cli
            .templates_version
            .clone()
            .or_else(|| file.templates_version.clone())
            .unwrap_or(defaults.templates_version),
        window_title: cli
            .window_title
            .clone()
            .or_else(|| file.window_title.clone())
            .unwrap_or(defaults.window_title),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("jxref").chain(args.iter().copied()))
    }

    #[test]
    fn cli_flags_override_file_config() {
        let cli = parse_cli(&["src", "--window-title", "From CLI"]);
        let file = FileConfig {
            window_title: Some("From file".to_owned()),
            doc_title: Some("Docs".to_owned()),
            ..FileConfig::default()
        };
        let options = merge(&cli, &file).unwrap();
        assert_eq!(options.window_title, "From CLI");
        assert_eq!(options.doc_title, "Docs");
    }

    #[test]
    fn cli_excludes_compose_with_file_excludes() {
        let cli = parse_cli(&["src", "--exclude", "**/gen/**"]);
        let file = FileConfig {
            exclude: vec!["**/target/**".to_owned()],
            ..FileConfig::default()
        };
        let options = merge(&cli, &file).unwrap();
        assert_eq!(options.excludes, vec!["**/target/**", "**/gen/**"]);
    }

    #[test]
    fn bad_encoding_flag_is_rejected() {
        let cli = parse_cli(&["src", "--input-encoding", "ebcdic"]);
        assert!(matches!(
            merge(&cli, &FileConfig::default()),
            Err(error::Error::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let cli = parse_cli(&["src"]);
        let options = merge(&cli, &FileConfig::default()).unwrap();
        assert_eq!(options.window_title, "jxref");
        assert_eq!(options.input_encoding, Encoding::Utf8);
        assert!(options.includes.is_empty());
    }
}
