//! zmark: converts a Markdown subset file into an HTML fragment with a
//! generated table of contents.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use zmark_core::{Diagnostic, convert_file};

const DEFAULT_INPUT: &str = "test.md";

#[derive(Parser)]
#[command(name = "zmark")]
#[command(about = "Convert a Markdown file into HTML with a table of contents")]
#[command(version)]
struct Cli {
    /// Markdown file to convert
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// HTML file to write (defaults to INPUT with `.html` appended)
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let output = cli
        .output
        .unwrap_or_else(|| default_output(&cli.input));

    let conversion = convert_file(&cli.input, &output).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            cli.input.display(),
            output.display()
        )
    })?;

    for diagnostic in &conversion.diagnostics {
        warn!("{}", diagnostic_to_pretty(&cli.input, diagnostic));
    }
    info!(
        links = conversion.links.len(),
        headings = conversion.document.toc.len(),
        "wrote {}",
        output.display()
    );
    Ok(())
}

/// Logs to stderr, filtered by `RUST_LOG`.
fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zmark={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn default_output(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".html");
    PathBuf::from(name)
}

fn diagnostic_to_pretty(input: &Path, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{} {} {}",
        input.display(),
        diagnostic.range.start.line + 1,
        diagnostic.range.start.character + 1,
        diagnostic.code,
        diagnostic.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn arguments_default_to_sample_file() {
        let cli = Cli::parse_from(["zmark"]);
        assert_eq!(cli.input, PathBuf::from("test.md"));
        assert!(cli.output.is_none());
        assert_eq!(default_output(&cli.input), PathBuf::from("test.md.html"));
    }

    #[test]
    fn output_defaults_to_input_plus_html() {
        let cli = Cli::parse_from(["zmark", "notes/readme.md"]);
        assert_eq!(
            default_output(&cli.input),
            PathBuf::from("notes/readme.md.html")
        );
    }

    #[test]
    fn explicit_output_is_kept() {
        let cli = Cli::parse_from(["zmark", "in.md", "out.html"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.html")));
    }
}
