use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdbook::preprocess::{CmdPreprocessor, Preprocessor};
use mdbook_fenced_code::{render_markdown, FenceConfig, FencedCodePreprocessor};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::exit;

/// Renders fenced code blocks with attribute lists to HTML.
///
/// Without a subcommand, runs as an mdBook preprocessor reading the book
/// from stdin and writing it back to stdout.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether a renderer is supported (used by mdBook)
    Supports { renderer: String },

    /// Render a Markdown file to HTML on stdout
    Render {
        /// Markdown file to read; stdin when omitted
        input: Option<PathBuf>,

        /// TOML file with fenced-code options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit block options as attributes of the code element
        #[arg(long)]
        attr_list: bool,

        /// Fail on boolean options that cannot be parsed
        #[arg(long)]
        strict: bool,
    },
}

pub fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Supports { renderer }) => {
            let preprocessor = FencedCodePreprocessor::new();
            if preprocessor.supports_renderer(&renderer) {
                exit(0);
            } else {
                exit(1);
            }
        }
        Some(Command::Render {
            input,
            config,
            attr_list,
            strict,
        }) => handle_render(input, config, attr_list, strict),
        None => handle_preprocessing(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn handle_preprocessing() -> Result<()> {
    let (ctx, book) = CmdPreprocessor::parse_input(io::stdin())?;

    if ctx.mdbook_version != mdbook::MDBOOK_VERSION {
        log::warn!(
            "The fenced-code preprocessor was built against mdbook {}, but is being called from mdbook {}",
            mdbook::MDBOOK_VERSION,
            ctx.mdbook_version
        );
    }

    let preprocessor = FencedCodePreprocessor::new();
    let processed_book = preprocessor.run(&ctx, book)?;

    serde_json::to_writer(io::stdout(), &processed_book)?;

    Ok(())
}

fn handle_render(
    input: Option<PathBuf>,
    config_path: Option<PathBuf>,
    attr_list: bool,
    strict: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => FenceConfig::from_toml_file(path)?,
        None => FenceConfig::default(),
    };
    config.use_attr_list |= attr_list;
    config.fail_on_bool_errors |= strict;

    let markdown = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let html = render_markdown(&markdown, &config)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
