use anyhow::{Context, Result};
use blockpad_config::Config;
use blockpad_engine::editing::EditorSession;
use blockpad_engine::model::document;
use blockpad_engine::parsing;
use blockpad_engine::render::ParagraphTag;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod io;
mod tui;

#[derive(Parser)]
#[command(name = "blockpad")]
#[command(version, about = "Render, export, import and edit block documents")]
struct Cli {
    /// Config file (defaults to ~/.config/blockpad/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Element used for paragraphs: p or div
    #[arg(long, global = true)]
    paragraph_tag: Option<ParagraphTag>,

    /// Title of exported HTML documents
    #[arg(long, global = true)]
    title: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the sanitized HTML fragment of a JSON document
    Render { document: PathBuf },

    /// Write a standalone HTML page for a JSON document
    Export {
        document: PathBuf,

        /// Output file (defaults to the document name with .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert editor HTML into a JSON document
    Import {
        page: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Edit a JSON document in the terminal
    Edit { document: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log lines would draw over the editor's alternate screen
    let level = match cli.command {
        Command::Edit { .. } => log::LevelFilter::Warn,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = resolve_config(&cli)?;

    match &cli.command {
        Command::Render { document } => print!("{}", render(document, &config)?),
        Command::Export { document, output } => {
            let output = output
                .clone()
                .unwrap_or_else(|| document.with_extension("html"));
            export(document, &output, &config)?;
            println!("Created {}", output.display());
        }
        Command::Import {
            page,
            output,
            pretty,
        } => {
            let json = import(page, *pretty)?;
            match output {
                Some(output) => {
                    io::write_file(output, &json)?;
                    println!("Created {}", output.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Edit { document } => tui::run(document, &config)?,
    }

    Ok(())
}

/// Config file values with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let loaded = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let mut config = match loaded {
        Some(config) => config,
        None => {
            log::debug!(
                "no config file at {}, using defaults",
                Config::config_path().display()
            );
            Config::default()
        }
    };

    if let Some(tag) = cli.paragraph_tag {
        config.render.paragraph_tag = tag;
    }
    if let Some(title) = &cli.title {
        config.export.title = title.clone();
    }
    Ok(config)
}

fn load_session(path: &Path, config: &Config) -> Result<EditorSession> {
    let blocks = io::read_document(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    log::info!("loaded {} blocks from {}", blocks.len(), path.display());
    Ok(EditorSession::with_document(blocks, config.render_options()))
}

fn render(path: &Path, config: &Config) -> Result<String> {
    let session = load_session(path, config)?;
    Ok(session.preview().html().to_string())
}

fn export(path: &Path, output: &Path, config: &Config) -> Result<()> {
    let session = load_session(path, config)?;
    io::write_file(output, &session.export_html(&config.export_options()))?;
    Ok(())
}

fn import(page: &Path, pretty: bool) -> Result<String> {
    let html = io::read_file(page)?;
    let blocks = parsing::parse_html(html.trim());
    log::info!("parsed {} blocks from {}", blocks.len(), page.display());
    let json = if pretty {
        document::to_json_pretty(&blocks)?
    } else {
        document::to_json(&blocks)?
    };
    Ok(json)
}
