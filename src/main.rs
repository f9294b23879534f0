//! resume-pager CLI - paginate a layout snapshot exported by the UI
//! The main interface is through WASM bindings.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use resume_pager::wasm::PaginationReport;
use resume_pager::{extract_blocks, LayoutNode, PageBreakConfig, Paginator, Result, RoleSelectors};

#[derive(Parser)]
#[command(name = "resume-pager")]
#[command(version)]
#[command(about = "Compute print page breaks for a rendered resume layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate a layout tree and print break points, slices and warnings
    Paginate {
        /// Layout tree JSON
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// PageBreakConfig JSON (A4, 12mm margins if omitted)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Rasterization scale for the slices
        #[arg(long, default_value = "3.0")]
        scale: f32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the content blocks extracted from a layout tree
    Blocks {
        /// Layout tree JSON
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Paginate {
            input,
            config,
            scale,
            compact,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => PageBreakConfig::default(),
            };
            let root = load_tree(&input)?;

            let mut paginator = Paginator::new(config);
            let pagination = paginator.paginate(&root);
            if pagination.result.has_warnings() {
                for warning in &pagination.result.warnings {
                    log::warn!("{}", warning);
                }
                log::info!("{} pagination warnings", pagination.result.warnings.len());
            }

            let report = PaginationReport::new(pagination, scale);
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", json);
        }
        Commands::Blocks { input } => {
            let root = load_tree(&input)?;
            let blocks = extract_blocks(&root, &RoleSelectors::default());
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
    }
    Ok(())
}

fn load_tree(path: &Path) -> Result<LayoutNode> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn load_config(path: &Path) -> Result<PageBreakConfig> {
    let text = fs::read_to_string(path)?;
    let config: PageBreakConfig = serde_json::from_str(&text)?;
    config.validate()?;
    Ok(config)
}
