use clap::{Parser, Subcommand};
use docsum_common::{logger, AppConfig, DocSumError};
use docsum_llm::{split, LengthMode, Summarizer};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
            return;
        }
    }

    dotenv::dotenv().ok();
}

#[derive(Parser)]
#[command(name = "docsum")]
#[command(about = "DocSum - LLM-powered document summarizer", long_about = None)]
struct Cli {
    /// Log level (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize extracted document text
    Summarize {
        /// Text file to read, or "-" for stdin
        #[arg(long, short, default_value = "-")]
        input: String,

        /// Summary length: short, medium or long
        #[arg(long, short, default_value = "medium")]
        length: String,

        /// Model identifier (overrides LLM_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Chunk size bound in characters (overrides CHUNK_MAX_CHARS)
        #[arg(long)]
        chunk_max_chars: Option<usize>,
    },

    /// Show how a document would be chunked, without calling the LLM
    Chunks {
        /// Text file to read, or "-" for stdin
        #[arg(long, short, default_value = "-")]
        input: String,

        /// Chunk size bound in characters (overrides CHUNK_MAX_CHARS)
        #[arg(long)]
        max_chars: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    load_dotenv_from_project_root();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), DocSumError> {
    let mut config = AppConfig::from_env()?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    match &config.log_dir {
        Some(dir) => logger::setup_logging(dir, &config.log_level)?,
        None => logger::setup_console_logging(&config.log_level)?,
    }

    match cli.command {
        Commands::Summarize {
            input,
            length,
            model,
            chunk_max_chars,
        } => {
            if let Some(model) = model {
                config.llm_model = model;
            }
            if let Some(max_chars) = chunk_max_chars {
                config.chunk_max_chars = max_chars;
            }

            let text = read_input(&input).await?;
            let mode = LengthMode::from_selector(&length);
            if length.parse::<LengthMode>().is_err() {
                tracing::warn!("Unknown length '{}', using {}", length, mode);
            }

            tracing::info!(
                "Summarizing {} chars with {} ({})",
                text.chars().count(),
                config.llm_model,
                mode
            );

            let summarizer = Summarizer::from_config(&config)?;
            let summary = summarizer.generate_summary(&text, mode).await?;

            if !summary.is_empty() {
                println!("{}", summary);
            }
        }
        Commands::Chunks { input, max_chars } => {
            if let Some(max_chars) = max_chars {
                config.chunk_max_chars = max_chars;
            }
            config.validate()?;

            let text = read_input(&input).await?;
            let chunks = split(text.trim(), config.chunk_max_chars);

            println!(
                "{} chunk(s), max {} chars",
                chunks.len(),
                config.chunk_max_chars
            );
            for (index, chunk) in chunks.iter().enumerate() {
                println!("{}", describe_chunk(index, chunk));
            }
        }
    }

    Ok(())
}

/// Read the document from a file, or stdin for "-"
async fn read_input(input: &str) -> Result<String, DocSumError> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| DocSumError::invalid_input(format!("failed to read stdin: {}", e)))?;
        return Ok(text);
    }

    tokio::fs::read_to_string(input)
        .await
        .map_err(|e| DocSumError::invalid_input(format!("failed to read {}: {}", input, e)))
}

/// One preview line per chunk
fn describe_chunk(index: usize, chunk: &str) -> String {
    const PREVIEW_CHARS: usize = 60;

    let flat = chunk.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut preview: String = flat.chars().take(PREVIEW_CHARS).collect();
    if flat.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }

    format!("[{:>3}] {:>6} chars | {}", index, chunk.chars().count(), preview)
}
