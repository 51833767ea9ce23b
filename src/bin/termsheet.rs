use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use termsheet::{
    config::Config,
    converter::{text_to_docx, DOWNLOAD_NAME},
    extractor,
    llm::{GeminiClient, TextGenerator},
    template::{load_default_template, Template},
    term_sheet::{TermSheetOutcome, TermSheetService},
    utils,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "termsheet")]
#[command(about = "Turn a commercial lease into a completed lease term sheet")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: config/settings.toml or ~/.config/termsheet/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plain text extracted from a document
    #[command(name = "extract")]
    Extract {
        /// PDF, DOCX, HTML or text file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the default term sheet template
    #[command(name = "template")]
    Template {
        /// Template resource (overrides config)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Only print the first N characters
        #[arg(long, value_name = "N")]
        preview: Option<usize>,
    },
    /// Render a text file as a DOCX document
    #[command(name = "convert")]
    Convert {
        /// Text file, one paragraph per line
        #[arg(value_name = "TEXT_FILE")]
        file: PathBuf,
        /// Output path
        #[arg(short, long, default_value = DOWNLOAD_NAME)]
        output: PathBuf,
    },
    /// Generate a term sheet from a lease
    #[command(name = "generate")]
    Generate {
        /// Lease document (PDF, DOCX, HTML or text)
        #[arg(value_name = "LEASE")]
        lease: PathBuf,
        /// Custom template document instead of the default one
        #[arg(long)]
        template: Option<PathBuf>,
        /// Output DOCX path
        #[arg(short, long, default_value = DOWNLOAD_NAME)]
        output: PathBuf,
        /// Gemini API key (overrides config and GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Model name (overrides config)
        #[arg(long)]
        model: Option<String>,
    },
    /// List models that support content generation
    #[command(name = "models")]
    Models {
        /// Gemini API key (overrides config and GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,termsheet=debug"
    } else {
        "info,termsheet=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

/// Read and extract a document on the blocking pool
async fn extract_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let filename = utils::upload_name(path);
    if filename.is_empty() {
        bail!("Invalid filename: {}", path.display());
    }

    let text = tokio::task::spawn_blocking(move || extractor::extract_bytes(&bytes, &filename))
        .await?
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;
    Ok(text)
}

async fn write_docx(text: String, output: &Path) -> Result<()> {
    let buffer = tokio::task::spawn_blocking(move || text_to_docx(&text))
        .await?
        .context("Failed to render DOCX")?;
    tokio::fs::write(output, buffer)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn gemini_client(config: &Config, api_key: Option<String>, model: Option<String>) -> Result<GeminiClient> {
    let Some(api_key) = api_key.or_else(|| config.api_key()) else {
        bail!("Please configure your Gemini API key first (--api-key, settings.toml or GEMINI_API_KEY)");
    };
    let client = GeminiClient::new(api_key)?
        .with_base_url(config.gemini.base_url.clone())
        .with_model(model.unwrap_or_else(|| config.gemini.model.clone()));
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().unwrap_or_default(),
    };

    match cli.command {
        Commands::Extract { file } => {
            let text = extract_file(&file).await?;
            println!("{}", text);
        }
        Commands::Template { path, preview } => {
            let path = path.unwrap_or_else(|| config.template_path());
            let template = load_default_template(&path);
            match preview {
                Some(n) => println!("{}", template.preview(n)),
                None => println!("{}", template.as_str()),
            }
        }
        Commands::Convert { file, output } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read text file: {}", file.display()))?;
            write_docx(text, &output).await?;
            println!("Wrote {}", output.display());
        }
        Commands::Generate {
            lease,
            template,
            output,
            api_key,
            model,
        } => {
            let client = gemini_client(&config, api_key, model)?;
            tracing::info!(model = client.model(), "Using text-generation model");

            // Loaded once and passed down; never mutated afterwards
            let default_template = load_default_template(config.template_path());

            println!("Reading lease: {}", lease.display());
            let lease_text = extract_file(&lease).await?;
            println!("Extracted {} characters of lease text", lease_text.chars().count());

            let template = match template {
                Some(path) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read template: {}", path.display()))?;
                    let filename = utils::upload_name(&path);
                    tokio::task::spawn_blocking(move || Template::from_upload(&bytes, &filename))
                        .await?
                        .with_context(|| format!("Failed to extract template: {}", path.display()))?
                }
                None => default_template,
            };

            let generator: Arc<dyn TextGenerator> = Arc::new(client);
            let service = TermSheetService::new(generator).with_params(config.generation_params());

            match service.generate(&template, &lease_text).await {
                TermSheetOutcome::Completed(term_sheet) => {
                    println!("Term sheet generated successfully!");
                    write_docx(term_sheet, &output).await?;
                    println!("Saved to {}", output.display());
                }
                TermSheetOutcome::Failed { diagnostic } => {
                    eprintln!("{}", diagnostic);
                    std::process::exit(1);
                }
            }
        }
        Commands::Models { api_key } => {
            let client = gemini_client(&config, api_key, None)?;
            let models = client.list_models().await?;
            println!("Available models that support content generation:");
            for model in models {
                println!("  - {}", model);
            }
        }
    }

    Ok(())
}
