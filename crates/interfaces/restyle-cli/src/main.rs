use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use restyle_cli::{commands, CliFlow, CliOutput};
use restyle_config::ApiConfig;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[arg(long, value_enum, global = true, default_value_t = CliOutput::Text)]
    output: CliOutput,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive three prompts from a reference image
    Prompts { reference: Utf8PathBuf },
    /// Transfer the style image onto the subject of the source image
    Style {
        #[arg(long)]
        style: Utf8PathBuf,
        #[arg(long)]
        source: Utf8PathBuf,
        #[arg(short = 'o', long, default_value = ".")]
        out_dir: Utf8PathBuf,
    },
    /// Derive prompts from the reference image and render each onto the source subject
    Multi {
        #[arg(long)]
        reference: Utf8PathBuf,
        #[arg(long)]
        source: Utf8PathBuf,
        #[arg(short = 'o', long, default_value = ".")]
        out_dir: Utf8PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("default subscriber")?;

    let config = ApiConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Prompts { reference } => {
            commands::cmd_prompts(&config, reference, cli.output).await?;
        }
        Commands::Style {
            style,
            source,
            out_dir,
        } => {
            commands::cmd_generate(&config, CliFlow::Style, style, source, out_dir, cli.output)
                .await?;
        }
        Commands::Multi {
            reference,
            source,
            out_dir,
        } => {
            commands::cmd_generate(
                &config,
                CliFlow::Multi,
                reference,
                source,
                out_dir,
                cli.output,
            )
            .await?;
        }
    }

    Ok(())
}
