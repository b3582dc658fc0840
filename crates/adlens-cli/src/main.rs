mod analyze;
mod suggest;

use adlens_core::Period;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adlens-cli")]
#[command(about = "Facebook Ads Library advertiser analysis")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true, env = "ADLENS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape an advertiser's ads and print the analysis
    Analyze {
        /// Advertiser name as shown in the Ads Library
        name: String,
        /// Time window: last24h, last7d, last30d, last90d or all
        #[arg(long)]
        period: Option<Period>,
        /// Two-letter country code, or ALL
        #[arg(long)]
        country: Option<String>,
        /// Maximum number of ads to scrape
        #[arg(long)]
        limit: Option<u32>,
        /// Print the full analysis as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print advertiser name suggestions for a query
    Suggest {
        query: String,
        #[command(flatten)]
        search: suggest::SearchArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            name,
            period,
            country,
            limit,
            json,
        } => {
            // Only scraping needs the Apify settings.
            let config = adlens_core::load_app_config()?;
            let options = analyze::AnalyzeArgs {
                period,
                country,
                limit,
                json,
            };
            analyze::run_analyze(&config, &name, &options).await?;
        }
        Commands::Suggest { query, search } => {
            print!("{}", suggest::run_suggest(&search, &query).await?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
