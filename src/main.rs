// Entry point for the catalog ingestion pipeline

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nerdfacts_etl::sink::{load_dataset, RAW_SCHEMA};
use nerdfacts_etl::sources::{netrunner, pokeapi, swapi};
use nerdfacts_etl::{ApiClient, SinkConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Pokeapi,
    Swapi,
    Netrunner,
}

impl Source {
    fn table_prefix(self) -> &'static str {
        match self {
            Self::Pokeapi => "pokeapi_",
            Self::Swapi => "swapi_",
            Self::Netrunner => "netrunner_",
        }
    }
}

#[derive(Parser)]
#[command(
    name = "nerdfacts-etl",
    about = "Ingest public catalog APIs into the raw Postgres schema"
)]
struct Cli {
    /// Source to ingest; all sources run when omitted
    source: Option<Source>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nerdfacts_etl=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = SinkConfig::from_env().context("Failed to load sink configuration")?;
    let client = ApiClient::new().context("Failed to build API client")?;

    let sources = match cli.source {
        Some(source) => vec![source],
        None => vec![Source::Pokeapi, Source::Swapi, Source::Netrunner],
    };

    for source in sources {
        tracing::info!(?source, "starting extraction");
        let datasets = match source {
            Source::Pokeapi => pokeapi::extract(&client).await,
            Source::Swapi => swapi::extract(&client).await,
            Source::Netrunner => netrunner::extract(&client).await,
        };

        // A failed load is contained to its table; the remaining datasets
        // still get their chance.
        for dataset in datasets {
            let table = format!("{}{}", source.table_prefix(), dataset.entity);
            if let Err(err) = load_dataset(&config, RAW_SCHEMA, &table, &dataset).await {
                tracing::error!(%table, error = %err, "load failed");
            }
        }
    }

    Ok(())
}
