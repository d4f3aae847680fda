use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use ludex_cli::{load_fixture, Config};
use ludex_client::{IgdbClient, TwitchAuth};
use ludex_core::progress::TracingReporter;
use ludex_core::traits::TokenProvider;
use ludex_core::{Dataset, HarvestService, HarvestStats, IndexConfig, IndexLoader, LoadStats};
use ludex_index::RediSearchIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::parse();
    info!("Ludex harvest starting: {}", Utc::now());

    let (dataset, stats) = if config.mock_mode() {
        info!("Loading fixture dataset from {}", config.mock_file.display());
        (load_fixture(&config.mock_file)?, None)
    } else {
        let outcome = harvest_from_api(&config).await?;
        (outcome.0, Some(outcome.1))
    };

    if let Some(stats) = &stats {
        log_harvest_summary(stats, dataset.len());
    }

    if config.output {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    }

    if config.persist {
        persist(&config, &dataset).await?;
    }

    Ok(())
}

async fn harvest_from_api(config: &Config) -> anyhow::Result<(Dataset, HarvestStats)> {
    let client_id = config
        .client_id
        .clone()
        .context("IGDB_CLIENT_ID is not set")?;
    let client_secret = config
        .client_secret
        .clone()
        .context("IGDB_CLIENT_SECRET is not set")?;

    let auth = TwitchAuth::new(client_id.clone(), client_secret)?;
    let token = auth.token().await.context("Token acquisition failed")?;

    let igdb = IgdbClient::new(client_id, token)?;
    let service = HarvestService::new(igdb);
    let outcome = service.harvest_with_progress(&TracingReporter).await?;

    Ok((outcome.dataset, outcome.stats))
}

async fn persist(config: &Config, dataset: &Dataset) -> anyhow::Result<()> {
    // The original deployment treats a missing Redis location as "nothing
    // to persist to", not as a failed harvest.
    let Some(hostname) = &config.redis_hostname else {
        error!("REDIS_HOSTNAME environment variable is not set");
        return Ok(());
    };

    let index_config = IndexConfig {
        hostname: hostname.clone(),
        port: config.redis_port,
        ..IndexConfig::default()
    };

    let index = RediSearchIndex::connect(&index_config)
        .await
        .context("Failed to connect to the search index")?;
    let loader = IndexLoader::new(index);
    let stats = loader.load_with_progress(dataset, &TracingReporter).await?;

    log_load_summary(&stats);
    Ok(())
}

fn log_harvest_summary(stats: &HarvestStats, dataset_len: usize) {
    info!("═══════════════════════════════════════════");
    info!("Harvest complete");
    info!("═══════════════════════════════════════════");
    info!("  Reported by remote:  {}", stats.total_reported);
    info!("  Fetched:             {}", stats.fetched);
    info!("  Windows:             {}", stats.windows);
    info!(
        "  Dropped:             {} ({:.1}%)",
        stats.dropped,
        drop_percent(stats)
    );
    info!("  Failed pages:        {}", stats.failed_pages);
    info!("  Distinct keys:       {}", dataset_len);
    info!("═══════════════════════════════════════════");
}

fn log_load_summary(stats: &LoadStats) {
    info!(
        "Index load complete: {} written, {} failed, schema ensured in {} attempt(s)",
        stats.written, stats.failed, stats.schema_attempts
    );
}

fn drop_percent(stats: &HarvestStats) -> f64 {
    if stats.fetched == 0 {
        0.0
    } else {
        (stats.dropped as f64 / stats.fetched as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_percent_of_zero_fetched() {
        let stats = HarvestStats::default();
        assert_eq!(drop_percent(&stats), 0.0);
    }

    #[test]
    fn test_drop_percent() {
        let stats = HarvestStats {
            fetched: 10,
            dropped: 3,
            ..HarvestStats::default()
        };
        assert!((drop_percent(&stats) - 30.0).abs() < f64::EPSILON);
    }
}
