use std::io;

use serde_json::Value;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use yadirect::{Config, GeoId, InputValidator, RegionCodeCache};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("yadirect=info")),
        )
        .init();

    let config = Config::from_env()?;

    let phrases_raw = std::env::var("WORDSTAT_PHRASES").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "WORDSTAT_PHRASES environment variable is required (JSON array, e.g. [\"купить слона\"])",
        )
    })?;
    let phrases: Vec<Value> = serde_json::from_str(&phrases_raw)?;
    let geo_ids = std::env::var("WORDSTAT_GEO_IDS")
        .unwrap_or_else(|_| "213".to_owned())
        .split(',')
        .map(|raw| raw.trim().parse::<i64>().map(GeoId::new))
        .collect::<Result<Vec<_>, _>>()?;

    let regions = if config.regions_file().exists() {
        config.region_cache()
    } else {
        RegionCodeCache::bundled()
    };
    let request = InputValidator::new(&regions).validate(&phrases, &geo_ids)?;

    let client = config
        .client_builder()
        .build_report_client(config.credentials().clone())?;
    let id = client.create(&request).await?;
    println!("created report {id}");

    let cancel = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "ctrl-c handler unavailable; waiting without cancellation");
            std::future::pending::<()>().await;
        }
    };
    let waited = client
        .wait_until_done_or_cancelled(id, &config.poll_options(), cancel)
        .await;
    if let Err(err) = waited {
        client.delete(id).await?;
        return Err(err.into());
    }

    for item in client.fetch(id).await? {
        println!("{} (regions {:?})", item.phrase, item.geo_ids);
        for entry in &item.searched_with {
            println!("  {:>10}  {}", entry.shows, entry.phrase);
        }
    }

    client.delete(id).await?;
    println!("deleted report {id}");

    Ok(())
}
