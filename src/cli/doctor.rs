//! CLI `doctor` command: check the store connection and print a health report.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use babel::config::{default_config_path, BabelConfig};
use babel::sync::Library;

/// Probe the store and print a health report. Never fails on an unreachable store.
pub async fn doctor(config: &BabelConfig, config_path: Option<&Path>) -> Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    println!("Babel Health Report");
    println!("===================");
    println!();
    println!(
        "Config file:       {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("Store URL:         {}", config.remote.base_url);
    println!("Timeout:           {}s", config.remote.timeout_secs);
    println!();

    let repository: Arc<dyn babel::repository::EntryRepository> =
        Arc::from(babel::repository::create_repository(&config.remote)?);
    let library = Library::new(Arc::clone(&repository));

    let started = Instant::now();
    let reachable = match library.queries.refresh().await {
        Ok(_) => {
            println!(
                "Entries:           {} ({} ms)",
                library.session.len(),
                started.elapsed().as_millis()
            );
            true
        }
        Err(e) => {
            println!("Entries:           unavailable ({e})");
            false
        }
    };

    match repository.health().await {
        Ok(status) => {
            println!("Store says:        {}", status.message);
            if let Some(database) = status.database {
                println!("Store database:    {database}");
            }
        }
        Err(e) => println!("Store root:        unavailable ({e})"),
    }
    println!();

    if reachable {
        println!("Connection check:  PASSED");
    } else {
        println!("Connection check:  FAILED");
        println!();
        println!("Recovery steps:");
        println!("  1. Make sure the store is running (expected at {})", config.remote.base_url);
        println!("  2. Point the client elsewhere with BABEL_URL or [remote] base_url");
        println!("  3. Raise [remote] timeout_secs if the store is slow to answer");
    }

    Ok(())
}
