use leaderboard_cache::cli::Cli;
use leaderboard_cache::client::file::FileBackend;
use leaderboard_cache::client::metadata::{MemoryMapSource, TieredResolver};
use leaderboard_cache::config::Settings;
use leaderboard_cache::core::acquire::Leaderboards;
use leaderboard_cache::storage::MemoryCache;
use leaderboard_cache::utils::ordinal;

use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::new(&cli)?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(settings.get_trace_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // The dump acts as the database tier; nothing is fetched from an API.
    let backend = Arc::new(FileBackend::open(&cli.data)?);
    let resolver = TieredResolver::new(Arc::new(MemoryMapSource::new()), backend.clone())
        .with_update_interval(settings.map_update_interval());
    let leaderboards = Leaderboards::new(Arc::new(resolver), backend, Arc::new(MemoryCache::new()))
        .with_size_limit(settings.size_limit);

    let acquired = if settings.cache_leaderboards {
        leaderboards.acquire(&cli.map, cli.variant, cli.mode).await?
    } else {
        leaderboards
            .acquire_uncached(&cli.map, cli.variant, cli.mode)
            .await?
    };
    let Some(shared) = acquired else {
        info!("Map {} has no leaderboard.", cli.map);
        return Ok(());
    };

    let leaderboard = shared.read();
    println!(
        "{} [{} {}] - {} participants (map: {}, scores: {})",
        leaderboard.map().song_name,
        leaderboard.mode(),
        leaderboard.variant(),
        leaderboard.total_participants(),
        leaderboard.map_fetch(),
        leaderboard.score_fetch(),
    );
    for (idx, score) in leaderboard.scores().take(cli.top).enumerate() {
        println!(
            "{:>6} {:<24} {:>12} {:>8.2}pp {:>5}x",
            ordinal(idx + 1),
            score.username,
            score.score,
            score.pp,
            score.statistics.max_combo,
        );
    }

    if let Some(user_id) = cli.user {
        match leaderboard.get_placement(user_id) {
            Ok(placement) => println!("User {} is placed {}.", user_id, ordinal(placement)),
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}
