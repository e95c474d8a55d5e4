pub mod handlers;
pub mod router;
pub mod telegram;

mod error;
pub use error::{Error, Result};

use std::{future::Future, path::PathBuf, pin::Pin, sync::Arc, time::Duration};

use clap::Parser;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use memedex_domain::Classifier;
use memedex_service::MemeService;
use memedex_storage::db::Db;

use crate::telegram::TelegramClient;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = memedex_config::load(&args.config)?;

	init_tracing(&config)?;

	let db = Db::connect_with_retry(&config.storage.postgres).await?;

	db.ensure_schema().await?;
	tracing::info!("Database schema is ready.");

	let telegram = Arc::new(TelegramClient::new(&config.telegram)?);
	let service = Arc::new(MemeService::new(&config, Arc::new(db)));
	let classifier = Classifier::new(&config.routing);
	let router = handlers::router(service.clone(), telegram.clone());

	spawn_sweeper(service, Duration::from_secs(config.ingest.sweep_interval_secs));
	tracing::info!("Polling for updates.");

	let mut offset = 0;

	loop {
		let updates = match telegram.get_updates(offset).await {
			Ok(updates) => updates,
			Err(err) => {
				tracing::error!(error = %err, "Failed to poll for updates.");
				tokio::time::sleep(Duration::from_secs(5)).await;

				continue;
			},
		};

		for update in updates {
			offset = offset.max(update.update_id + 1);

			let Some(event) = telegram::map_update(update) else {
				continue;
			};

			// Handler failures are logged and never abort the loop; the next
			// event is processed regardless.
			if let Err(err) = router.dispatch(&classifier.classify(event)).await {
				tracing::error!(error = %err, "Event handler failed.");
			}
		}
	}
}

fn spawn_sweeper(service: Arc<MemeService>, interval: Duration) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);

		// The interval's immediate first tick; nothing is pending at startup.
		ticker.tick().await;

		loop {
			ticker.tick().await;
			service.sweep_pending(OffsetDateTime::now_utc());
		}
	});
}

fn init_tracing(config: &memedex_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
