mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Ingest, Postgres, Routing, Search, Service, Storage, Telegram};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.telegram.bot_token.trim().is_empty() {
		return Err(Error::Validation {
			message: "telegram.bot_token must be non-empty.".to_string(),
		});
	}
	if cfg.telegram.api_base.trim().is_empty() {
		return Err(Error::Validation { message: "telegram.api_base must be non-empty.".to_string() });
	}
	if cfg.telegram.poll_timeout_secs == 0 {
		return Err(Error::Validation {
			message: "telegram.poll_timeout_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.routing.channel.is_empty() {
		return Err(Error::Validation { message: "routing.channel must be non-empty.".to_string() });
	}
	if cfg.routing.group.is_empty() {
		return Err(Error::Validation { message: "routing.group must be non-empty.".to_string() });
	}
	if cfg.routing.description_bot.is_empty() {
		return Err(Error::Validation {
			message: "routing.description_bot must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.connect_attempts == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.connect_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.ingest.pending_ttl_hours <= 0 {
		return Err(Error::Validation {
			message: "ingest.pending_ttl_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.ingest.sweep_interval_secs == 0 {
		return Err(Error::Validation {
			message: "ingest.sweep_interval_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.search.caption_max_chars == 0 {
		return Err(Error::Validation {
			message: "search.caption_max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_callback_data_bytes == 0 {
		return Err(Error::Validation {
			message: "search.max_callback_data_bytes must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for identity in [
		&mut cfg.routing.channel,
		&mut cfg.routing.group,
		&mut cfg.routing.description_bot,
		&mut cfg.routing.fallback_token,
	] {
		let trimmed = identity.trim();

		if trimmed.len() != identity.len() {
			*identity = trimmed.to_string();
		}
	}
}
