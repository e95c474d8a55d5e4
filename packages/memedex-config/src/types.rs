use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub telegram: Telegram,
	pub routing: Routing,
	pub storage: Storage,
	#[serde(default)]
	pub ingest: Ingest,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
	pub bot_token: String,
	#[serde(default = "default_api_base")]
	pub api_base: String,
	#[serde(default = "default_poll_timeout_secs")]
	pub poll_timeout_secs: u64,
}

/// Identities are matched as case-insensitive substrings against a source's
/// username, title, or numeric id, so a channel rename does not silently stop
/// ingestion as long as the naming convention survives.
#[derive(Debug, Deserialize)]
pub struct Routing {
	pub channel: String,
	pub group: String,
	pub description_bot: String,
	#[serde(default = "default_fallback_token")]
	pub fallback_token: String,
	#[serde(default = "default_failure_sentinel")]
	pub failure_sentinel: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_connect_attempts")]
	pub connect_attempts: u32,
	#[serde(default = "default_connect_retry_secs")]
	pub connect_retry_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Ingest {
	#[serde(default = "default_pending_ttl_hours")]
	pub pending_ttl_hours: i64,
	#[serde(default = "default_sweep_interval_secs")]
	pub sweep_interval_secs: u64,
}
impl Default for Ingest {
	fn default() -> Self {
		Self {
			pending_ttl_hours: default_pending_ttl_hours(),
			sweep_interval_secs: default_sweep_interval_secs(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_caption_max_chars")]
	pub caption_max_chars: u32,
	#[serde(default = "default_max_callback_data_bytes")]
	pub max_callback_data_bytes: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			caption_max_chars: default_caption_max_chars(),
			max_callback_data_bytes: default_max_callback_data_bytes(),
		}
	}
}

fn default_api_base() -> String {
	"https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
	30
}

fn default_fallback_token() -> String {
	"meme".to_string()
}

fn default_failure_sentinel() -> String {
	"ERROR".to_string()
}

fn default_connect_attempts() -> u32 {
	10
}

fn default_connect_retry_secs() -> u64 {
	5
}

fn default_pending_ttl_hours() -> i64 {
	24
}

fn default_sweep_interval_secs() -> u64 {
	3_600
}

fn default_caption_max_chars() -> u32 {
	200
}

// Telegram caps callback data at 64 bytes.
fn default_max_callback_data_bytes() -> u32 {
	64
}
