use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Error, Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &memedex_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool })
	}

	/// Startup connection with a fixed retry budget: `connect_attempts` tries,
	/// `connect_retry_secs` apart, fatal when exhausted. The process never
	/// starts degraded.
	pub async fn connect_with_retry(cfg: &memedex_config::Postgres) -> Result<Self> {
		let mut attempt = 0_u32;

		loop {
			attempt += 1;

			match Self::connect(cfg).await {
				Ok(db) => return Ok(db),
				Err(Error::Sqlx(err)) if attempt < cfg.connect_attempts => {
					tracing::warn!(
						error = %err,
						attempt,
						max_attempts = cfg.connect_attempts,
						"Database connection failed. Retrying.",
					);

					tokio::time::sleep(Duration::from_secs(cfg.connect_retry_secs)).await;
				},
				Err(Error::Sqlx(err)) =>
					return Err(Error::ConnectExhausted { attempts: attempt, source: err }),
				Err(err) => return Err(err),
			}
		}
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 6_513_109;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
