#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Database unavailable after {attempts} connection attempts.")]
	ConnectExhausted { attempts: u32, source: sqlx::Error },
}
