pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to compile trigger templates: {0}")]
	Trigger(#[from] regex::Error),
}
