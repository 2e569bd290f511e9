pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to bind stub vault: {0}")]
	Bind(std::io::Error),
	#[error("Failed to generate stub certificate: {0}")]
	Certificate(#[from] rcgen::Error),
	#[error("Failed to configure stub TLS: {0}")]
	Tls(#[from] rustls::Error),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
