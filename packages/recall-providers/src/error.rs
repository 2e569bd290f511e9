pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("The vault endpoint is not configured.")]
	Unconfigured,
	#[error("The vault base URL is invalid: {message}")]
	InvalidUrl { message: String },
	#[error("Request to the vault timed out.")]
	Timeout,
	#[error("Could not reach the vault: {detail}")]
	Unreachable { detail: String },
	#[error("The vault responded with HTTP {code}.")]
	UpstreamStatus { code: u16 },
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Failed to build the HTTP client: {0}")]
	Client(reqwest::Error),
}
impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			return Self::Timeout;
		}
		if let Some(status) = err.status() {
			return Self::UpstreamStatus { code: status.as_u16() };
		}
		if err.is_builder() {
			return Self::Client(err);
		}

		Self::Unreachable { detail: transport_detail(&err) }
	}
}

// reqwest's top-level message is generic; the source chain names the actual cause.
fn transport_detail(err: &reqwest::Error) -> String {
	let mut detail = err.to_string();
	let mut source = std::error::Error::source(err);

	while let Some(inner) = source {
		detail.push_str(": ");
		detail.push_str(&inner.to_string());

		source = inner.source();
	}

	detail
}
