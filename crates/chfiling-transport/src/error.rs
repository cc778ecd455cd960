/// Errors that can occur while exchanging bytes with the gateway.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the gateway.
    #[error("failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// The secure channel could not be established, typically a certificate
    /// the client does not trust.
    #[error("secure connection to {url} failed: {message}")]
    Tls { url: String, message: String },

    /// The exchange did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP status {status}")]
    Status { status: u16 },

    /// The request could not be built or the response body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// An I/O error occurred on the underlying channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
