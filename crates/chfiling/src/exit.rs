use std::fmt;
use std::io;

use chfiling_client::ClientError;
use chfiling_config::ConfigError;
use chfiling_state::StateError;
use chfiling_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const BUSINESS_REJECTED: i32 = 61;
pub const USAGE: i32 = 64;
pub const STATE: i32 = 74;
pub const CONFIG: i32 = 78;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

const SERVICE_HINT: &str = "service problems suspected, try again later";
const TLS_HINT: &str = "the gateway certificate may be invalid";

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::InvalidInput => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::Tls { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err} ({TLS_HINT})"))
        }
        TransportError::Timeout { .. } => {
            CliError::new(TIMEOUT, format!("{context}: {err} ({SERVICE_HINT})"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other} ({SERVICE_HINT})")),
    }
}

pub fn config_error(context: &str, err: ConfigError) -> CliError {
    CliError::new(CONFIG, format!("{context}: {err}"))
}

pub fn state_error(context: &str, err: StateError) -> CliError {
    match err {
        StateError::Read { source, .. } | StateError::Persist { source, .. }
            if source.kind() == io::ErrorKind::PermissionDenied =>
        {
            CliError::new(PERMISSION_DENIED, format!("{context}: {source}"))
        }
        other => CliError::new(STATE, format!("{context}: {other}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Config(err) => config_error(context, err),
        ClientError::State(err) => state_error(context, err),
        ClientError::Transport(err) => transport_error(context, err),
        ClientError::Authentication(_) => {
            CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
        }
        ClientError::Validation(_) | ClientError::MalformedResponse(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ClientError::Business(_) => CliError::new(BUSINESS_REJECTED, format!("{context}: {err}")),
        ClientError::Unclassified(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use chfiling_client::ClassifiedError;
    use chfiling_envelope::GovTalkError;

    use super::*;

    fn gateway(number: u32) -> ClientError {
        let error = GovTalkError {
            raised_by: Some("Gateway".to_string()),
            number,
            error_type: Some("fatal".to_string()),
            text: "rejected".to_string(),
            location: None,
        };
        ClassifiedError::from_errors([&error]).unwrap().into()
    }

    #[test]
    fn gateway_categories_map_to_distinct_codes() {
        assert_eq!(client_error("x", gateway(502)).code, PERMISSION_DENIED);
        assert_eq!(client_error("x", gateway(100)).code, DATA_INVALID);
        assert_eq!(client_error("x", gateway(9999)).code, BUSINESS_REJECTED);
        assert_eq!(client_error("x", gateway(42)).code, FAILURE);
    }

    #[test]
    fn authentication_failure_carries_operator_hint() {
        let err = client_error("company-data", gateway(502));
        assert_eq!(err.message.matches("presenter id").count(), 1);
    }

    #[test]
    fn validation_failure_carries_operator_hint() {
        let err = client_error("submit-accounts", gateway(100));
        assert_eq!(err.message.matches("failed validation check").count(), 1);
    }

    #[test]
    fn transport_timeout_maps_to_timeout() {
        let err = transport_error(
            "send",
            TransportError::Timeout {
                url: "http://localhost".to_string(),
            },
        );
        assert_eq!(err.code, TIMEOUT);
        let err = transport_error("send", TransportError::Status { status: 503 });
        assert_eq!(err.code, TRANSPORT_ERROR);
    }

    #[test]
    fn unreachable_gateway_suggests_retrying_later() {
        for err in [
            TransportError::Connect {
                url: "http://localhost".to_string(),
                message: "connection refused".to_string(),
            },
            TransportError::Timeout {
                url: "http://localhost".to_string(),
            },
            TransportError::Status { status: 502 },
        ] {
            let err = transport_error("send", err);
            assert!(err.message.ends_with("(service problems suspected, try again later)"));
        }
    }

    #[test]
    fn tls_failure_points_at_the_certificate() {
        let err = transport_error(
            "send",
            TransportError::Tls {
                url: "https://gateway.test".to_string(),
                message: "invalid peer certificate: UnknownIssuer".to_string(),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("UnknownIssuer"));
        assert!(err.message.ends_with("(the gateway certificate may be invalid)"));
        assert!(!err.message.contains("try again later"));
    }

    #[test]
    fn state_and_config_errors_have_own_codes() {
        let err = state_error(
            "load",
            StateError::Corrupt {
                path: "state.json".into(),
                reason: "bad".to_string(),
            },
        );
        assert_eq!(err.code, STATE);
        assert_eq!(
            client_error("x", ClientError::Config(ConfigError::EmptyField("url"))).code,
            CONFIG
        );
    }
}
