//! Error types for cascade-config.

/// Result type alias for cascade-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while assembling or retrieving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A single backing-store tuple lookup failed.
    ///
    /// The assembly engine either logs and skips this (default) or propagates
    /// it, depending on its `fail_on_error` setting.
    #[error("backing store lookup failed: {0}")]
    Store(String),

    /// Discovery returned no instances for the requested service id.
    #[error("no instances found of config server ({service_id})")]
    NoInstancesFound {
        /// The service id that was looked up.
        service_id: String,
    },

    /// A discovery lookup failed (transient; retried by the endpoint selector).
    #[error("discovery lookup failed: {0}")]
    Discovery(String),

    /// Contradictory static settings, detected before any network attempt.
    #[error("configuration conflict: {0}")]
    ConfigurationConflict(String),

    /// A negative timeout was configured. Rejected at construction time,
    /// never at request time.
    #[error("invalid {name} timeout: {millis}ms (must not be negative)")]
    InvalidTimeout {
        /// Which timeout setting was invalid ("read" or "connect").
        name: &'static str,
        /// The rejected value in milliseconds.
        millis: i64,
    },

    /// A configured header value contained bytes that cannot appear in an
    /// HTTP header.
    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    /// No response was received from a candidate endpoint (connect failure
    /// or read timeout).
    #[error("could not reach {url}: {reason}")]
    Unreachable {
        /// The request URL that could not be reached.
        url: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// A candidate endpoint answered with a 4xx status other than 404.
    #[error("client error from {url}: status {status}")]
    ClientStatus {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A candidate endpoint answered with a 5xx status.
    #[error("server error from {url}: status {status}")]
    ServerStatus {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A candidate endpoint answered 2xx but the body was not a valid
    /// environment document.
    #[error("malformed environment from {url}: {reason}")]
    MalformedBody {
        /// The request URL.
        url: String,
        /// Parse failure description.
        reason: String,
    },

    /// Aggregate failure surfaced when `fail_fast` is set and no candidate
    /// produced a usable environment.
    #[error("could not locate environment for labels {labels:?} and the fail fast property is set, failing")]
    FailFast {
        /// The labels that were tried, in order.
        labels: Vec<String>,
        /// The most recent classified cause, if one exists. Absent when the
        /// final outcome carried no underlying error (404, or a non-2xx
        /// response the transport did not treat as an error).
        #[source]
        cause: Option<Box<ConfigError>>,
    },

    /// No file resource matched the requested coordinates.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConfigError::ClientStatus { status, .. } | ConfigError::ServerStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_fast_names_labels() {
        let err = ConfigError::FailFast {
            labels: vec!["main".to_string(), "v1.2".to_string()],
            cause: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("main"));
        assert!(msg.contains("v1.2"));
    }

    #[test]
    fn fail_fast_exposes_cause_as_source() {
        use std::error::Error;

        let cause = ConfigError::ServerStatus {
            url: "http://localhost:8888/app/default".to_string(),
            status: 500,
        };
        let err = ConfigError::FailFast {
            labels: vec!["main".to_string()],
            cause: Some(Box::new(cause)),
        };
        let source = err.source().expect("cause should be exposed");
        assert!(source.to_string().contains("500"));
    }

    #[test]
    fn status_accessor() {
        let err = ConfigError::ClientStatus {
            url: "http://x/a/b".to_string(),
            status: 400,
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(ConfigError::ResourceNotFound("x".to_string()).status(), None);
    }
}
