//! Live map errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the crates.
pub type Result<T> = anyhow::Result<T, Error>;

/// Domain level error type returned by the live map crates.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied value is invalid.
    #[error("code: bad_request, description: {0}")]
    BadRequest(String),

    /// The requested vehicle or resource is not tracked.
    #[error("code: not_found, description: {0}")]
    NotFound(String),

    /// An inbound payload could not be decoded.
    #[error("code: invalid_format, description: {0}")]
    InvalidFormat(String),

    /// The animation driver or the outbound channel has gone away.
    #[error("code: channel_closed, description: {0}")]
    ChannelClosed(String),

    /// A non recoverable internal error occurred.
    #[error("code: internal, description: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the stable error code associated with the variant.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::InvalidFormat(_) => "invalid_format",
            Self::ChannelClosed(_) => "channel_closed",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns the error description.
    #[must_use]
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        let chain = err.chain().map(ToString::to_string).collect::<Vec<_>>().join(" -> ");

        // if type is Error, return it with the newly added context
        if let Some(inner) = err.downcast_ref::<Self>() {
            tracing::debug!("Error: {err}, caused by: {inner}");

            return match inner {
                Self::BadRequest(_) => Self::BadRequest(chain),
                Self::NotFound(_) => Self::NotFound(chain),
                Self::Internal(_) => Self::Internal(chain),
                Self::InvalidFormat(e) => Self::InvalidFormat(format!("{err}: {e}")),
                Self::ChannelClosed(e) => Self::ChannelClosed(format!("{err}: {e}")),
            };
        }

        // otherwise, return an Internal error
        Self::Internal(chain)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

#[macro_export]
macro_rules! bad_request {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::BadRequest(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::BadRequest(format!($err))
    };
}

#[macro_export]
macro_rules! not_found {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::NotFound(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::NotFound(format!($err))
    };
}

#[macro_export]
macro_rules! invalid_format {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::InvalidFormat(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::InvalidFormat(format!($err))
    };
}
