//! # Provider
//!
//! Provider defines external interfaces for the crates: the wall clock and the
//! outbound message channel.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};

/// The `Clock` trait supplies wall-clock time to the vehicle store.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

/// Reads time from the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Message represents a message to be published.
#[derive(Clone, Debug)]
pub struct Message {
    pub payload: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl Message {
    #[must_use]
    pub fn new(payload: &[u8]) -> Self {
        Self { payload: payload.to_vec(), headers: HashMap::new() }
    }

    /// Attach a header, returning the updated message.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// The `Publisher` trait defines the message publishing behavior towards the
/// server.
pub trait Publisher: Send + Sync {
    /// Send a message to the server.
    fn send(&self, message: &Message) -> impl Future<Output = Result<()>> + Send;
}
