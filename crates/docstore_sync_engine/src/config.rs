//! Configuration for the document client.

use docstore_core::AckPolicy;

/// Configuration for document flows.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// How sync acknowledgments are applied.
    pub ack_policy: AckPolicy,
    /// Complete a sync locally, without calling the authority, when no
    /// document is dirty.
    pub skip_empty_sync: bool,
}

impl ClientConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the acknowledgment policy.
    #[must_use]
    pub fn with_ack_policy(mut self, policy: AckPolicy) -> Self {
        self.ack_policy = policy;
        self
    }

    /// Sets whether an empty sync skips the round trip.
    #[must_use]
    pub fn with_skip_empty_sync(mut self, skip: bool) -> Self {
        self.skip_empty_sync = skip;
        self
    }
}
