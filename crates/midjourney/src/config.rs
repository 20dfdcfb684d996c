use std::time::Duration;

/// Default interval between ready-queue passes.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Shortest interval the poll loop will tick at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default time a channel may spend on one request before it is abandoned.
pub const DEFAULT_PROCESSING_TIMEOUT_SECS: u64 = 600;

/// Runtime settings for the Midjourney bridge.
#[derive(Debug, Clone)]
pub struct MidjourneyConfig {
    /// User id of the Midjourney bot; only its messages are interpreted.
    pub bot_id: u64,
    /// Channel used for characters without their own channel.
    pub default_channel_id: Option<u64>,
    pub poll_interval: Duration,
    pub processing_timeout: Duration,
}

impl MidjourneyConfig {
    pub fn new(bot_id: u64) -> Self {
        Self {
            bot_id,
            default_channel_id: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            processing_timeout: Duration::from_secs(DEFAULT_PROCESSING_TIMEOUT_SECS),
        }
    }

    /// The channel serving a character: its own, else the default.
    pub fn resolve_channel(&self, character_channel: Option<u64>) -> Option<u64> {
        character_channel
            .filter(|id| *id != 0)
            .or(self.default_channel_id.filter(|id| *id != 0))
    }
}
