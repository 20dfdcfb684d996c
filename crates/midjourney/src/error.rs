use fourtoon_core::types::DbId;

/// Errors raised by the Midjourney bridge.
#[derive(Debug, thiserror::Error)]
pub enum MidjourneyError {
    /// Neither the character nor the configuration names a channel.
    #[error("No Discord channel configured for diary {diary_id}")]
    ChannelNotConfigured { diary_id: DbId },

    #[error("Invalid panel request: {0}")]
    InvalidRequest(String),

    /// A Discord API call failed.
    #[error("Discord error: {0}")]
    Discord(String),
}

impl From<serenity::Error> for MidjourneyError {
    fn from(err: serenity::Error) -> Self {
        Self::Discord(err.to_string())
    }
}
