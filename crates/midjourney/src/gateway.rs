use async_trait::async_trait;

use crate::error::MidjourneyError;

/// Outbound Discord operations used by the manager.
#[async_trait]
pub trait DiscordGateway: Send + Sync {
    /// Post an `/imagine` prompt. Returns the id of the posted message.
    async fn submit_prompt(&self, channel_id: u64, prompt: &str) -> Result<u64, MidjourneyError>;

    /// Ask for image `index` (1-based) of the grid in `grid_message_id`.
    async fn request_upscale(
        &self,
        channel_id: u64,
        grid_message_id: u64,
        index: u8,
    ) -> Result<(), MidjourneyError>;
}
