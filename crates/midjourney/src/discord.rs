//! serenity-backed Discord client for the Midjourney bridge.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelId, Client, Context, CreateMessage, EventHandler, GatewayIntents, Message, MessageId,
    MessageReference, Ready,
};
use serenity::http::Http;

use crate::error::MidjourneyError;
use crate::gateway::DiscordGateway;
use crate::manager::MidjourneyManager;
use crate::queue::BotReply;

/// Prefix the Midjourney bot listens for.
pub const IMAGINE_PREFIX: &str = "/imagine prompt: ";

/// [`DiscordGateway`] over the serenity REST client.
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }
}

#[async_trait]
impl DiscordGateway for SerenityGateway {
    async fn submit_prompt(&self, channel_id: u64, prompt: &str) -> Result<u64, MidjourneyError> {
        let channel = channel(channel_id)?;
        let message = CreateMessage::new().content(format!("{IMAGINE_PREFIX}{prompt}"));
        let sent = channel.send_message(&self.http, message).await?;
        Ok(sent.id.get())
    }

    async fn request_upscale(
        &self,
        channel_id: u64,
        grid_message_id: u64,
        index: u8,
    ) -> Result<(), MidjourneyError> {
        let channel = channel(channel_id)?;
        let grid = message_id(grid_message_id)?;
        let message = CreateMessage::new()
            .content(format!("U{index}"))
            .reference_message(MessageReference::from((channel, grid)));
        channel.send_message(&self.http, message).await?;
        Ok(())
    }
}

fn channel(id: u64) -> Result<ChannelId, MidjourneyError> {
    if id == 0 {
        return Err(MidjourneyError::InvalidRequest("channel id must be non-zero".into()));
    }
    Ok(ChannelId::new(id))
}

fn message_id(id: u64) -> Result<MessageId, MidjourneyError> {
    if id == 0 {
        return Err(MidjourneyError::InvalidRequest("message id must be non-zero".into()));
    }
    Ok(MessageId::new(id))
}

/// Reduce a Discord message to the fields reply correlation uses.
pub fn bot_reply_from_message(msg: &Message) -> BotReply {
    BotReply {
        channel_id: msg.channel_id.get(),
        message_id: msg.id.get(),
        referenced_message_id: msg
            .message_reference
            .as_ref()
            .and_then(|r| r.message_id)
            .map(|id| id.get()),
        attachment_urls: msg.attachments.iter().map(|a| a.url.clone()).collect(),
    }
}

/// Discord event handler forwarding Midjourney bot messages to the manager.
pub struct MidjourneyHandler {
    manager: Arc<MidjourneyManager>,
}

impl MidjourneyHandler {
    pub fn new(manager: Arc<MidjourneyManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl EventHandler for MidjourneyHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "Connected to Discord");
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.id.get() != self.manager.config().bot_id {
            return;
        }
        self.manager.on_message(bot_reply_from_message(&msg)).await;
    }
}

/// Build the gateway client. Run it with [`start_bot`].
pub async fn init_bot(token: &str, manager: Arc<MidjourneyManager>) -> Result<Client, MidjourneyError> {
    // MESSAGE_CONTENT is privileged and must be enabled in the developer portal.
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let client = Client::builder(token, intents)
        .event_handler(MidjourneyHandler::new(manager))
        .await?;
    Ok(client)
}

/// Run the gateway connection until it closes.
pub async fn start_bot(mut client: Client) -> Result<(), MidjourneyError> {
    tracing::info!("Starting Discord bot");
    client.start().await?;
    Ok(())
}
