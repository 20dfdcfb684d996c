//! Midjourney bridge over Discord.
//!
//! Diary panels are drawn by the Midjourney bot. Each Discord channel can
//! only work on one prompt at a time, so requests wait in a per-channel
//! ready queue until the channel is free:
//!
//! 1. [`MidjourneyManager::push_ready_queue`] enqueues a panel request.
//! 2. The poll loop calls [`MidjourneyManager::process_ready_queue`], which
//!    posts the head of every idle channel's queue as an `/imagine` prompt.
//! 3. The bot answers with a grid image; the manager asks for an upscale.
//! 4. The bot answers with the upscaled image; the manager broadcasts
//!    [`MidjourneyEvent::PanelCompleted`].

pub mod config;
pub mod discord;
pub mod error;
pub mod events;
pub mod gateway;
pub mod manager;
pub mod queue;

pub use config::MidjourneyConfig;
pub use error::MidjourneyError;
pub use events::MidjourneyEvent;
pub use gateway::DiscordGateway;
pub use manager::MidjourneyManager;
pub use queue::{BotReply, MidjourneyQueue, PanelRequest, ReplyOutcome};
