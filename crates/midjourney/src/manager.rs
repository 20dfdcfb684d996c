//! Midjourney request dispatcher.
//!
//! [`MidjourneyManager`] owns the [`MidjourneyQueue`], runs the poll loop
//! that posts prompts to idle channels, and turns bot replies into
//! upscale requests and completion events.
//!
//! Outcomes are broadcast via a [`tokio::sync::broadcast`] channel. Call
//! [`MidjourneyManager::subscribe`] to receive them.

use std::sync::Arc;
use std::time::Instant;

use fourtoon_core::diary::validate_grid_position;
use fourtoon_core::types::DbId;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::{MidjourneyConfig, MIN_POLL_INTERVAL};
use crate::error::MidjourneyError;
use crate::events::MidjourneyEvent;
use crate::gateway::DiscordGateway;
use crate::queue::{BotReply, MidjourneyQueue, PanelRequest, ReplyOutcome};

/// Broadcast channel capacity for panel events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Grid image chosen for upscaling.
pub const UPSCALE_INDEX: u8 = 1;

/// Queues panel requests and drives them through Discord.
///
/// Created once at startup; the returned `Arc` is cloned into the Discord
/// handler and the HTTP state.
pub struct MidjourneyManager {
    queue: Mutex<MidjourneyQueue>,
    gateway: Arc<dyn DiscordGateway>,
    config: MidjourneyConfig,
    event_tx: broadcast::Sender<MidjourneyEvent>,
    cancel: CancellationToken,
    task_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl MidjourneyManager {
    pub fn new(gateway: Arc<dyn DiscordGateway>, config: MidjourneyConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            queue: Mutex::new(MidjourneyQueue::new()),
            gateway,
            config,
            event_tx,
            cancel: CancellationToken::new(),
            task_handle: Mutex::new(None),
        })
    }

    /// Spawn the poll loop that calls [`process_ready_queue`](Self::process_ready_queue)
    /// every poll interval until [`shutdown`](Self::shutdown).
    pub async fn start(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        let cancel = self.cancel.clone();
        let interval = self.config.poll_interval.max(MIN_POLL_INTERVAL);

        let handle = tokio::spawn(async move {
            tracing::info!(interval_ms = interval.as_millis() as u64, "Midjourney poll loop started");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Midjourney poll loop stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        manager.process_ready_queue().await;
                    }
                }
            }
        });

        *self.task_handle.lock().await = Some(handle);
    }

    pub fn config(&self) -> &MidjourneyConfig {
        &self.config
    }

    /// Subscribe to panel outcome events.
    pub fn subscribe(&self) -> broadcast::Receiver<MidjourneyEvent> {
        self.event_tx.subscribe()
    }

    /// Queue one panel of a diary.
    ///
    /// `character_channel` is the character's own Discord channel; without
    /// one the configured default channel is used.
    pub async fn push_ready_queue(
        &self,
        diary_id: DbId,
        prompt: String,
        grid_position: i16,
        character_channel: Option<u64>,
    ) -> Result<PanelRequest, MidjourneyError> {
        let request = self.build_request(diary_id, prompt, grid_position, character_channel)?;
        self.queue.lock().await.push(request.clone());

        tracing::debug!(
            diary_id,
            grid_position,
            channel_id = request.channel_id,
            "Panel request queued"
        );
        Ok(request)
    }

    /// Queue several panels of one diary, all or none.
    ///
    /// Every `(grid_position, prompt)` pair is validated before any is queued.
    pub async fn push_panels(
        &self,
        diary_id: DbId,
        panels: Vec<(i16, String)>,
        character_channel: Option<u64>,
    ) -> Result<Vec<PanelRequest>, MidjourneyError> {
        let requests = panels
            .into_iter()
            .map(|(grid_position, prompt)| {
                self.build_request(diary_id, prompt, grid_position, character_channel)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut queue = self.queue.lock().await;
        for request in &requests {
            queue.push(request.clone());
        }
        drop(queue);

        tracing::debug!(diary_id, panels = requests.len(), "Panel requests queued");
        Ok(requests)
    }

    fn build_request(
        &self,
        diary_id: DbId,
        prompt: String,
        grid_position: i16,
        character_channel: Option<u64>,
    ) -> Result<PanelRequest, MidjourneyError> {
        validate_grid_position(grid_position)
            .map_err(|e| MidjourneyError::InvalidRequest(e.to_string()))?;
        if prompt.trim().is_empty() {
            return Err(MidjourneyError::InvalidRequest("prompt must not be blank".into()));
        }
        let channel_id = self
            .config
            .resolve_channel(character_channel)
            .ok_or(MidjourneyError::ChannelNotConfigured { diary_id })?;

        Ok(PanelRequest {
            diary_id,
            prompt,
            grid_position,
            channel_id,
        })
    }

    /// Expire stale work, then post the next prompt in every idle channel.
    ///
    /// Returns the number of prompts posted.
    pub async fn process_ready_queue(&self) -> usize {
        let now = Instant::now();
        let (expired, dispatch) = {
            let mut queue = self.queue.lock().await;
            let expired = queue.expire(now, self.config.processing_timeout);
            (expired, queue.take_dispatchable(now))
        };

        for request in expired {
            tracing::warn!(
                diary_id = request.diary_id,
                grid_position = request.grid_position,
                channel_id = request.channel_id,
                "Midjourney request timed out",
            );
            self.fail(&request, "processing timed out");
        }

        let mut posted = 0;
        for request in dispatch {
            match self
                .gateway
                .submit_prompt(request.channel_id, &request.prompt)
                .await
            {
                Ok(message_id) => {
                    posted += 1;
                    self.queue
                        .lock()
                        .await
                        .record_prompt(request.channel_id, message_id);
                    tracing::info!(
                        diary_id = request.diary_id,
                        grid_position = request.grid_position,
                        channel_id = request.channel_id,
                        message_id,
                        "Prompt posted to Midjourney",
                    );
                }
                Err(e) => {
                    tracing::error!(
                        diary_id = request.diary_id,
                        channel_id = request.channel_id,
                        error = %e,
                        "Failed to post prompt",
                    );
                    self.queue.lock().await.release(request.channel_id);
                    self.fail(&request, &e.to_string());
                }
            }
        }
        posted
    }

    /// Handle a message authored by the Midjourney bot.
    pub async fn on_message(&self, reply: BotReply) {
        let outcome = self.queue.lock().await.handle_reply(&reply);

        match outcome {
            ReplyOutcome::SelectImage {
                channel_id,
                grid_message_id,
                request,
            } => {
                if let Err(e) = self
                    .gateway
                    .request_upscale(channel_id, grid_message_id, UPSCALE_INDEX)
                    .await
                {
                    tracing::error!(
                        diary_id = request.diary_id,
                        channel_id,
                        error = %e,
                        "Failed to request upscale",
                    );
                    self.queue.lock().await.release(channel_id);
                    self.fail(&request, &e.to_string());
                }
            }
            ReplyOutcome::Completed { request, image_url } => {
                tracing::info!(
                    diary_id = request.diary_id,
                    grid_position = request.grid_position,
                    "Midjourney panel completed",
                );
                let _ = self.event_tx.send(MidjourneyEvent::PanelCompleted {
                    diary_id: request.diary_id,
                    grid_position: request.grid_position,
                    image_url,
                });
            }
            ReplyOutcome::Ignored => {
                tracing::trace!(channel_id = reply.channel_id, "Ignoring bot message");
            }
        }
    }

    /// Stop the poll loop, waiting up to 5 seconds for it to exit.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down Midjourney manager");
        self.cancel.cancel();
        if let Some(handle) = self.task_handle.lock().await.take() {
            let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
        }
    }

    fn fail(&self, request: &PanelRequest, reason: &str) {
        let _ = self.event_tx.send(MidjourneyEvent::PanelFailed {
            diary_id: request.diary_id,
            grid_position: request.grid_position,
            reason: reason.to_string(),
        });
    }
}
