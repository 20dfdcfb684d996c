//! Per-channel ready queues and in-flight bookkeeping.
//!
//! Pure state with no I/O; [`MidjourneyManager`](crate::MidjourneyManager)
//! drives it and performs the Discord calls.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use fourtoon_core::types::DbId;

/// One panel to be drawn for a diary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRequest {
    pub diary_id: DbId,
    pub prompt: String,
    pub grid_position: i16,
    pub channel_id: u64,
}

/// The request a channel is currently working on.
#[derive(Debug, Clone)]
pub struct ProcessingEntry {
    pub request: PanelRequest,
    pub started_at: Instant,
    /// Our `/imagine` message, once Discord has accepted it.
    pub prompt_message_id: Option<u64>,
    /// Message holding the four-image grid, once the bot has answered.
    pub grid_message_id: Option<u64>,
    pub image_selection_processed: bool,
}

/// A message from the Midjourney bot, reduced to what correlation needs.
#[derive(Debug, Clone, Default)]
pub struct BotReply {
    pub channel_id: u64,
    pub message_id: u64,
    pub referenced_message_id: Option<u64>,
    pub attachment_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The grid arrived; one image must be selected for upscaling.
    SelectImage {
        channel_id: u64,
        grid_message_id: u64,
        request: PanelRequest,
    },
    /// The upscaled image arrived; the channel is free again.
    Completed {
        request: PanelRequest,
        image_url: String,
    },
    Ignored,
}

#[derive(Debug, Default)]
pub struct MidjourneyQueue {
    ready: HashMap<u64, VecDeque<PanelRequest>>,
    processing: HashMap<u64, ProcessingEntry>,
}

impl MidjourneyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request to its channel's ready queue.
    pub fn push(&mut self, request: PanelRequest) {
        self.ready
            .entry(request.channel_id)
            .or_default()
            .push_back(request);
    }

    /// Move the head of every idle channel's queue into processing.
    ///
    /// Returned requests are ordered by channel id.
    pub fn take_dispatchable(&mut self, now: Instant) -> Vec<PanelRequest> {
        let mut channels: Vec<u64> = self
            .ready
            .iter()
            .filter(|(channel, queue)| !queue.is_empty() && !self.processing.contains_key(channel))
            .map(|(channel, _)| *channel)
            .collect();
        channels.sort_unstable();

        let mut taken = Vec::with_capacity(channels.len());
        for channel in channels {
            let Some(request) = self.ready.get_mut(&channel).and_then(VecDeque::pop_front) else {
                continue;
            };
            self.processing.insert(
                channel,
                ProcessingEntry {
                    request: request.clone(),
                    started_at: now,
                    prompt_message_id: None,
                    grid_message_id: None,
                    image_selection_processed: false,
                },
            );
            taken.push(request);
        }
        self.ready.retain(|_, queue| !queue.is_empty());
        taken
    }

    /// Remember the id of the prompt message posted for `channel_id`'s
    /// in-flight request.
    pub fn record_prompt(&mut self, channel_id: u64, message_id: u64) {
        if let Some(entry) = self.processing.get_mut(&channel_id) {
            entry.prompt_message_id = Some(message_id);
        }
    }

    /// Interpret a bot message against the channel's in-flight request.
    ///
    /// A grid reply that references some other message than the current
    /// prompt belongs to an earlier, abandoned request and is ignored.
    pub fn handle_reply(&mut self, reply: &BotReply) -> ReplyOutcome {
        let Some(image_url) = reply.attachment_urls.first() else {
            return ReplyOutcome::Ignored;
        };
        let Some(entry) = self.processing.get_mut(&reply.channel_id) else {
            return ReplyOutcome::Ignored;
        };

        if !entry.image_selection_processed {
            if let Some(referenced) = reply.referenced_message_id {
                if entry.prompt_message_id != Some(referenced) {
                    return ReplyOutcome::Ignored;
                }
            }
            entry.grid_message_id = Some(reply.message_id);
            entry.image_selection_processed = true;
            return ReplyOutcome::SelectImage {
                channel_id: reply.channel_id,
                grid_message_id: reply.message_id,
                request: entry.request.clone(),
            };
        }

        // The upscale must answer the grid it was requested from.
        if let (Some(grid), Some(referenced)) = (entry.grid_message_id, reply.referenced_message_id)
        {
            if grid != referenced {
                return ReplyOutcome::Ignored;
            }
        }

        match self.processing.remove(&reply.channel_id) {
            Some(entry) => ReplyOutcome::Completed {
                request: entry.request,
                image_url: image_url.clone(),
            },
            None => ReplyOutcome::Ignored,
        }
    }

    /// Drop in-flight requests that have run for at least `timeout`.
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> Vec<PanelRequest> {
        let expired: Vec<u64> = self
            .processing
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.started_at) >= timeout)
            .map(|(channel, _)| *channel)
            .collect();

        expired
            .into_iter()
            .filter_map(|channel| self.processing.remove(&channel))
            .map(|entry| entry.request)
            .collect()
    }

    /// Free a channel whose request could not be sent.
    pub fn release(&mut self, channel_id: u64) -> Option<PanelRequest> {
        self.processing
            .remove(&channel_id)
            .map(|entry| entry.request)
    }

    pub fn processing(&self, channel_id: u64) -> Option<&ProcessingEntry> {
        self.processing.get(&channel_id)
    }

    /// Number of requests waiting in `channel_id`'s ready queue.
    pub fn ready_len(&self, channel_id: u64) -> usize {
        self.ready.get(&channel_id).map_or(0, VecDeque::len)
    }

    pub fn is_idle(&self) -> bool {
        self.ready.is_empty() && self.processing.is_empty()
    }
}
