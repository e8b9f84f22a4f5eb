//! The chat room: the two operations clients drive.
//!
//! - **fetch**: long-poll for the feed. The first fetch for a token creates
//!   its player and returns at once; later fetches wait for new messages.
//! - **post**: judge a message against the poster's rule and append it.
//!   A token must have fetched at least once before it can post.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::{ChatError, MessageView, Result, RuleRng, ServerConfig, Token};
use crate::feed::MessageLog;
use crate::players::{Contact, PlayerRegistry};
use crate::rules::RuleCatalog;
use crate::sync::SyncCoordinator;

/// Shared state of one game: message log, players, and the long-poll.
///
/// Cheap to clone; clones share the same room.
#[derive(Debug, Clone)]
pub struct ChatRoom {
    log: Arc<MessageLog>,
    players: Arc<PlayerRegistry>,
    sync: SyncCoordinator,
}

impl ChatRoom {
    /// Create an empty room.
    #[must_use]
    pub fn new(catalog: RuleCatalog, rng: RuleRng, poll_timeout: Duration) -> Self {
        let log = Arc::new(MessageLog::new());
        let players = Arc::new(PlayerRegistry::new(catalog, rng));
        let sync = SyncCoordinator::new(Arc::clone(&log), Arc::clone(&players), poll_timeout);
        Self { log, players, sync }
    }

    /// Create a room with the standard rules and the configured timeout and seed.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let rng = RuleRng::from_seed_or_entropy(config.rng_seed);
        info!(seed = rng.seed(), "rule assignment seeded");
        Self::new(RuleCatalog::standard(), rng, config.poll_timeout())
    }

    /// Return the full feed as `token` may see it.
    ///
    /// Creates the player on first contact and returns immediately. On later
    /// calls, waits for messages past the player's cursor or the timeout.
    pub async fn fetch(&self, token: &Token) -> Result<Vec<MessageView>> {
        match self.players.get_or_create(token, self.log.len()) {
            Contact::First(player) => Ok(self.sync.feed_for(&player.player_id).0),
            Contact::Returning(_) => self.sync.wait_for_update(token).await,
        }
    }

    /// Judge and append a message. Returns its log index.
    pub fn post(&self, token: &Token, body: impl Into<String>) -> Result<u64> {
        let judged = self.players.record_post(token, body).map_err(|err| {
            if matches!(err, ChatError::UnknownToken) {
                warn!("post rejected: token has not fetched yet");
            }
            err
        })?;
        Ok(self.log.append(judged))
    }

    #[must_use]
    pub fn log(&self) -> &Arc<MessageLog> {
        &self.log
    }

    #[must_use]
    pub fn players(&self) -> &Arc<PlayerRegistry> {
        &self.players
    }

    #[must_use]
    pub fn sync(&self) -> &SyncCoordinator {
        &self.sync
    }
}
