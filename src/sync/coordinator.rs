//! Long-poll wait on the message log.
//!
//! A waiting request subscribes to the log's length channel and suspends
//! until the length passes its cursor or the timeout fires. No lock is
//! held while suspended, so other requests keep posting and fetching.
//!
//! Either way the request returns the full, per-viewer redacted history
//! and the player's cursor moves to the length it was sent. This also
//! happens on timeout: the client simply receives the list it already had.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::{MessageView, PlayerId, Result, Token};
use crate::feed::MessageLog;
use crate::players::PlayerRegistry;

/// Blocks fetches until there is something new to deliver.
#[derive(Debug, Clone)]
pub struct SyncCoordinator {
    log: Arc<MessageLog>,
    players: Arc<PlayerRegistry>,
    timeout: Duration,
}

impl SyncCoordinator {
    #[must_use]
    pub fn new(log: Arc<MessageLog>, players: Arc<PlayerRegistry>, timeout: Duration) -> Self {
        Self {
            log,
            players,
            timeout,
        }
    }

    /// Longest time a single wait may take.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until the log grows past `token`'s cursor or the timeout elapses,
    /// then return the redacted history and advance the cursor.
    ///
    /// Fails only if `token` has no player.
    pub async fn wait_for_update(&self, token: &Token) -> Result<Vec<MessageView>> {
        let cursor = self.players.cursor(token)?;
        let viewer = token.player_id();

        // Subscribe before the length check so no append can slip between them
        let mut length = self.log.subscribe();
        if !self.log.length_at_least(cursor + 1) {
            let grown = tokio::time::timeout(self.timeout, length.wait_for(|&len| len > cursor))
                .await
                .map(|changed| changed.is_ok())
                .unwrap_or(false);
            if grown {
                debug!(player_id = %viewer, cursor, "fetch woke on new messages");
            } else {
                debug!(player_id = %viewer, cursor, "fetch timed out");
            }
        }

        let (views, delivered) = self.feed_for(&viewer);
        self.players.advance_cursor(token, delivered)?;
        Ok(views)
    }

    /// The whole log as `viewer` may see it, plus the length it covers.
    #[must_use]
    pub fn feed_for(&self, viewer: &PlayerId) -> (Vec<MessageView>, u64) {
        let snapshot = self.log.snapshot();
        let delivered = snapshot.len() as u64;
        let views = snapshot.iter().map(|m| m.view_for(viewer)).collect();
        (views, delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChatError, RuleRng, REDACTED_RULE};
    use crate::rules::{Rule, RuleCatalog};

    fn setup(timeout: Duration) -> (Arc<MessageLog>, Arc<PlayerRegistry>, SyncCoordinator) {
        let log = Arc::new(MessageLog::new());
        let players = Arc::new(PlayerRegistry::new(
            RuleCatalog::single(Rule::ContainsPrime),
            RuleRng::new(1),
        ));
        let sync = SyncCoordinator::new(Arc::clone(&log), Arc::clone(&players), timeout);
        (log, players, sync)
    }

    fn post(log: &MessageLog, players: &PlayerRegistry, token: &Token, body: &str) {
        let judged = players.record_post(token, body).unwrap();
        log.append(judged);
    }

    #[tokio::test]
    async fn test_returns_immediately_when_behind() {
        let (log, players, sync) = setup(Duration::from_secs(3600));
        let a = Token::new("a");
        players.get_or_create(&a, log.len());
        post(&log, &players, &a, "hello 7");

        let feed = sync.wait_for_update(&a).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].rule_label, REDACTED_RULE);
        assert_eq!(players.cursor(&a).unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_unchanged_feed() {
        let (log, players, sync) = setup(Duration::from_secs(3600));
        let a = Token::new("a");
        players.get_or_create(&a, log.len());
        post(&log, &players, &a, "first");
        assert_eq!(sync.wait_for_update(&a).await.unwrap().len(), 1);

        // Nothing new: the paused clock auto-advances to the timeout
        let feed = sync.wait_for_update(&a).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].body, "first");
        assert_eq!(players.cursor(&a).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wakes_on_append() {
        let (log, players, sync) = setup(Duration::from_secs(3600));
        let a = Token::new("a");
        let b = Token::new("b");
        players.get_or_create(&a, log.len());
        players.get_or_create(&b, log.len());

        let waiter = {
            let sync = sync.clone();
            let a = a.clone();
            tokio::spawn(async move { sync.wait_for_update(&a).await })
        };
        tokio::task::yield_now().await;
        post(&log, &players, &b, "from b");

        let feed = waiter.await.unwrap().unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].rule_label, "素数を含む文章");
        assert_eq!(players.cursor(&a).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (_, _, sync) = setup(Duration::from_secs(1));
        let err = sync.wait_for_update(&Token::new("nobody")).await.unwrap_err();
        assert!(matches!(err, ChatError::UnknownToken));
    }

    #[test]
    fn test_feed_for_redacts_only_viewer() {
        let (log, players, sync) = setup(Duration::from_secs(1));
        let a = Token::new("a");
        let b = Token::new("b");
        players.get_or_create(&a, 0);
        players.get_or_create(&b, 0);
        post(&log, &players, &a, "by a");
        post(&log, &players, &b, "by b");

        let (views, delivered) = sync.feed_for(&a.player_id());
        assert_eq!(delivered, 2);
        assert_eq!(views[0].rule_label, REDACTED_RULE);
        assert_eq!(views[1].rule_label, "素数を含む文章");
    }
}
