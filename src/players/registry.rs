//! Player table: token -> identity, rule, read cursor, post count.
//!
//! Players are created on first contact and live for the lifetime of the
//! process. The rule assigned at creation never changes.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::core::{redact_rule, ChatError, NewMessage, PlayerId, Result, RuleRng, Token};
use crate::rules::{Rule, RuleCatalog};

/// A player record. Only reachable through the registry.
#[derive(Clone, Debug)]
struct Player {
    player_id: PlayerId,
    rule: Rule,
    cursor: u64,
    post_count: u64,
}

impl Player {
    fn view(&self) -> PlayerView {
        PlayerView {
            player_id: self.player_id.clone(),
            rule: self.rule,
            rule_label: self.rule.label(),
            cursor: self.cursor,
            post_count: self.post_count,
        }
    }
}

/// Point-in-time copy of a player record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub rule: Rule,
    pub rule_label: String,
    /// Log length this player has already been sent.
    pub cursor: u64,
    pub post_count: u64,
}

/// Result of looking a token up with [`PlayerRegistry::get_or_create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Contact {
    /// The token was new; a player was just created.
    First(PlayerView),
    /// The token already had a player.
    Returning(PlayerView),
}

impl Contact {
    #[must_use]
    pub fn view(&self) -> &PlayerView {
        match self {
            Contact::First(view) | Contact::Returning(view) => view,
        }
    }

    #[must_use]
    pub fn into_view(self) -> PlayerView {
        match self {
            Contact::First(view) | Contact::Returning(view) => view,
        }
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        matches!(self, Contact::First(_))
    }
}

#[derive(Debug)]
struct PlayerTable {
    players: FxHashMap<Token, Player>,
    by_id: FxHashMap<PlayerId, Token>,
    rng: RuleRng,
}

/// Shared registry of players.
///
/// Lookups take a read lock; creation, posts and cursor moves take the
/// write lock for a few map operations only. Nothing blocks while a lock
/// is held.
#[derive(Debug)]
pub struct PlayerRegistry {
    catalog: RuleCatalog,
    table: RwLock<PlayerTable>,
}

impl PlayerRegistry {
    /// Create an empty registry drawing rules from `catalog`.
    #[must_use]
    pub fn new(catalog: RuleCatalog, rng: RuleRng) -> Self {
        Self {
            catalog,
            table: RwLock::new(PlayerTable {
                players: FxHashMap::default(),
                by_id: FxHashMap::default(),
                rng,
            }),
        }
    }

    /// The catalog rules are drawn from.
    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    fn read(&self) -> RwLockReadGuard<'_, PlayerTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PlayerTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `token`, creating its player if needed.
    ///
    /// A new player gets a rule from the catalog and a cursor of `log_len`.
    /// An existing player is returned unchanged.
    pub fn get_or_create(&self, token: &Token, log_len: u64) -> Contact {
        if let Some(player) = self.read().players.get(token) {
            return Contact::Returning(player.view());
        }

        let mut table = self.write();
        // Another request may have created it between the two locks
        if let Some(player) = table.players.get(token) {
            return Contact::Returning(player.view());
        }

        let rule = self.catalog.choose(&mut table.rng);
        let player = Player {
            player_id: token.player_id(),
            rule,
            cursor: log_len,
            post_count: 0,
        };
        info!(player_id = %player.player_id, rule = %rule, cursor = log_len, "player joined");

        let view = player.view();
        table.by_id.insert(player.player_id.clone(), token.clone());
        table.players.insert(token.clone(), player);
        Contact::First(view)
    }

    /// Snapshot of the player for `token`, if any.
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<PlayerView> {
        self.read().players.get(token).map(Player::view)
    }

    /// Read cursor of the player for `token`.
    pub fn cursor(&self, token: &Token) -> Result<u64> {
        self.read()
            .players
            .get(token)
            .map(|p| p.cursor)
            .ok_or(ChatError::UnknownToken)
    }

    /// Move the read cursor forward to `log_len`. Never moves it back.
    pub fn advance_cursor(&self, token: &Token, log_len: u64) -> Result<u64> {
        let mut table = self.write();
        let player = table.players.get_mut(token).ok_or(ChatError::UnknownToken)?;
        player.cursor = player.cursor.max(log_len);
        Ok(player.cursor)
    }

    /// Judge `body` against the poster's rule and count the post.
    ///
    /// Returns the judged message, ready to be appended to the log.
    pub fn record_post(&self, token: &Token, body: impl Into<String>) -> Result<NewMessage> {
        let body = body.into();
        let mut table = self.write();
        let player = table.players.get_mut(token).ok_or(ChatError::UnknownToken)?;

        let verdict = player.rule.judge(&body);
        player.post_count += 1;
        debug!(
            player_id = %player.player_id,
            ?verdict,
            post_count = player.post_count,
            "post judged"
        );

        Ok(NewMessage {
            player_id: player.player_id.clone(),
            body,
            rule_label: player.rule.label(),
            verdict,
        })
    }

    /// The rule label of `author` as `viewer` may see it.
    ///
    /// `"?"` when the viewer is the author, `None` for an unknown author.
    #[must_use]
    pub fn view_rule(&self, author: &PlayerId, viewer: &PlayerId) -> Option<String> {
        let table = self.read();
        let token = table.by_id.get(author)?;
        let player = table.players.get(token)?;
        let label = player.rule.label();
        Some(redact_rule(author, viewer, &label).to_string())
    }

    /// Number of players seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new(RuleCatalog::standard(), RuleRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Verdict, REDACTED_RULE};
    use std::sync::Arc;
    use std::thread;

    fn registry(rule: Rule) -> PlayerRegistry {
        PlayerRegistry::new(RuleCatalog::single(rule), RuleRng::new(1))
    }

    #[test]
    fn test_first_contact_creates_player() {
        let reg = registry(Rule::ContainsPrime);
        let token = Token::new("t1");

        let contact = reg.get_or_create(&token, 7);
        assert!(contact.is_first());

        let view = contact.into_view();
        assert_eq!(view.player_id, token.player_id());
        assert_eq!(view.rule, Rule::ContainsPrime);
        assert_eq!(view.rule_label, "素数を含む文章");
        assert_eq!(view.cursor, 7);
        assert_eq!(view.post_count, 0);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_second_contact_is_unchanged() {
        let reg = PlayerRegistry::new(RuleCatalog::standard(), RuleRng::new(3));
        let token = Token::new("t1");

        let first = reg.get_or_create(&token, 2).into_view();
        let second = reg.get_or_create(&token, 99);

        assert!(!second.is_first());
        // cursor is not reset and the rule is kept
        assert_eq!(second.view(), &first);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_record_post_judges_with_own_rule() {
        let reg = registry(Rule::LongMessage { min_chars: 30 });
        let token = Token::new("t1");
        reg.get_or_create(&token, 0);

        let short = reg.record_post(&token, "a".repeat(29)).unwrap();
        assert_eq!(short.verdict, Verdict::Safe);
        let long = reg.record_post(&token, "a".repeat(30)).unwrap();
        assert_eq!(long.verdict, Verdict::Violating);
        assert_eq!(long.rule_label, "30文字以上の文章");
        assert_eq!(long.player_id, token.player_id());

        assert_eq!(reg.get(&token).unwrap().post_count, 2);
    }

    #[test]
    fn test_unknown_token() {
        let reg = registry(Rule::ZodiacAnimal);
        let token = Token::new("never-fetched");

        assert!(matches!(reg.record_post(&token, "hi"), Err(ChatError::UnknownToken)));
        assert!(matches!(reg.cursor(&token), Err(ChatError::UnknownToken)));
        assert!(matches!(reg.advance_cursor(&token, 3), Err(ChatError::UnknownToken)));
        assert!(reg.get(&token).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_advance_cursor_is_monotonic() {
        let reg = registry(Rule::ZodiacAnimal);
        let token = Token::new("t1");
        reg.get_or_create(&token, 4);

        assert_eq!(reg.advance_cursor(&token, 6).unwrap(), 6);
        assert_eq!(reg.advance_cursor(&token, 5).unwrap(), 6);
        assert_eq!(reg.cursor(&token).unwrap(), 6);
    }

    #[test]
    fn test_view_rule_redacts_self() {
        let reg = registry(Rule::ZodiacAnimal);
        let a = Token::new("a");
        let b = Token::new("b");
        reg.get_or_create(&a, 0);
        reg.get_or_create(&b, 0);

        let a_id = a.player_id();
        let b_id = b.player_id();
        assert_eq!(reg.view_rule(&a_id, &a_id).as_deref(), Some(REDACTED_RULE));
        assert_eq!(reg.view_rule(&a_id, &b_id).as_deref(), Some("十二支の動物を含む文章"));
        assert_eq!(reg.view_rule(&Token::new("c").player_id(), &a_id), None);
    }

    #[test]
    fn test_concurrent_first_contact_creates_one_player() {
        let reg = Arc::new(PlayerRegistry::new(RuleCatalog::standard(), RuleRng::new(9)));
        let token = Token::new("shared");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let reg = Arc::clone(&reg);
                let token = token.clone();
                thread::spawn(move || reg.get_or_create(&token, 0))
            })
            .collect();

        let contacts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(contacts.iter().filter(|c| c.is_first()).count(), 1);

        let rule = contacts[0].view().rule;
        assert!(contacts.iter().all(|c| c.view().rule == rule));
        assert_eq!(reg.len(), 1);
    }
}
