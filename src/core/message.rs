//! Chat messages as stored in the log and as shown to a viewer.
//!
//! - `NewMessage`: a judged post that has not been sequenced yet
//! - `Message`: an immutable log entry with its sequence number
//! - `MessageView`: the wire shape one viewer receives, with the author's
//!   rule label replaced by [`REDACTED_RULE`] when the viewer is the author

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Label shown in place of a player's own rule.
pub const REDACTED_RULE: &str = "?";

/// Outcome of judging a message against its author's rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The message breaks the author's rule.
    #[serde(rename = "アウト")]
    Violating,
    /// The message is fine.
    #[serde(rename = "セーフ")]
    Safe,
}

impl Verdict {
    /// Map a checker result to a verdict.
    #[must_use]
    pub const fn from_violation(violates: bool) -> Self {
        if violates {
            Verdict::Violating
        } else {
            Verdict::Safe
        }
    }

    #[must_use]
    pub const fn is_violating(self) -> bool {
        matches!(self, Verdict::Violating)
    }
}

/// A judged post waiting to be appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub player_id: PlayerId,
    pub body: String,
    pub rule_label: String,
    pub verdict: Verdict,
}

/// An entry of the message log. Never changes once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the log (0-based).
    pub sequence: u64,
    pub player_id: PlayerId,
    pub body: String,
    pub rule_label: String,
    pub verdict: Verdict,
}

impl Message {
    /// Sequence a judged post.
    #[must_use]
    pub fn from_new(sequence: u64, new: NewMessage) -> Self {
        Self {
            sequence,
            player_id: new.player_id,
            body: new.body,
            rule_label: new.rule_label,
            verdict: new.verdict,
        }
    }

    /// Render this message for `viewer`, hiding the label from its own author.
    #[must_use]
    pub fn view_for(&self, viewer: &PlayerId) -> MessageView {
        MessageView {
            player_id: self.player_id.clone(),
            body: self.body.clone(),
            rule_label: redact_rule(&self.player_id, viewer, &self.rule_label).to_string(),
            verdict: self.verdict,
        }
    }
}

/// The label `viewer` may see for a rule belonging to `author`.
#[must_use]
pub fn redact_rule<'a>(author: &PlayerId, viewer: &PlayerId, label: &'a str) -> &'a str {
    if author == viewer {
        REDACTED_RULE
    } else {
        label
    }
}

/// One message as delivered to one viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub player_id: PlayerId,
    pub body: String,
    #[serde(rename = "ng")]
    pub rule_label: String,
    #[serde(rename = "judge")]
    pub verdict: Verdict,
}
