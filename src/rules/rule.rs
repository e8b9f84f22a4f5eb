//! Forbidden-message rules.
//!
//! A `Rule` is a tagged value: the kind of forbidden behaviour plus its
//! parameters. It is chosen once when a player first connects and stored
//! on the player record. Checking is a pure function of the message body
//! and always terminates in time bounded by the body length.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::prime::contains_prime;
use crate::core::Verdict;

/// The twelve animals of the zodiac, as single characters.
pub const ZODIAC_ANIMALS: [char; 12] = [
    '鼠', '牛', '虎', '兎', '竜', '蛇', '馬', '羊', '猿', '鶏', '犬', '猪',
];

/// Writing systems a rule can count characters in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Hiragana,
    Katakana,
}

impl Script {
    /// Does `c` belong to this script?
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        match self {
            Script::Hiragana => ('\u{3041}'..='\u{309F}').contains(&c),
            Script::Katakana => ('\u{30A0}'..='\u{30FF}').contains(&c),
        }
    }

    /// Display name used in rule labels.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Script::Hiragana => "ひらがな",
            Script::Katakana => "カタカナ",
        }
    }
}

/// A forbidden-message rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// The message is at least `min_chars` characters long.
    LongMessage { min_chars: usize },
    /// Some number written in the message is prime.
    ContainsPrime,
    /// The message mentions one of the zodiac animals.
    ZodiacAnimal,
    /// Some character of `script` occurs an even (non-zero) number of times.
    EvenScriptCount { script: Script },
}

impl Rule {
    /// Human-readable label shown to other players.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Rule::LongMessage { min_chars } => format!("{min_chars}文字以上の文章"),
            Rule::ContainsPrime => "素数を含む文章".to_string(),
            Rule::ZodiacAnimal => "十二支の動物を含む文章".to_string(),
            Rule::EvenScriptCount { script } => format!("同じ{}を偶数個含む文章", script.name()),
        }
    }

    /// True if `body` breaks this rule.
    #[must_use]
    pub fn is_violated_by(&self, body: &str) -> bool {
        match *self {
            Rule::LongMessage { min_chars } => body.chars().count() >= min_chars,
            Rule::ContainsPrime => contains_prime(body),
            Rule::ZodiacAnimal => body.chars().any(|c| ZODIAC_ANIMALS.contains(&c)),
            Rule::EvenScriptCount { script } => {
                let mut counts: FxHashMap<char, usize> = FxHashMap::default();
                for c in body.chars().filter(|&c| script.contains(c)) {
                    *counts.entry(c).or_insert(0) += 1;
                }
                counts.values().any(|&n| n % 2 == 0)
            }
        }
    }

    /// Judge `body` against this rule.
    #[must_use]
    pub fn judge(&self, body: &str) -> Verdict {
        Verdict::from_violation(self.is_violated_by(body))
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Rule::LongMessage { min_chars: 30 }.label(), "30文字以上の文章");
        assert_eq!(Rule::ContainsPrime.label(), "素数を含む文章");
        assert_eq!(Rule::ZodiacAnimal.label(), "十二支の動物を含む文章");
        assert_eq!(
            Rule::EvenScriptCount { script: Script::Hiragana }.label(),
            "同じひらがなを偶数個含む文章"
        );
        assert_eq!(format!("{}", Rule::ContainsPrime), "素数を含む文章");
    }

    #[test]
    fn test_long_message_counts_characters() {
        let rule = Rule::LongMessage { min_chars: 30 };

        assert!(!rule.is_violated_by(&"a".repeat(29)));
        assert!(rule.is_violated_by(&"a".repeat(30)));
        // multi-byte characters count once each
        assert!(!rule.is_violated_by(&"あ".repeat(29)));
        assert!(rule.is_violated_by(&"あ".repeat(30)));
        assert!(!rule.is_violated_by(""));
    }

    #[test]
    fn test_contains_prime() {
        let rule = Rule::ContainsPrime;
        assert_eq!(rule.judge("5匹の動物"), Verdict::Violating);
        assert_eq!(rule.judge("4匹の動物"), Verdict::Safe);
        assert_eq!(rule.judge("no numbers"), Verdict::Safe);
    }

    #[test]
    fn test_zodiac_animal() {
        let rule = Rule::ZodiacAnimal;
        assert!(rule.is_violated_by("鼠"));
        assert!(rule.is_violated_by("牛"));
        assert!(rule.is_violated_by("今年は虎年です"));
        assert!(!rule.is_violated_by("猫が好き"));
        assert!(!rule.is_violated_by(""));
    }

    #[test]
    fn test_even_script_count() {
        let rule = Rule::EvenScriptCount { script: Script::Hiragana };
        // あ twice
        assert!(rule.is_violated_by("あいあ"));
        // every hiragana appears once
        assert!(!rule.is_violated_by("あいう"));
        // あ three times
        assert!(!rule.is_violated_by("あああ"));
        // katakana does not count toward hiragana
        assert!(!rule.is_violated_by("アア"));
        assert!(!rule.is_violated_by("abc"));

        let katakana = Rule::EvenScriptCount { script: Script::Katakana };
        assert!(katakana.is_violated_by("アア"));
        assert!(!katakana.is_violated_by("ああ"));
    }

    #[test]
    fn test_script_ranges() {
        assert!(Script::Hiragana.contains('ぁ'));
        assert!(Script::Hiragana.contains('ん'));
        assert!(!Script::Hiragana.contains('ア'));
        assert!(Script::Katakana.contains('ア'));
        assert!(Script::Katakana.contains('ー'));
        assert!(!Script::Katakana.contains('a'));
    }

    #[test]
    fn test_judge_is_deterministic() {
        let rules = [
            Rule::LongMessage { min_chars: 30 },
            Rule::ContainsPrime,
            Rule::ZodiacAnimal,
            Rule::EvenScriptCount { script: Script::Hiragana },
        ];
        let body = "あの牛は7頭いるよ、あ";
        for rule in rules {
            let first = rule.judge(body);
            for _ in 0..10 {
                assert_eq!(rule.judge(body), first);
            }
        }
    }
}
