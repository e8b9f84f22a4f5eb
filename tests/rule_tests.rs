//! Property tests for rule judging.

use proptest::prelude::*;

use ng_chat::rules::prime::{contains_prime, is_prime};
use ng_chat::{Rule, RuleCatalog, RuleRng, Script, Verdict};

/// Trial division by every candidate below n.
fn is_prime_slow(n: u64) -> bool {
    n >= 2 && (2..n).all(|i| n % i != 0)
}

fn all_rules() -> Vec<Rule> {
    vec![
        Rule::LongMessage { min_chars: 30 },
        Rule::ContainsPrime,
        Rule::ZodiacAnimal,
        Rule::EvenScriptCount { script: Script::Hiragana },
        Rule::EvenScriptCount { script: Script::Katakana },
    ]
}

proptest! {
    #[test]
    fn prop_is_prime_matches_trial_division(n in 0u64..20_000) {
        prop_assert_eq!(is_prime(u128::from(n)), is_prime_slow(n));
    }

    #[test]
    fn prop_single_number_message(n in 0u64..20_000, prefix in "[a-z ]{0,5}", suffix in "[a-z ]{0,5}") {
        let body = format!("{prefix}{n}{suffix}");
        prop_assert_eq!(contains_prime(&body), is_prime_slow(n));
    }

    #[test]
    fn prop_leading_zeros_ignored(n in 0u64..5_000, zeros in 0usize..6) {
        let body = format!("{}{}", "0".repeat(zeros), n);
        prop_assert_eq!(contains_prime(&body), is_prime_slow(n));
    }

    #[test]
    fn prop_product_of_two_is_not_prime(a in 2u64..3_000_000_000, b in 2u64..3_000_000_000) {
        let n = u128::from(a) * u128::from(b);
        prop_assert!(!is_prime(n));
    }

    #[test]
    fn prop_length_rule_threshold(len in 0usize..80) {
        let rule = Rule::LongMessage { min_chars: 30 };
        let body = "字".repeat(len);
        let expected = if len >= 30 { Verdict::Violating } else { Verdict::Safe };
        prop_assert_eq!(rule.judge(&body), expected);
    }

    #[test]
    fn prop_judging_is_deterministic(body in "\\PC{0,60}") {
        for rule in all_rules() {
            prop_assert_eq!(rule.judge(&body), rule.judge(&body));
        }
    }

    #[test]
    fn prop_catalog_only_assigns_its_rules(seed in any::<u64>()) {
        let catalog = RuleCatalog::standard();
        let mut rng = RuleRng::new(seed);
        for _ in 0..8 {
            let rule = catalog.choose(&mut rng);
            prop_assert!(catalog.contains(&rule));
        }
    }
}

#[test]
fn test_large_embedded_numbers_are_fast() {
    // Would take billions of iterations with trial division up to n
    assert!(contains_prime("2147483647"));
    assert!(contains_prime("x 18446744073709551557 y"));
    assert!(!contains_prime("18446744073709551615"));
    assert!(!contains_prime(&"9".repeat(500)));
}

/// Composites that pass Miller-Rabin for every base up to 41 are still caught.
#[test]
fn test_strong_pseudoprime_to_small_bases_is_safe() {
    let psi13 = "3317044064679887385961981";
    assert!(!contains_prime(psi13));
    assert_eq!(Rule::ContainsPrime.judge(&format!("code {psi13}")), Verdict::Safe);
    // 2^89 - 1 is prime and above the same bound
    assert!(contains_prime("618970019642690137449562111"));
}

/// Digits from any script count, as with a Unicode `\d` match.
#[test]
fn test_unicode_decimal_digits() {
    assert_eq!(Rule::ContainsPrime.judge("٧"), Verdict::Violating);
    assert_eq!(Rule::ContainsPrime.judge("७ चाय"), Verdict::Violating);
    assert_eq!(Rule::ContainsPrime.judge("٤ ٨"), Verdict::Safe);
    // one run across scripts: "1" + "٣" reads as 13
    assert!(contains_prime("1٣"));
    assert!(!contains_prime("٢٢"));
}

#[test]
fn test_boundary_inputs() {
    assert!(!contains_prime("0"));
    assert!(!contains_prime("1"));
    assert!(contains_prime("2"));
    assert!(!contains_prime(""));
}
