//! Behavioral scenarios from the design's testable-properties list (S1-S6),
//! plus the cross-cutting invariants (minimality, freeze round-trip, query
//! laws, idempotence, order-independence) exercised over the public `Mdag`
//! API rather than its internals.

use std::collections::BTreeSet;

use mdag::Mdag;

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn s1_shared_suffix_merges_to_one_accepting_node() {
    init_logging();
    let mut dict = Mdag::new();
    dict.add_all(["cat", "cats", "fact", "facts"]).unwrap();
    assert_eq!(dict.size(), 4);

    let classes_before = dict.equivalence_class_count().unwrap();
    let nodes_before = dict.node_count().unwrap();
    // Every reachable non-source node is its own equivalence class's sole
    // representative once the graph is minimal.
    assert_eq!(nodes_before, classes_before + 1);

    dict.freeze();
    assert_eq!(dict.size(), 4);
    assert_eq!(dict.get_all_strings(), set(&["cat", "cats", "fact", "facts"]));
}

#[test]
fn s2_remove_interior_string_keeps_descendants() {
    init_logging();
    let mut dict = Mdag::new();
    dict.add_all(["a", "ab", "abc"]).unwrap();
    assert!(dict.remove("ab").unwrap());

    assert_eq!(dict.get_all_strings(), set(&["a", "abc"]));
    assert_eq!(dict.size(), 2);
    assert!(!dict.contains("ab"));
    // "ab" is gone but "abc" -- which shares "ab"'s former path -- survives.
    assert!(dict.contains("abc"));
    assert_eq!(dict.strings_starting_with("ab"), set(&["abc"]));
}

#[test]
fn s3_prefix_suffix_substring_queries() {
    init_logging();
    let mut dict = Mdag::new();
    dict.add_all(["top", "tops", "tap", "taps"]).unwrap();

    assert_eq!(dict.strings_starting_with("to"), set(&["top", "tops"]));
    assert_eq!(dict.strings_ending_with("s"), set(&["taps", "tops"]));
    assert_eq!(dict.strings_containing("ap"), set(&["tap", "taps"]));
}

/// A deterministic xorshift generator in place of a `rand` dependency the
/// teacher crate never carries.
struct Xorshift(u64);

impl Xorshift {
    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn word(&mut self) -> String {
        let len = 3 + (self.next_u64() % 6) as usize;
        (0..len)
            .map(|_| (b'a' + (self.next_u64() % 26) as u8) as char)
            .collect()
    }
}

#[test]
fn s4_large_random_sample_contains_is_correct() {
    init_logging();
    // A scaled-down stand-in for the spec's million-string scenario.
    let mut rng = Xorshift(0x2545F4914F6CDD1D);

    let present: BTreeSet<String> = (0..4000).map(|_| rng.word()).collect();

    let mut dict = Mdag::new();
    dict.add_all(present.iter().cloned()).unwrap();
    dict.freeze();

    for w in &present {
        assert!(dict.contains(w), "{w} should be present after freeze");
    }

    let mut absent_checked = 0;
    let mut absent_correct = 0;
    while absent_checked < 4000 {
        let w = rng.word();
        if present.contains(&w) {
            continue;
        }
        absent_checked += 1;
        if !dict.contains(&w) {
            absent_correct += 1;
        }
    }
    assert_eq!(absent_checked, absent_correct);
}

#[test]
fn s5_remove_then_diverge_preserves_minimality() {
    init_logging();
    let mut dict = Mdag::new();
    dict.add_all(["abc", "abd"]).unwrap();
    dict.remove("abc").unwrap();
    dict.add("abce").unwrap();

    assert_eq!(dict.get_all_strings(), set(&["abd", "abce"]));
    assert!(!dict.contains("abc"));
    assert_eq!(
        dict.node_count().unwrap(),
        dict.equivalence_class_count().unwrap() + 1
    );
}

#[test]
fn s6_empty_string_is_a_valid_member() {
    init_logging();
    let mut dict = Mdag::new();
    assert!(dict.add("").unwrap());
    assert_eq!(dict.size(), 1);
    assert!(dict.contains(""));
    assert_eq!(dict.get_all_strings(), set(&[""]));

    dict.freeze();
    assert!(dict.contains(""));
    assert_eq!(dict.get_all_strings(), set(&[""]));
}

#[test]
fn freeze_round_trip_preserves_every_query() {
    init_logging();
    let mut dict = Mdag::new();
    dict.add_all(["abandon", "abacus", "cabana", "banana", "ban"]).unwrap();

    let all = dict.get_all_strings();
    let starting = dict.strings_starting_with("aba");
    let ending = dict.strings_ending_with("ana");
    let containing = dict.strings_containing("ban");

    dict.freeze();

    assert_eq!(dict.get_all_strings(), all);
    assert_eq!(dict.strings_starting_with("aba"), starting);
    assert_eq!(dict.strings_ending_with("ana"), ending);
    assert_eq!(dict.strings_containing("ban"), containing);
    for w in &all {
        assert!(dict.contains(w));
    }
}

#[test]
fn query_laws_hold_over_a_mixed_dictionary() {
    init_logging();
    let words = ["rust", "rusty", "crust", "trust", "dust", "rustic"];
    let mut dict = Mdag::new();
    dict.add_all(words).unwrap();

    assert_eq!(dict.get_all_strings(), dict.strings_starting_with(""));

    for w in words {
        assert!(dict.strings_starting_with("rust").contains(w) == w.starts_with("rust"));
        assert!(dict.strings_ending_with("ust").contains(w) == w.ends_with("ust"));
        assert!(dict.strings_containing("us").contains(w) == w.contains("us"));
    }
}

#[test]
fn idempotent_add_and_remove() {
    init_logging();
    let mut dict = Mdag::new();
    assert!(dict.add("word").unwrap());
    assert!(!dict.add("word").unwrap());
    assert_eq!(dict.size(), 1);

    assert!(dict.remove("word").unwrap());
    assert!(!dict.remove("word").unwrap());
    assert_eq!(dict.size(), 0);
    assert!(dict.get_all_strings().is_empty());
}

#[test]
fn mutation_after_freeze_is_rejected() {
    init_logging();
    let mut dict = Mdag::new();
    dict.add("word").unwrap();
    dict.freeze();
    assert!(dict.is_frozen());

    assert!(dict.add("other").is_err());
    assert!(dict.remove("word").is_err());
    assert!(dict.add_all(["x", "y"]).is_err());
    // Idempotent: freezing an already-frozen graph is a no-op, not an error.
    dict.freeze();
    assert!(dict.is_frozen());
}

#[test]
fn insertion_order_does_not_affect_the_accepted_set() {
    init_logging();
    let words = ["ab", "abc", "abd", "b", "bc", "", "a"];

    let mut forward = Mdag::new();
    forward.add_all(words).unwrap();

    let mut backward = Mdag::new();
    backward.add_all(words.iter().rev().copied()).unwrap();

    assert_eq!(forward.size(), backward.size());
    assert_eq!(forward.get_all_strings(), backward.get_all_strings());

    forward.freeze();
    backward.freeze();
    assert_eq!(forward.get_all_strings(), backward.get_all_strings());
}

#[test]
fn utf16_code_units_round_trip_without_normalization() {
    init_logging();
    // A surrogate-pair-producing character plus a combining-mark sequence:
    // the graph must treat these as opaque code-unit runs, not normalize
    // or decompose them.
    let mut dict = Mdag::new();
    let words = ["\u{1F600}cat", "cafe\u{0301}", "cafe\u{0301}s"];
    dict.add_all(words).unwrap();
    for w in words {
        assert!(dict.contains(w));
    }
    assert_eq!(dict.get_all_strings(), set(&words));
}

#[test]
fn try_add_all_stops_at_first_producer_error() {
    init_logging();
    let mut dict = Mdag::new();
    let items: Vec<Result<&str, std::num::ParseIntError>> =
        vec![Ok("a"), Ok("b"), "nope".parse::<i32>().map(|_| "c"), Ok("d")];
    assert!(dict.try_add_all(items).is_err());
    assert!(dict.contains("a"));
    assert!(dict.contains("b"));
    assert!(!dict.contains("d"));
}
