// Property tests for pattern extraction, filtering and ranking

use pattern_detector::patterns::{extract, top, FilterConfig};
use pattern_detector::report;
use proptest::prelude::*;

fn token_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just(".".to_string()),
            Just(",".to_string()),
            "[a-d]{1,3}",
        ],
        0..40,
    )
}

fn special_strategy() -> impl Strategy<Value = String> {
    "[a-d,.;]{0,3}"
}

proptest! {
    #[test]
    fn prop_unfiltered_window_count(tokens in token_strategy(), n in 1usize..6) {
        let table = extract(&tokens, n, &FilterConfig::default()).unwrap();
        let expected = tokens.len().checked_sub(n).map_or(0, |d| d + 1);
        prop_assert_eq!(table.total(), expected);
    }

    #[test]
    fn prop_period_filter_is_monotonic(
        tokens in token_strategy(),
        n in 1usize..5,
        special in special_strategy(),
    ) {
        let loose = extract(&tokens, n, &FilterConfig::new(false, &special)).unwrap();
        let strict = extract(&tokens, n, &FilterConfig::new(true, &special)).unwrap();
        prop_assert!(strict.total() <= loose.total());
        prop_assert!(strict.len() <= loose.len());
    }

    #[test]
    fn prop_special_chars_are_monotonic(
        tokens in token_strategy(),
        n in 1usize..5,
        periods in any::<bool>(),
        base in special_strategy(),
        extra in special_strategy(),
    ) {
        let fewer = extract(&tokens, n, &FilterConfig::new(periods, &base)).unwrap();
        let more = extract(&tokens, n, &FilterConfig::new(periods, &format!("{base}{extra}"))).unwrap();
        prop_assert!(more.total() <= fewer.total());
    }

    #[test]
    fn prop_final_token_never_checked(
        tokens in token_strategy(),
        n in 1usize..5,
        periods in any::<bool>(),
        special in special_strategy(),
    ) {
        let filter = FilterConfig::new(periods, &special);
        let table = extract(&tokens, n, &filter).unwrap();
        for (pattern, _) in table.iter() {
            let (_, leading) = pattern.tokens().split_last().unwrap();
            for token in leading {
                prop_assert!(!(periods && token == "."));
                if token != "." {
                    prop_assert!(!token.chars().any(|c| filter.special_chars.contains(&c)));
                }
            }
        }
        // Replacing the last token of a kept window with a forbidden one keeps it accepted
        for (pattern, _) in table.iter() {
            let mut window = pattern.tokens().to_vec();
            if let Some(last) = window.last_mut() {
                *last = format!(".{special}");
            }
            prop_assert!(filter.accepts(&window));
        }
    }

    #[test]
    fn prop_top_is_bounded_and_sorted(tokens in token_strategy(), n in 1usize..4, limit in 0usize..30) {
        let table = extract(&tokens, n, &FilterConfig::default()).unwrap();
        let ranked = top(&table, limit);
        prop_assert!(ranked.len() <= limit);
        prop_assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
        prop_assert!(top(&table, 20).len() <= 20);
    }

    #[test]
    fn prop_save_load_round_trip(tokens in token_strategy(), n in 1usize..4) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.txt");
        let table = extract(&tokens, n, &FilterConfig::default()).unwrap();
        report::save(&table, &path).unwrap();

        let mut loaded = report::load(&path).unwrap();
        let mut expected: Vec<(String, usize)> =
            table.iter().map(|(p, c)| (p.to_string(), c)).collect();
        loaded.sort();
        expected.sort();
        prop_assert_eq!(loaded, expected);
    }
}
