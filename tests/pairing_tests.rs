//! Integration tests for app-list parsing and pair enumeration.
//!
//! The enumeration counts are the contract the rest of the batch relies
//! on: C(n, 2) pairs in single-list mode, p*q minus the textual overlaps
//! in cross-list mode.

use paircheck::{AppList, AppPair, enumerate_pairs};
use proptest::prelude::*;

fn app_list(entries: &[String]) -> AppList {
    AppList::from_text(&entries.join("\n"))
}

#[test]
fn single_list_enumeration_order_is_outer_then_inner() {
    let list = AppList::from_text("appA\nappB\nappC\n");
    let pairs = enumerate_pairs(&list, None);

    assert_eq!(
        pairs,
        vec![
            AppPair::new("appA", "appB"),
            AppPair::new("appA", "appC"),
            AppPair::new("appB", "appC"),
        ]
    );
}

#[test]
fn comment_lines_do_not_count_toward_pairing() {
    let list = AppList::from_text("appA\n# commented out\nappB\nappC # disabled\nappD\n");
    assert_eq!(list.len(), 3);

    let pairs = enumerate_pairs(&list, None);
    assert_eq!(pairs.len(), 3); // C(3, 2)
}

#[test]
fn cross_list_keeps_both_orders_of_distinct_pairs() {
    let a = AppList::from_text("x\ny\n");
    let b = AppList::from_text("y\nx\n");
    let pairs = enumerate_pairs(&a, Some(&b));

    // Full cross product minus the two identical pairs
    assert_eq!(
        pairs,
        vec![AppPair::new("x", "y"), AppPair::new("y", "x")]
    );
}

proptest! {
    #[test]
    fn single_list_pair_count_is_n_choose_2(
        entries in prop::collection::hash_set("[a-z]{1,8}", 0..16)
    ) {
        let entries: Vec<String> = entries.into_iter().collect();
        let pairs = enumerate_pairs(&app_list(&entries), None);

        let n = entries.len();
        prop_assert_eq!(pairs.len(), n * n.saturating_sub(1) / 2);
        prop_assert!(pairs.iter().all(|p| p.first != p.second));
    }

    #[test]
    fn cross_list_pair_count_is_product_minus_overlap(
        a in prop::collection::hash_set("[a-z]{1,6}", 0..12),
        b in prop::collection::hash_set("[a-z]{1,6}", 0..12),
    ) {
        let overlap = a.intersection(&b).count();
        let a: Vec<String> = a.into_iter().collect();
        let b: Vec<String> = b.into_iter().collect();

        let pairs = enumerate_pairs(&app_list(&a), Some(&app_list(&b)));

        prop_assert_eq!(pairs.len(), a.len() * b.len() - overlap);
        prop_assert!(pairs.iter().all(|p| p.first != p.second));
    }
}
