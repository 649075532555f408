//! Property-based integration tests for schema discovery and the table
//! browser.

use fabricscope_core::table::{
    discover_columns, BrowserOptions, BrowserView, SortDirection, SortSpec, TableBrowser,
};
use fabricscope_core::Record;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;

// =============================================================================
// Generators
// =============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Node".to_string()),
        Just("Port".to_string()),
        Just("State".to_string()),
        Just("Errors".to_string()),
        Just("__tier".to_string()),
        "[A-E]{1,2}",
    ]
}

fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (0i64..50).prop_map(|n| json!(n)),
        "[a-c]{0,2}[0-9]{0,2}".prop_map(|s| json!(s)),
        any::<bool>().prop_map(|b| json!(b)),
    ]
}

fn arb_record() -> impl Strategy<Value = Record> {
    proptest::collection::vec((arb_key(), arb_cell()), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect::<Record>())
}

fn arb_records(max_count: usize) -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(arb_record(), 0..=max_count)
}

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_key(), 0..4)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Discovered columns are duplicate-free and hidden-free**
    #[test]
    fn prop_discovery_is_duplicate_and_hidden_free(
        records in arb_records(20),
        preferred in arb_names(),
        hidden in arb_names(),
    ) {
        let columns = discover_columns(&records, preferred.as_slice(), hidden.as_slice());

        let unique: HashSet<&String> = columns.iter().collect();
        prop_assert_eq!(unique.len(), columns.len());
        for column in &columns {
            prop_assert!(!hidden.contains(column));
            prop_assert!(!column.starts_with("__"));
            prop_assert!(records.iter().any(|r| r.contains_key(column)));
        }
    }

    /// **Property 2: Every visible field of every record is discovered**
    #[test]
    fn prop_discovery_covers_all_fields(records in arb_records(20)) {
        let columns = discover_columns(&records, &[] as &[&str], &[] as &[&str]);

        for record in &records {
            for key in record.keys().filter(|k| !k.starts_with("__")) {
                prop_assert!(columns.contains(key));
            }
        }
    }

    /// **Property 3: Pagination clamps to the page range**
    #[test]
    fn prop_page_is_clamped(
        records in arb_records(40),
        page_size in 0usize..8,
        page in 0usize..30,
    ) {
        let mut browser = TableBrowser::new(
            records.as_slice(),
            BrowserOptions::default().with_page_size(page_size),
        );
        browser.go_to_page(page);

        let total_pages = browser.total_pages();
        prop_assert!(total_pages >= 1);
        prop_assert!(browser.current_page() >= 1);
        prop_assert!(browser.current_page() <= total_pages);
        prop_assert!(browser.page_indices().len() <= page_size.max(1));

        if let BrowserView::Table(table) = browser.view() {
            prop_assert_eq!(table.page, browser.current_page());
        }
    }

    /// **Property 4: Sorting permutes rows and is stable**
    ///
    /// Rows with equal sort keys keep their original relative order.
    #[test]
    fn prop_sort_is_stable_permutation(
        records in arb_records(30),
        key in arb_key(),
        descending in any::<bool>(),
    ) {
        let direction = if descending { SortDirection::Desc } else { SortDirection::Asc };
        let mut browser = TableBrowser::new(
            records.as_slice(),
            BrowserOptions::default().with_page_size(1000),
        );
        browser.set_sort(Some(SortSpec::new(key.clone(), direction)));

        let order = browser.page_indices().to_vec();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..records.len()).collect::<Vec<_>>());

        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let same_key = records[a].get(&key).filter(|v| !v.is_null())
                == records[b].get(&key).filter(|v| !v.is_null());
            if same_key {
                prop_assert!(a < b, "equal keys out of source order: {} before {}", a, b);
            }
        }
    }

    /// **Property 5: Search only keeps rows containing the term**
    #[test]
    fn prop_search_keeps_matching_rows(records in arb_records(30), term in "[a-c0-9]{1,2}") {
        let mut browser = TableBrowser::new(
            records.as_slice(),
            BrowserOptions::default().with_page_size(1000),
        );
        browser.set_search(term.clone());

        let columns = browser.columns().to_vec();
        let kept: HashSet<usize> = browser.page_indices().iter().copied().collect();
        for (index, record) in records.iter().enumerate() {
            let matches = columns.iter().any(|c| {
                fabricscope_core::values::as_search_text(record.get(c)).contains(&term)
            });
            prop_assert_eq!(kept.contains(&index), matches);
        }
    }
}
