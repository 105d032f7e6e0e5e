//! Property tests for composition invariants.
//!
//! Uses proptest to verify:
//! 1. Filter idempotence: filtering twice with one window equals filtering once
//! 2. Filter narrowing: a wider window on an already filtered series is a no-op
//! 3. Dedup: no sequence of toggles leaves two entries with the same key
//! 4. Stale discard: only the newest catalog ticket is ever applied

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashSet;

use chartwiz_core::catalog::{CatalogOptions, IndicatorCatalog, Resolution};
use chartwiz_core::data::{IndicatorPage, Pagination};
use chartwiz_core::domain::{
    Category, ChartType, DateWindow, FlatIndicator, IndicatorDescriptor, TimeSeriesPoint,
};
use chartwiz_core::filter::filter_points;
use chartwiz_core::selection::SelectionStore;

// ── Strategies (proptest) ────────────────────────────────────────────

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn arb_points() -> impl Strategy<Value = Vec<TimeSeriesPoint>> {
    prop::collection::vec((0i64..9000, -1e6..1e6_f64), 0..200).prop_map(|raw| {
        raw.into_iter()
            .map(|(offset, value)| TimeSeriesPoint::new(epoch() + Duration::days(offset), value))
            .collect()
    })
}

fn arb_window() -> impl Strategy<Value = DateWindow> {
    (0i64..9000, 0i64..9000).prop_map(|(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        DateWindow::new(epoch() + Duration::days(lo), epoch() + Duration::days(hi)).unwrap()
    })
}

fn flat(id: usize) -> IndicatorDescriptor {
    IndicatorDescriptor::Flat(FlatIndicator {
        indicator_id: format!("I{id}"),
        name: format!("Indicator {id}"),
        latest_date: epoch() + Duration::days(5000),
        latest_value: 0.0,
        default_chart_type: ChartType::Line,
        is_default: false,
        source: None,
        subcategory: None,
        units: None,
        release_frequency: None,
        points: vec![],
    })
}

// ── 1–2. Filter ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn filter_is_idempotent(points in arb_points(), w in arb_window()) {
        let once = filter_points(&points, &w);
        let twice = filter_points(&once, &w);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_keeps_only_points_in_window(points in arb_points(), w in arb_window()) {
        let out = filter_points(&points, &w);
        prop_assert!(out.iter().all(|p| w.start() <= p.date && p.date <= w.end()));
        let expected = points.iter().filter(|p| w.contains(p.date)).count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn wider_window_after_narrow_is_noop(
        points in arb_points(),
        w in arb_window(),
        widen_lo in 0i64..500,
        widen_hi in 0i64..500,
    ) {
        let narrow = filter_points(&points, &w);
        let wide = DateWindow::new(
            w.start() - Duration::days(widen_lo),
            w.end() + Duration::days(widen_hi),
        ).unwrap();
        prop_assert_eq!(filter_points(&narrow, &wide), narrow);
    }
}

// ── 3. Dedup ─────────────────────────────────────────────────────────

proptest! {
    /// Any sequence of on/off toggles over a small key space leaves the
    /// store free of duplicate keys, holding exactly the keys last toggled on.
    #[test]
    fn toggles_never_duplicate(ops in prop::collection::vec((0usize..5, any::<bool>()), 0..60)) {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let descriptors: Vec<_> = (0..5).map(flat).collect();
        let mut store = SelectionStore::new();
        let mut expected = HashSet::new();

        for (idx, on) in ops {
            store.toggle(&descriptors[idx], on, today).unwrap();
            if on {
                expected.insert(descriptors[idx].key());
            } else {
                expected.remove(&descriptors[idx].key());
            }
        }

        let keys: Vec<_> = store.entries().iter().map(|e| e.key()).collect();
        let unique: HashSet<_> = keys.iter().cloned().collect();
        prop_assert_eq!(keys.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }
}

// ── 4. Stale discard ─────────────────────────────────────────────────

proptest! {
    /// Issue several fetches, resolve them in an arbitrary order: only the
    /// last-issued one is applied and the loaded rows are its rows.
    #[test]
    fn only_newest_ticket_applies(n in 1usize..6, order in any::<u64>()) {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let window = DateWindow::max_until(today);
        let mut catalog = IndicatorCatalog::new(CatalogOptions::default());
        let tickets: Vec<_> = (0..n)
            .map(|i| {
                let category = if i % 2 == 0 { Category::Micro } else { Category::Options };
                catalog.begin_fetch(category, window)
            })
            .collect();

        let mut indices: Vec<usize> = (0..n).collect();
        // Deterministic shuffle from the drawn seed.
        let mut seed = order;
        for i in (1..indices.len()).rev() {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (seed >> 33) as usize % (i + 1);
            indices.swap(i, j);
        }

        for &i in &indices {
            let page = IndicatorPage {
                data: vec![flat(i)],
                pagination: Pagination { total: 1, limit: 10, offset: 0, has_more: false },
            };
            let res = catalog.resolve(tickets[i].token, Ok(page));
            prop_assert_eq!(res == Resolution::Applied, i == n - 1);
        }

        prop_assert_eq!(catalog.items().len(), 1);
        prop_assert_eq!(catalog.items()[0].key().id.clone(), format!("I{}", n - 1));
    }
}
