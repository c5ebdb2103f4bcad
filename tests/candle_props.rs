use std::collections::HashSet;

use proptest::prelude::*;

use threebar::market::candles::CandleAggregator;
use threebar::market::types::Tick;

/// Non-decreasing tick streams: each step advances time by up to a few
/// minutes (often staying inside the current one) and carries a finite
/// positive bid.
fn tick_streams() -> impl Strategy<Value = Vec<Tick>> {
    prop::collection::vec((0i64..3, 1.0f64..1000.0), 1..120).prop_map(|steps| {
        let mut ts_ms = 1_709_392_800_000i64;
        steps
            .into_iter()
            .map(|(advance_minutes, bid)| {
                ts_ms += advance_minutes * 60_000 + 1_500;
                Tick::new(ts_ms, bid)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn bar_count_tracks_distinct_minutes_in_first_seen_order(ticks in tick_streams()) {
        let mut agg = CandleAggregator::new(10_000);

        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for tick in &ticks {
            agg.ingest(tick);
            let key = tick.minute_key().expect("timestamps are representable");
            if seen.insert(key.clone()) {
                expected.push(key);
            }
        }

        let got: Vec<String> = agg.bars().iter().map(|b| b.minute.clone()).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn ohlc_invariants_hold_after_every_tick(ticks in tick_streams()) {
        let mut agg = CandleAggregator::new(10_000);

        for tick in &ticks {
            agg.ingest(tick);
            for bar in agg.bars() {
                prop_assert!(bar.low <= bar.high);
                prop_assert!(bar.low <= bar.open && bar.open <= bar.high);
                if let Some(close) = bar.close {
                    prop_assert!(bar.low <= close && close <= bar.high);
                }
            }
        }
    }

    #[test]
    fn only_the_most_recent_bar_is_open(ticks in tick_streams()) {
        let mut agg = CandleAggregator::new(10_000);
        for tick in &ticks {
            agg.ingest(tick);
        }

        let bars = agg.bars();
        for (i, bar) in bars.iter().enumerate() {
            if i + 1 == bars.len() {
                prop_assert!(bar.close.is_none());
            } else {
                prop_assert!(bar.close.is_some());
            }
        }
    }

    #[test]
    fn closes_replay_the_last_bid_before_each_boundary(ticks in tick_streams()) {
        let mut agg = CandleAggregator::new(10_000);

        let mut expected_closes = Vec::new();
        let mut prev: Option<&Tick> = None;
        for tick in &ticks {
            if let Some(p) = prev {
                if p.minute_key() != tick.minute_key() {
                    expected_closes.push(p.bid);
                }
            }
            agg.ingest(tick);
            prev = Some(tick);
        }

        let got: Vec<f64> = agg
            .bars()
            .iter()
            .filter_map(|b| b.close)
            .collect();
        prop_assert_eq!(got, expected_closes);
    }

    #[test]
    fn retention_bounds_memory(ticks in tick_streams()) {
        let mut agg = CandleAggregator::new(4);
        for tick in &ticks {
            agg.ingest(tick);
        }
        prop_assert!(agg.bars().len() <= 4);
    }
}
