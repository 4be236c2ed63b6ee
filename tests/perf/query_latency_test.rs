use std::time::Instant;

use crate::index::BookmarkIndex;
use crate::model::BookmarkRecord;
use crate::search::search;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

fn large_index() -> BookmarkIndex {
    let mut records: Vec<BookmarkRecord> = (0..10_000)
        .map(|i| {
            BookmarkRecord::new(
                i,
                &format!("Document {i:05} - Team Wiki"),
                &format!("https://wiki.example.com/pages/{i:05}"),
                None,
            )
        })
        .collect();

    records.push(BookmarkRecord::new(
        10_000,
        "Q4 Report",
        "https://reports.example.com/q4",
        Some("q4"),
    ));
    BookmarkIndex::new(records)
}

#[test]
fn full_scan_query_p95_under_15ms() {
    let index = large_index();

    for _ in 0..30 {
        let _ = search(&index, "q4 report", false, 10);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let start = Instant::now();
            let results = search(&index, "q4 report", false, 10);
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(results.len(), 1);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 15.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 15.0ms); batches={batch_p95:?}",
    );
}

#[test]
fn broad_query_stops_at_limit() {
    let index = large_index();

    let start = Instant::now();
    let results = search(&index, "wiki", false, 10);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    assert_eq!(results.len(), 10);
    assert_eq!(results[9].ordinal, 9);
    assert!(elapsed_ms <= 15.0, "limited scan took {elapsed_ms:.3}ms");
}
