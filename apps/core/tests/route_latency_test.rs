use std::time::Instant;

use wikiroute_core::router::classify;
use wikiroute_core::signal::{ActivationSignal, DeepLink};

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn classification_p95_under_2ms() {
    let signals: Vec<ActivationSignal> = (0..1_000)
        .map(|i| {
            let raw = match i % 3 {
                0 => format!("wikipedia://search?term=Topic%20{i:04}&uid=u{i}"),
                1 => format!(
                    "https://en.wikipedia.org/wiki/Special:Search?search=Topic%20{i:04}"
                ),
                _ => format!("https://en.wikipedia.org/wiki/Topic_{i:04}"),
            };
            ActivationSignal::Link(DeepLink::parse(&raw).unwrap())
        })
        .collect();

    for signal in signals.iter().take(100) {
        let _ = classify(signal);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let start = Instant::now();
            for signal in &signals {
                let _ = classify(signal);
            }
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 2.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 2.0ms); batches={batch_p95:?}",
    );
}
