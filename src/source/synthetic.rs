//! Synthetic log generator.
//!
//! Produces platform-style log lines made of random words after a fixed
//! response delay, standing in for a remote log API.

use super::{FetchDirection, RowFetcher};
use crate::model::{FetchError, LogLevel, Row, RowContext, RowId, RowMeta};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Default simulated transport latency.
pub const DEFAULT_RESPONSE_TIME: Duration = Duration::from_millis(500);

const WORDS: &[&str] = &[
    "account", "active", "agent", "alpha", "amber", "anchor", "apple", "arrow", "autumn", "badge",
    "balance", "banner", "basket", "beacon", "border", "branch", "breeze", "bridge", "bucket",
    "buffer", "button", "cable", "camera", "canvas", "carbon", "castle", "cedar", "channel",
    "circle", "client", "cloud", "cluster", "column", "comet", "copper", "cotton", "crystal",
    "cursor", "delta", "desert", "dragon", "driver", "echo", "ember", "engine", "falcon", "fabric",
    "feather", "filter", "forest", "frame", "galaxy", "garden", "gate", "glacier", "harbor",
    "header", "helmet", "horizon", "island", "jungle", "kernel", "ladder", "lantern", "ledger",
    "lemon", "meadow", "metric", "mirror", "module", "monitor", "nebula", "needle", "network",
    "object", "ocean", "orbit", "packet", "paddle", "parcel", "pepper", "pilot", "planet",
    "pocket", "portal", "prism", "quartz", "rabbit", "radar", "record", "ribbon", "river",
    "rocket", "router", "saddle", "sample", "server", "shadow", "signal", "socket", "spark",
    "spiral", "stream", "summit", "switch", "table", "target", "thread", "ticket", "timber",
    "token", "tower", "trail", "tunnel", "valley", "vector", "velvet", "window", "winter",
];

const LEVELS: [LogLevel; 3] = [LogLevel::Warn, LogLevel::Info, LogLevel::Debug];

/// Inclusive word-count range for generated messages.
pub const MESSAGE_WORDS: (usize, usize) = (5, 40);

/// Generates random platform log rows after `response_time`.
#[derive(Debug)]
pub struct SyntheticFetcher {
    response_time: Duration,
    rng: Mutex<SmallRng>,
}

impl SyntheticFetcher {
    /// Create a generator with the given simulated latency.
    pub fn new(response_time: Duration) -> Self {
        Self {
            response_time,
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    /// Create a deterministic generator for tests and benchmarks.
    pub fn seeded(response_time: Duration, seed: u64) -> Self {
        Self {
            response_time,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Generate `count` rows immediately, without the simulated latency.
    pub fn generate(&self, count: usize) -> Vec<Row> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        (0..count).map(|_| make_row(&mut *rng)).collect()
    }
}

impl Default for SyntheticFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TIME)
    }
}

#[async_trait]
impl RowFetcher for SyntheticFetcher {
    async fn fetch(&self, direction: FetchDirection, count: usize) -> Result<Vec<Row>, FetchError> {
        tokio::time::sleep(self.response_time).await;
        debug!(%direction, count, "Synthetic fetch served");
        Ok(self.generate(count))
    }
}

fn words<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<&'static str> {
    (0..count)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect()
}

/// Build one random log row.
fn make_row<R: Rng + ?Sized>(rng: &mut R) -> Row {
    let now = Utc::now();
    let id_text = words(rng, 4).concat();
    let word_count = rng.random_range(MESSAGE_WORDS.0..=MESSAGE_WORDS.1);
    let message = words(rng, word_count).join(" ");
    let meta = RowMeta {
        dt: now,
        inserted_at: now,
        level: LEVELS[rng.random_range(0..LEVELS.len())],
        context: RowContext {
            source: "app".to_string(),
            dyno_type: "web".to_string(),
            dyno_id: rng.random_range(0..6),
        },
        version: rng.random_range(0..11),
    };

    // Four dictionary words are never empty
    match RowId::new(id_text) {
        Ok(id) => Row::new(id, message, Some(meta)),
        Err(_) => Row::placeholder(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_rows_are_loaded_with_metadata() {
        let fetcher = SyntheticFetcher::seeded(Duration::ZERO, 7);
        let rows = fetcher.generate(50);

        assert_eq!(rows.len(), 50);
        for row in &rows {
            assert!(!row.is_placeholder());
            assert!(row.id().is_some());
            let meta = row.meta().expect("metadata");
            assert!(meta.context.dyno_id < 6);
            assert!(meta.version <= 10);
            assert_eq!(meta.context.source, "app");
        }
    }

    #[test]
    fn message_word_count_within_bounds() {
        let fetcher = SyntheticFetcher::seeded(Duration::ZERO, 11);
        for row in fetcher.generate(100) {
            let count = row.message().split(' ').count();
            assert!((MESSAGE_WORDS.0..=MESSAGE_WORDS.1).contains(&count), "{count}");
        }
    }

    #[test]
    fn seeded_generators_are_deterministic_in_content() {
        let a = SyntheticFetcher::seeded(Duration::ZERO, 3).generate(5);
        let b = SyntheticFetcher::seeded(Duration::ZERO, 3).generate(5);
        let messages = |rows: &[Row]| rows.iter().map(|r| r.message().to_string()).collect::<Vec<_>>();
        assert_eq!(messages(&a), messages(&b));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_waits_for_response_time() {
        let fetcher = SyntheticFetcher::seeded(Duration::from_millis(500), 1);
        let started = tokio::time::Instant::now();

        let rows = fetcher.fetch(FetchDirection::Older, 300).await.unwrap();

        assert_eq!(rows.len(), 300);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
