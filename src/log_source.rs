/// Deterministic synthetic log source.
///
/// Produces a bursty minute-by-minute error spike for a named scenario so
/// the pipeline can be demoed without a production log feed. All randomness
/// comes from one explicitly seeded RNG; the same (scenario, seed) pair
/// always yields the same records.
use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A single timestamped error-log line. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// ISO-8601 with 'Z' suffix.
    pub ts: String,
    pub service: String,
    pub message: String,
}

const TIMEOUT_MSGS: &[&str] = &[
    "Timeout expired. The timeout period elapsed prior to obtaining a connection from the pool.",
    "SqlException: Execution Timeout Expired.",
    "Timeout while connecting to SQL endpoint",
    "Connection pool exhausted. Timeout expired.",
];

const AUTH_MSGS: &[&str] = &[
    "401 Unauthorized: JWT expired",
    "Unauthorized: token expired for user abc",
    "Auth failed: invalid signature in JWT",
    "401 Unauthorized: Bearer token invalid",
];

const THROTTLE_MSGS: &[&str] = &[
    "429 Too Many Requests: rate limit exceeded",
    "Throttled by downstream API due to quota limit",
    "Rate limit hit. Retry-After: 30",
    "Quota exceeded on dependency service",
];

// Errors per minute: spike then cool down, for a nicer trend line.
const BURST_COUNTS: &[usize] = &[2, 3, 6, 9, 7, 4, 3, 2, 2, 1];

fn corpus_for(scenario: &str) -> Vec<&'static str> {
    match scenario {
        "timeout" => TIMEOUT_MSGS.to_vec(),
        "auth" => AUTH_MSGS.to_vec(),
        "throttle" => THROTTLE_MSGS.to_vec(),
        _ => {
            let mut all = TIMEOUT_MSGS.to_vec();
            all.extend_from_slice(AUTH_MSGS);
            all.extend_from_slice(THROTTLE_MSGS);
            all
        }
    }
}

/// Synthesize the burst of error logs for a scenario.
///
/// Records are generated minute by minute per [`BURST_COUNTS`], each with a
/// uniform random second and a message drawn from the scenario corpus, then
/// shuffled so downstream consumers cannot rely on arrival order.
pub fn make_logs(scenario: &str, seed: u64, service: &str) -> Vec<LogRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = Utc.with_ymd_and_hms(2026, 2, 14, 8, 0, 0).unwrap();
    let corpus = corpus_for(scenario);

    let mut logs = Vec::new();
    for (minute, &count) in BURST_COUNTS.iter().enumerate() {
        for _ in 0..count {
            let sec = rng.gen_range(0..60i64);
            let ts = base + Duration::minutes(minute as i64) + Duration::seconds(sec);
            let message = *corpus.choose(&mut rng).expect("non-empty corpus");
            logs.push(LogRecord {
                ts: ts.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                service: service.to_string(),
                message: message.to_string(),
            });
        }
    }

    logs.shuffle(&mut rng);
    logs
}
