//! Fixed-window request throttling, keyed by an arbitrary identifier
//! (typically `route:client_ip`). Single-process and in-memory: counters
//! are not shared across server instances, so a multi-instance deployment
//! needs an external store instead.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
struct RateRecord {
    count: u32,
    reset_at_ms: u64,
}

/// Outcome of a rate-limit check. Never an error: exhausted limits are a
/// normal decision, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: u64,
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    // The check-then-increment sequence must be atomic under tokio's
    // multi-threaded runtime, hence the lock around the whole table.
    records: Mutex<HashMap<String, RateRecord>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request against `identifier` within the current fixed
    /// window. Windows reset at fixed boundaries; a burst straddling a
    /// boundary can see up to 2x `max_requests`, an accepted trade-off.
    pub fn check(&self, identifier: &str, max_requests: u32, window_ms: u64) -> RateLimitDecision {
        self.check_at(identifier, max_requests, window_ms, now_ms())
    }

    fn check_at(
        &self,
        identifier: &str,
        max_requests: u32,
        window_ms: u64,
        now_ms: u64,
    ) -> RateLimitDecision {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());

        // Amortized cleanup: sweep expired windows on every call rather
        // than running a background timer. O(n) over tracked identifiers.
        records.retain(|_, record| record.reset_at_ms > now_ms);

        match records.get_mut(identifier) {
            None => {
                let reset_at_ms = now_ms + window_ms;
                records.insert(
                    identifier.to_string(),
                    RateRecord {
                        count: 1,
                        reset_at_ms,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: max_requests.saturating_sub(1),
                    reset_at_ms,
                }
            }
            Some(record) if record.count >= max_requests => RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at_ms: record.reset_at_ms,
            },
            Some(record) => {
                record.count += 1;
                RateLimitDecision {
                    allowed: true,
                    remaining: max_requests.saturating_sub(record.count),
                    reset_at_ms: record.reset_at_ms,
                }
            }
        }
    }

    /// Number of identifiers currently tracked (expired or not).
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
