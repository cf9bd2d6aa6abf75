//! MCP Rate Limiting
//!
//! Per-client rate limiting for MCP tool calls and resource reads.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::registry::ToolCategory;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub lookup_per_minute: u32,
    pub generate_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            lookup_per_minute: 240,
            generate_per_minute: 60,
        }
    }
}

/// Tracks rate limit state for a single client
#[derive(Debug)]
struct ClientRateLimitState {
    lookup_count: u32,
    generate_count: u32,
    window_start: Instant,
}

impl ClientRateLimitState {
    fn new() -> Self {
        Self {
            lookup_count: 0,
            generate_count: 0,
            window_start: Instant::now(),
        }
    }

    fn reset_if_expired(&mut self) {
        if self.window_start.elapsed() > WINDOW {
            self.lookup_count = 0;
            self.generate_count = 0;
            self.window_start = Instant::now();
        }
    }
}

pub struct McpRateLimiter {
    config: RateLimitConfig,
    states: Mutex<HashMap<u64, ClientRateLimitState>>,
}

impl McpRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            states: Mutex::new(HashMap::new()),
        }
    }

    fn states(&self) -> MutexGuard<'_, HashMap<u64, ClientRateLimitState>> {
        // Counters stay consistent even if a holder panicked.
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Check if a request is allowed and record it if so.
    /// Returns Ok(()) if allowed, Err(retry_after_secs) if rate limited.
    pub fn check_and_record(&self, client_id: u64, category: ToolCategory) -> Result<(), u32> {
        let mut states = self.states();
        let state = states
            .entry(client_id)
            .or_insert_with(ClientRateLimitState::new);

        state.reset_if_expired();

        let (current, limit) = match category {
            ToolCategory::Lookup => (&mut state.lookup_count, self.config.lookup_per_minute),
            ToolCategory::Generate => (&mut state.generate_count, self.config.generate_per_minute),
        };

        if *current >= limit {
            let elapsed = state.window_start.elapsed().as_secs();
            let retry_after = WINDOW.as_secs().saturating_sub(elapsed) as u32;
            return Err(retry_after.max(1));
        }

        *current += 1;
        Ok(())
    }

    /// (lookup, generate) counts in the current window.
    #[cfg(test)]
    pub fn get_usage(&self, client_id: u64) -> Option<(u32, u32)> {
        self.states()
            .get(&client_id)
            .map(|s| (s.lookup_count, s.generate_count))
    }

    /// Forget a client, e.g. when its connection closes.
    pub fn forget(&self, client_id: u64) {
        self.states().remove(&client_id);
    }
}

impl Default for McpRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
