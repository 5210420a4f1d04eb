//! Size-tiered scheduling policy.
//!
//! Small documents sync on the next frame. Larger ones wait for the delay of
//! the largest tier they reach, and documents at or above the yielding
//! threshold are parsed in chunks. All thresholds are configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parsing::yielding::DEFAULT_CHUNK_LINES;

/// Documents of at least `min_size` bytes wait `delay_ms` before syncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceTier {
    pub min_size: usize,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub frame_interval_ms: u64,
    /// Ascending by `min_size`.
    pub tiers: Vec<DebounceTier>,
    /// Bytes; at or above, reparses use the yielding parser.
    pub yielding_threshold: usize,
    /// Lines parsed per cooperative step.
    pub yield_chunk_lines: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            tiers: vec![
                DebounceTier {
                    min_size: 20_000,
                    delay_ms: 150,
                },
                DebounceTier {
                    min_size: 50_000,
                    delay_ms: 300,
                },
            ],
            yielding_threshold: 100_000,
            yield_chunk_lines: DEFAULT_CHUNK_LINES,
        }
    }
}

/// How a reparse runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Blocking,
    Yielding { chunk_lines: usize },
}

impl SyncConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Wait before syncing a document of `size` bytes; never less than a frame.
    pub fn delay_for(&self, size: usize) -> Duration {
        let tier = self
            .tiers
            .iter()
            .filter(|t| size >= t.min_size)
            .map(|t| t.delay_ms)
            .max()
            .unwrap_or(0);
        Duration::from_millis(tier.max(self.frame_interval_ms))
    }

    pub fn parse_mode(&self, size: usize) -> ParseMode {
        if size >= self.yielding_threshold {
            ParseMode::Yielding {
                chunk_lines: self.yield_chunk_lines.max(1),
            }
        } else {
            ParseMode::Blocking
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 16)]
    #[case(500, 16)]
    #[case(19_999, 16)]
    #[case(20_000, 150)]
    #[case(60_000, 300)]
    #[case(1_000_000, 300)]
    fn delay_grows_with_size(#[case] size: usize, #[case] ms: u64) {
        assert_eq!(SyncConfig::default().delay_for(size), Duration::from_millis(ms));
    }

    #[test]
    fn unsorted_tiers_still_pick_the_largest_reached() {
        let config = SyncConfig {
            tiers: vec![
                DebounceTier {
                    min_size: 10,
                    delay_ms: 500,
                },
                DebounceTier {
                    min_size: 5,
                    delay_ms: 100,
                },
            ],
            ..SyncConfig::default()
        };
        assert_eq!(config.delay_for(7), Duration::from_millis(100));
        assert_eq!(config.delay_for(12), Duration::from_millis(500));
    }

    #[test]
    fn yielding_above_threshold() {
        let config = SyncConfig::default();
        assert_eq!(config.parse_mode(99_999), ParseMode::Blocking);
        assert_eq!(
            config.parse_mode(100_000),
            ParseMode::Yielding { chunk_lines: 512 }
        );
    }
}
