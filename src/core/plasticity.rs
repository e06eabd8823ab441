//! Reward-driven plasticity with long and super-long consolidation.
//!
//! One `learn` call per decision cycle. The call folds the reward into the long
//! window, optionally swaps the single-cycle firing evidence for the evidence
//! accumulated over the long (every 3rd cycle) or super-long (every 6th cycle)
//! window, then nudges weights:
//!
//! - reward: `magnitude` random draws from the synapses that fired, each +1 (max 254)
//! - punishment: `magnitude` draws from the fired synapses, each -1 (min 2), and
//!   `magnitude` draws from the silent ones, each reset to 129 so it conducts again
//!
//! Afterwards the evidence used for the update is added into both window traces,
//! finished windows are cleared, short-term activity is zeroed and the cycle
//! counter advances.
//!
//! On a consolidation cycle the evidence added back into the traces is the
//! window trace itself, so a consolidated trace feeds into its own accumulator
//! once more before being cleared. The super-long trace keeps that doubled
//! contribution on long-only cycles.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::{Network, LONG_WINDOW, REACTIVATION_WEIGHT, SUPER_WINDOW, WEIGHT_MAX, WEIGHT_MIN};
use crate::prng::IndexSampler;

/// Which trace, if any, replaced short-term activity for a learn call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Consolidation {
    /// Short-term activity of this cycle was used as is.
    #[default]
    None,
    /// Long-window trace and reward sum were used (cycle divisible by 3).
    Long,
    /// Super-long trace and reward sum were used (cycle divisible by 6).
    SuperLong,
}

/// Summary of one learn call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LearnReport {
    /// Cycle the call ran in (before the counter advanced).
    pub cycle: u64,
    pub consolidation: Consolidation,
    /// Effective reward flag after consolidation overrides.
    pub rewarded: bool,
    /// Effective number of draws per connection layer.
    pub magnitude: u64,
    /// Weights actually incremented.
    pub strengthened: u64,
    /// Weights actually decremented.
    pub weakened: u64,
    /// Silent synapses reset to 129 (every draw counts).
    pub reactivated: u64,
}

impl Network {
    /// Apply a reward (`rewarded = true`) or punishment for the last decision,
    /// sampling with the network's own generator.
    pub fn learn(&mut self, rewarded: bool, magnitude: i64) -> Result<LearnReport> {
        let mut rng = self.rng.clone();
        let report = self.learn_with(&mut rng, rewarded, magnitude);
        self.rng = rng;
        report
    }

    /// Same as [`Network::learn`] but draws synapse positions from `sampler`.
    pub fn learn_with<S: IndexSampler>(
        &mut self,
        sampler: &mut S,
        rewarded: bool,
        magnitude: i64,
    ) -> Result<LearnReport> {
        if magnitude < 0 {
            return Err(NetworkError::NegativeMagnitude { magnitude });
        }

        let cycle = self.cycle;
        let signed = if rewarded { magnitude } else { -magnitude };
        self.long_magnitude = self.long_magnitude.saturating_add(signed);

        let mut rewarded = rewarded;
        let mut magnitude = magnitude.unsigned_abs();
        let mut consolidation = Consolidation::None;

        if cycle % LONG_WINDOW == 0 {
            self.super_magnitude = self.super_magnitude.saturating_add(self.long_magnitude);
            magnitude = self.long_magnitude.unsigned_abs();
            rewarded = self.long_magnitude > 0;
            for (short, long) in self.short_activity.iter_mut().zip(&self.long_activity) {
                short.copy_from_slice(long);
            }
            consolidation = Consolidation::Long;
            tracing::info!(cycle, magnitude, rewarded, "long-memory consolidation");
        }
        if cycle % SUPER_WINDOW == 0 {
            magnitude = self.super_magnitude.unsigned_abs();
            rewarded = self.super_magnitude > 0;
            for (short, sup) in self.short_activity.iter_mut().zip(&self.super_activity) {
                short.copy_from_slice(sup);
            }
            consolidation = Consolidation::SuperLong;
            tracing::info!(cycle, magnitude, rewarded, "super-long-memory consolidation");
        }

        let mut report = LearnReport {
            cycle,
            consolidation,
            rewarded,
            magnitude,
            ..Default::default()
        };

        for l in 0..self.weights.len() {
            partition(&self.short_activity[l], &mut self.active, &mut self.inactive);
            let weights = &mut self.weights[l];

            if rewarded {
                if !self.active.is_empty() {
                    for _ in 0..magnitude {
                        let k = self.active[sampler.sample_index(self.active.len())];
                        if weights[k] < WEIGHT_MAX {
                            weights[k] += 1;
                            report.strengthened += 1;
                        }
                    }
                }
            } else {
                if !self.active.is_empty() {
                    for _ in 0..magnitude {
                        let k = self.active[sampler.sample_index(self.active.len())];
                        if weights[k] > WEIGHT_MIN {
                            weights[k] -= 1;
                            report.weakened += 1;
                        }
                    }
                }
                if !self.inactive.is_empty() {
                    for _ in 0..magnitude {
                        let k = self.inactive[sampler.sample_index(self.inactive.len())];
                        weights[k] = REACTIVATION_WEIGHT;
                        report.reactivated += 1;
                    }
                }
            }

            let short = &self.short_activity[l];
            accumulate(&mut self.long_activity[l], short);
            accumulate(&mut self.super_activity[l], short);
        }

        if cycle % LONG_WINDOW == 0 {
            for long in &mut self.long_activity {
                long.fill(0);
            }
            self.long_magnitude = 0;
        }
        if cycle % SUPER_WINDOW == 0 {
            for sup in &mut self.super_activity {
                sup.fill(0);
            }
            self.super_magnitude = 0;
        }
        for short in &mut self.short_activity {
            short.fill(0);
        }
        self.cycle += 1;

        tracing::debug!(
            cycle,
            rewarded,
            magnitude,
            strengthened = report.strengthened,
            weakened = report.weakened,
            reactivated = report.reactivated,
            "learn"
        );

        self.last_learn = Some(report.clone());
        Ok(report)
    }
}

// Split flat synapse indices into fired (non-zero activity) and silent.
fn partition(activity: &[u8], active: &mut Vec<usize>, inactive: &mut Vec<usize>) {
    active.clear();
    inactive.clear();
    for (k, a) in activity.iter().enumerate() {
        if *a != 0 {
            active.push(k);
        } else {
            inactive.push(k);
        }
    }
}

fn accumulate(trace: &mut [u8], short: &[u8]) {
    for (t, s) in trace.iter_mut().zip(short) {
        *t = t.wrapping_add(*s);
    }
}
