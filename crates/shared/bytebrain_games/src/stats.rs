use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Moves kept for [`MoveStats::last_100_rate`].
pub const RECENT_WINDOW: usize = 100;

/// Rolling valid rate at which a controller counts as steady.
pub const STEADY_RATE: f32 = 0.70;

/// Moves required before `steady_at_move` can be set.
const MIN_MOVES_FOR_STEADY: u32 = 20;

/// Running tally of legal and illegal moves chosen by a controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveStats {
    pub valid: u32,
    pub invalid: u32,
    pub moves: u32,
    /// Outcomes of the last [`RECENT_WINDOW`] moves, oldest first.
    pub recent: VecDeque<bool>,
    recent_valid: u32,
    /// First move at which the rolling rate reached [`STEADY_RATE`].
    pub steady_at_move: Option<u32>,
}

impl MoveStats {
    pub fn new() -> Self {
        Self {
            recent: VecDeque::with_capacity(RECENT_WINDOW + 1),
            ..Default::default()
        }
    }

    pub fn record_move(&mut self, is_valid: bool) {
        if is_valid {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        self.moves += 1;

        self.recent.push_back(is_valid);
        self.recent_valid += u32::from(is_valid);
        if self.recent.len() > RECENT_WINDOW && self.recent.pop_front() == Some(true) {
            self.recent_valid -= 1;
        }

        if self.steady_at_move.is_none()
            && self.moves >= MIN_MOVES_FOR_STEADY
            && self.last_100_rate() >= STEADY_RATE
        {
            self.steady_at_move = Some(self.moves);
        }
    }

    pub fn valid_rate(&self) -> f32 {
        if self.moves == 0 {
            0.0
        } else {
            self.valid as f32 / self.moves as f32
        }
    }

    /// Valid rate over the last [`RECENT_WINDOW`] moves.
    pub fn last_100_rate(&self) -> f32 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent_valid as f32 / self.recent.len() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_report_zero() {
        let s = MoveStats::new();
        assert_eq!(s.valid_rate(), 0.0);
        assert_eq!(s.last_100_rate(), 0.0);
        assert_eq!(s.steady_at_move, None);
    }

    #[test]
    fn window_drops_oldest_moves() {
        let mut s = MoveStats::new();
        for _ in 0..RECENT_WINDOW {
            s.record_move(false);
        }
        assert_eq!(s.last_100_rate(), 0.0);

        for _ in 0..RECENT_WINDOW / 2 {
            s.record_move(true);
        }
        assert_eq!(s.recent.len(), RECENT_WINDOW);
        assert!((s.last_100_rate() - 0.5).abs() < 1e-6);
        assert!((s.valid_rate() - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(s.moves, 150);
    }

    #[test]
    fn steady_needs_enough_moves() {
        let mut s = MoveStats::new();
        for i in 0..250 {
            s.record_move(i % 4 != 0);
        }
        assert_eq!(s.valid + s.invalid, 250);
        assert!((s.last_100_rate() - 0.75).abs() < 1e-6);
        assert_eq!(s.steady_at_move, Some(MIN_MOVES_FOR_STEADY));

        let mut s = MoveStats::new();
        for _ in 0..10 {
            s.record_move(true);
        }
        assert_eq!(s.steady_at_move, None);
    }
}
