//! Helpers for driving a `bytebrain::network::Network` from the grid game.
//!
//! The network sees one flat byte vector per decision: a text prefix byte at
//! index 0 and the 3x3 environment encoding embedded at a caller-chosen offset,
//! everything else zero. Its first four output neurons vote for a direction.

use bytebrain::error::NetworkError;
use bytebrain::network::Network;
use bytebrain::plasticity::LearnReport;
use thiserror::Error;

use crate::grid::{Direction, GridWorld, MoveOutcome, PlayerId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrainIoError {
    #[error("environment of {len} bytes at offset {offset} does not fit input width {width}")]
    EnvOutOfRange {
        offset: usize,
        len: usize,
        width: usize,
    },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// How the game is presented to the network and how outcomes are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLayout {
    /// Byte stored at index 0 of every input vector.
    pub prefix: u8,
    /// Where the 9 environment bytes start.
    pub env_offset: usize,
}

impl Default for InputLayout {
    fn default() -> Self {
        Self {
            prefix: b's',
            env_offset: 500,
        }
    }
}

/// Reward sizes for legal and illegal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardScheme {
    pub valid: i64,
    pub invalid: i64,
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self {
            valid: 100,
            invalid: -500,
        }
    }
}

impl RewardScheme {
    /// `(rewarded, magnitude)` for a move outcome: rewarded iff the signed reward is positive.
    pub fn score(&self, outcome: MoveOutcome) -> (bool, i64) {
        let reward = match outcome {
            MoveOutcome::Moved => self.valid,
            MoveOutcome::Blocked => self.invalid,
        };
        (reward > 0, reward.saturating_abs())
    }
}

/// Build a zeroed input of `width` bytes with `prefix` at 0 and `env` at `offset`.
pub fn compose_input(
    width: usize,
    prefix: u8,
    env: &[u8],
    offset: usize,
) -> Result<Vec<u8>, BrainIoError> {
    let end = offset.checked_add(env.len());
    if width == 0 || end.map_or(true, |end| end > width) {
        return Err(BrainIoError::EnvOutOfRange {
            offset,
            len: env.len(),
            width,
        });
    }
    let mut input = vec![0u8; width];
    input[0] = prefix;
    input[offset..offset + env.len()].copy_from_slice(env);
    Ok(input)
}

/// Strict arg-max over the first four outputs (up, left, down, right).
///
/// Ties, or fewer than four outputs, fall back to `Down`.
pub fn interpret_output(output: &[u8]) -> Direction {
    const VOTES: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];
    if output.len() < VOTES.len() {
        return Direction::Down;
    }
    let votes = &output[..VOTES.len()];
    for (k, v) in votes.iter().enumerate() {
        if votes
            .iter()
            .enumerate()
            .all(|(other, o)| other == k || v > o)
        {
            return VOTES[k];
        }
    }
    Direction::Down
}

/// Run one forward pass on `player`'s surroundings and return the chosen direction.
pub fn decide(
    net: &mut Network,
    world: &GridWorld,
    player: PlayerId,
    layout: InputLayout,
) -> Result<Direction, BrainIoError> {
    let env = world.encode_environment(player);
    let input = compose_input(
        net.topology().input_width(),
        layout.prefix,
        &env,
        layout.env_offset,
    )?;
    let output = net.forward(&input)?;
    Ok(interpret_output(output))
}

/// Feed the consequence of the last decision back into the network.
pub fn reinforce(
    net: &mut Network,
    outcome: MoveOutcome,
    rewards: RewardScheme,
) -> Result<LearnReport, BrainIoError> {
    let (rewarded, magnitude) = rewards.score(outcome);
    Ok(net.learn(rewarded, magnitude)?)
}
