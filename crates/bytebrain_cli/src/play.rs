use std::fmt;
use std::io::{self, Write};

use bytebrain::network::{Network, NetworkConfig};
use bytebrain::observer::{describe, NetworkAdapter, NetworkSnapshot};
use bytebrain_games::brain_io::{decide, reinforce};
use bytebrain_games::grid::{GridWorld, MoveOutcome, PlayerId};
use bytebrain_games::stats::MoveStats;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::PlayConfig;
use crate::error::Result;

/// The network always controls player 1; player 2 idles.
pub const NETWORK_PLAYER: PlayerId = PlayerId::One;

#[derive(Debug, Clone, Serialize)]
pub struct PlaySummary {
    pub seed: u64,
    pub turns: usize,
    pub decisions: u64,
    pub stats: MoveStats,
    pub final_position: (usize, usize),
    pub network: NetworkSnapshot,
}

/// Play one game. With `out` set, progress is rendered there.
pub fn run_game(cfg: &PlayConfig, seed: u64, mut out: Option<&mut dyn Write>) -> Result<PlaySummary> {
    let net_cfg = NetworkConfig::new(cfg.topology.clone()).with_seed(seed);
    let mut net = Network::new(net_cfg)?;
    let mut world = GridWorld::new();
    let mut stats = MoveStats::new();
    let mut decisions = 0u64;

    info!(
        seed,
        topology = %cfg.topology,
        turns = cfg.turns,
        "starting grid game"
    );

    if let Some(w) = out.as_deref_mut() {
        out_line(w, format_args!("{}", world.render()))?;
    }

    for turn in 1..=cfg.turns {
        let player = world.switch_player();
        if player != NETWORK_PLAYER {
            debug!(turn, player = player.number(), "idle turn");
            continue;
        }

        let dir = decide(&mut net, &world, player, cfg.layout)?;
        let outcome = world.try_move(dir);
        stats.record_move(outcome == MoveOutcome::Moved);
        let report = reinforce(&mut net, outcome, cfg.rewards)?;
        decisions += 1;

        debug!(
            turn,
            direction = %dir.key(),
            outcome = outcome.as_str(),
            cycle = report.cycle,
            "network move"
        );

        if let Some(w) = out.as_deref_mut() {
            // The output layer still holds the activations behind this move.
            out_line(w, format_args!("{}", describe(&net)))?;
            out_line(
                w,
                format_args!(
                    "turn {turn}: network chooses {} -> {}",
                    dir.key(),
                    outcome.as_str()
                ),
            )?;
            if outcome == MoveOutcome::Moved {
                out_line(w, format_args!("{}", world.render()))?;
            }
        }
    }

    let network = NetworkAdapter::new(&net).snapshot();
    info!(
        decisions,
        valid = stats.valid,
        invalid = stats.invalid,
        "game finished"
    );

    Ok(PlaySummary {
        seed,
        turns: cfg.turns,
        decisions,
        final_position: world.position(NETWORK_PLAYER),
        stats,
        network,
    })
}

pub fn run(cfg: &PlayConfig) -> Result<()> {
    let seed = cfg.resolve_seed();
    let stdout = io::stdout();
    let mut lock = stdout.lock();

    let summary = if cfg.render {
        run_game(cfg, seed, Some(&mut lock))?
    } else {
        run_game(cfg, seed, None)?
    };

    if cfg.json {
        out_line(&mut lock, format_args!("{}", serde_json::to_string_pretty(&summary)?))?;
    } else {
        out_line(
            &mut lock,
            format_args!(
                "seed={} decisions={} valid={} invalid={} valid_rate={:.3} last_100={:.3}",
                summary.seed,
                summary.decisions,
                summary.stats.valid,
                summary.stats.invalid,
                summary.stats.valid_rate(),
                summary.stats.last_100_rate(),
            ),
        )?;
        out_line(&mut lock, format_args!("{}", summary.network))?;
    }
    Ok(())
}

fn out_line(w: &mut dyn Write, args: fmt::Arguments<'_>) -> io::Result<()> {
    w.write_fmt(args)?;
    w.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytebrain::topology::Topology;
    use bytebrain_games::brain_io::InputLayout;

    fn small_cfg(turns: usize) -> PlayConfig {
        PlayConfig {
            topology: Topology::new(vec![16, 12, 5]).unwrap(),
            turns,
            seed: Some(3),
            layout: InputLayout {
                prefix: b's',
                env_offset: 4,
            },
            ..Default::default()
        }
    }

    #[test]
    fn network_decides_every_other_turn() {
        let summary = run_game(&small_cfg(41), 3, None).unwrap();
        assert_eq!(summary.decisions, 20);
        assert_eq!(summary.stats.moves, 20);
        assert_eq!(summary.network.cycle, 21);
    }

    #[test]
    fn same_seed_same_game() {
        let a = run_game(&small_cfg(60), 11, None).unwrap();
        let b = run_game(&small_cfg(60), 11, None).unwrap();
        assert_eq!(a.final_position, b.final_position);
        assert_eq!(a.stats.valid, b.stats.valid);
        assert_eq!(a.network.output, b.network.output);
    }

    #[test]
    fn rendering_writes_grid_and_dump() {
        let mut buf: Vec<u8> = Vec::new();
        run_game(&small_cfg(4), 3, Some(&mut buf)).unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with(". . . . . . . # "));
        assert!(text.contains("Output: "));
        assert!(text.contains("network chooses"));
    }

    #[test]
    fn layout_that_does_not_fit_is_an_error() {
        let mut cfg = small_cfg(4);
        cfg.layout.env_offset = 100;
        assert!(run_game(&cfg, 3, None).is_err());
    }
}
