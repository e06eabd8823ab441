use std::io::{self, Write};

use serde::Serialize;
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::AssayConfig;
use crate::error::Result;
use crate::play::run_game;

#[derive(Debug, Clone, Serialize)]
pub struct AssayReport {
    pub seed: u64,
    pub decisions: u64,
    pub valid_rate: f32,
    pub last_100_rate: f32,
    pub steady_at_move: Option<u32>,
    pub conducting_fraction: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssaySummary {
    pub topology: String,
    pub turns: usize,
    pub reports: Vec<AssayReport>,
    pub mean_valid_rate: f32,
    pub mean_last_100_rate: f32,
}

fn run_seed(cfg: &AssayConfig, seed: u64) -> Result<AssayReport> {
    let summary = run_game(&cfg.play, seed, None)?;
    Ok(AssayReport {
        seed,
        decisions: summary.decisions,
        valid_rate: summary.stats.valid_rate(),
        last_100_rate: summary.stats.last_100_rate(),
        steady_at_move: summary.stats.steady_at_move,
        conducting_fraction: summary.network.conducting_fraction,
    })
}

/// Play one game per seed. Every game builds its own network, so seeds can run
/// on separate threads without sharing any learning state.
pub fn collect(cfg: &AssayConfig) -> Result<AssaySummary> {
    let base = cfg.play.resolve_seed();
    let seeds: Vec<u64> = (0..cfg.seeds).map(|i| base.wrapping_add(i)).collect();

    #[cfg(feature = "parallel")]
    let reports = seeds
        .par_iter()
        .map(|s| run_seed(cfg, *s))
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let reports = seeds
        .iter()
        .map(|s| run_seed(cfg, *s))
        .collect::<Result<Vec<_>>>()?;

    let n = reports.len().max(1) as f32;
    let mean_valid_rate = reports.iter().map(|r| r.valid_rate).sum::<f32>() / n;
    let mean_last_100_rate = reports.iter().map(|r| r.last_100_rate).sum::<f32>() / n;

    info!(seeds = reports.len(), mean_valid_rate, "assays finished");

    Ok(AssaySummary {
        topology: cfg.play.topology.to_string(),
        turns: cfg.play.turns,
        reports,
        mean_valid_rate,
        mean_last_100_rate,
    })
}

pub fn run(cfg: &AssayConfig) -> Result<()> {
    let summary = collect(cfg)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cfg.play.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "assays: topology={} turns={} seeds={}",
        summary.topology,
        summary.turns,
        summary.reports.len()
    )?;
    for r in &summary.reports {
        writeln!(
            out,
            "  seed={:<20} decisions={:<5} valid={:.3} last_100={:.3} steady_at={:?} conducting={:.3}",
            r.seed, r.decisions, r.valid_rate, r.last_100_rate, r.steady_at_move, r.conducting_fraction
        )?;
    }
    writeln!(
        out,
        "mean valid={:.3} mean last_100={:.3}",
        summary.mean_valid_rate, summary.mean_last_100_rate
    )?;
    Ok(())
}
