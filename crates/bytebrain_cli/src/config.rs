use std::time::{SystemTime, UNIX_EPOCH};

use bytebrain::topology::Topology;
use bytebrain_games::brain_io::{InputLayout, RewardScheme};

use crate::error::{CliError, Result};

/// Environment variable consulted when `--seed` is not given.
pub const SEED_ENV: &str = "BYTEBRAIN_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    pub topology: Topology,
    /// Game turns; the network decides on every other turn.
    pub turns: usize,
    pub seed: Option<u64>,
    pub layout: InputLayout,
    pub rewards: RewardScheme,
    pub render: bool,
    pub json: bool,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            topology: default_topology(&[1200, 1000, 1000, 5]),
            turns: 1000,
            seed: None,
            layout: InputLayout::default(),
            rewards: RewardScheme::default(),
            render: false,
            json: false,
        }
    }
}

impl PlayConfig {
    /// Configured seed, or one derived from the wall clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssayConfig {
    pub play: PlayConfig,
    pub seeds: u64,
}

impl Default for AssayConfig {
    fn default() -> Self {
        Self {
            play: PlayConfig {
                topology: default_topology(&[1200, 64, 64, 5]),
                turns: 400,
                seed: Some(1),
                ..Default::default()
            },
            seeds: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayConfig),
    Assays(AssayConfig),
    Help,
}

fn default_topology(widths: &[usize]) -> Topology {
    match Topology::new(widths.to_vec()) {
        Ok(t) => t,
        Err(e) => unreachable!("built-in topology is valid: {e}"),
    }
}

/// Parse command-line arguments (without the program name).
///
/// `env_seed` is the value of [`SEED_ENV`], if set; `--seed` wins over it.
pub fn parse_args<I>(args: I, env_seed: Option<String>) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();

    let assays = match args.peek().map(String::as_str) {
        Some("--help" | "-h" | "help") => return Ok(Command::Help),
        Some("assays") => {
            args.next();
            true
        }
        Some("play") => {
            args.next();
            false
        }
        _ => false,
    };

    let mut assay = AssayConfig::default();
    let mut play = if assays {
        assay.play.clone()
    } else {
        PlayConfig::default()
    };

    if let Some(s) = env_seed {
        play.seed = Some(parse_num(SEED_ENV, &s)?);
    }

    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| CliError::Usage(format!("{name} needs a value")))
        };
        match flag.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--turns" => play.turns = parse_num("--turns", &value("--turns")?)?,
            "--seed" => play.seed = Some(parse_num("--seed", &value("--seed")?)?),
            "--topology" => play.topology = value("--topology")?.parse()?,
            "--offset" => play.layout.env_offset = parse_num("--offset", &value("--offset")?)?,
            "--prefix" => {
                let v = value("--prefix")?;
                play.layout.prefix = match v.as_bytes() {
                    [b] => *b,
                    _ => {
                        return Err(CliError::Usage(format!(
                            "--prefix takes a single byte, got {v:?}"
                        )))
                    }
                };
            }
            "--reward-valid" => {
                play.rewards.valid = parse_num("--reward-valid", &value("--reward-valid")?)?
            }
            "--reward-invalid" => {
                play.rewards.invalid = parse_num("--reward-invalid", &value("--reward-invalid")?)?
            }
            "--render" => play.render = true,
            "--json" => play.json = true,
            "--seeds" if assays => assay.seeds = parse_num("--seeds", &value("--seeds")?)?,
            other => return Err(CliError::Usage(format!("unknown argument: {other}"))),
        }
    }

    if assays {
        assay.play = play;
        Ok(Command::Assays(assay))
    } else {
        Ok(Command::Play(play))
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, v: &str) -> Result<T> {
    v.trim()
        .parse()
        .map_err(|_| CliError::Usage(format!("{name}: invalid number {v:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_plays_with_defaults() {
        let cmd = parse_args(args(&[]), None).unwrap();
        assert_eq!(cmd, Command::Play(PlayConfig::default()));
        let Command::Play(cfg) = cmd else { unreachable!() };
        assert_eq!(cfg.topology.widths(), &[1200, 1000, 1000, 5]);
        assert_eq!(cfg.layout.env_offset, 500);
        assert_eq!(cfg.layout.prefix, b's');
        assert_eq!(cfg.rewards.valid, 100);
        assert_eq!(cfg.rewards.invalid, -500);
    }

    #[test]
    fn flags_override_defaults() {
        let cmd = parse_args(
            args(&[
                "play",
                "--turns",
                "40",
                "--seed",
                "9",
                "--topology",
                "32-16-5",
                "--offset",
                "10",
                "--prefix",
                "x",
                "--render",
                "--json",
            ]),
            None,
        )
        .unwrap();
        let Command::Play(cfg) = cmd else {
            panic!("expected play")
        };
        assert_eq!(cfg.turns, 40);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.topology.widths(), &[32, 16, 5]);
        assert_eq!(cfg.layout.env_offset, 10);
        assert_eq!(cfg.layout.prefix, b'x');
        assert!(cfg.render && cfg.json);
        assert_eq!(cfg.resolve_seed(), 9);
    }

    #[test]
    fn seed_flag_beats_environment() {
        let Command::Play(cfg) = parse_args(args(&[]), Some("77".into())).unwrap() else {
            panic!("expected play")
        };
        assert_eq!(cfg.seed, Some(77));

        let Command::Play(cfg) =
            parse_args(args(&["--seed", "5"]), Some("77".into())).unwrap()
        else {
            panic!("expected play")
        };
        assert_eq!(cfg.seed, Some(5));
    }

    #[test]
    fn assays_take_seed_count() {
        let cmd = parse_args(args(&["assays", "--seeds", "3", "--turns", "20"]), None).unwrap();
        let Command::Assays(cfg) = cmd else {
            panic!("expected assays")
        };
        assert_eq!(cfg.seeds, 3);
        assert_eq!(cfg.play.turns, 20);
        assert_eq!(cfg.play.topology.widths(), &[1200, 64, 64, 5]);
    }

    #[test]
    fn bad_input_is_a_usage_error() {
        assert!(matches!(
            parse_args(args(&["--turns"]), None),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(args(&["--turns", "many"]), None),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(args(&["--seeds", "3"]), None),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(args(&["--topology", "5"]), None),
            Err(CliError::Topology(_))
        ));
        assert_eq!(parse_args(args(&["-h"]), None).unwrap(), Command::Help);
    }
}
