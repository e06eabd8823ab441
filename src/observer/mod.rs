use core::fmt::{self, Write as _};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::network::{Network, ACTIVATION_THRESHOLD};
use crate::plasticity::LearnReport;
use crate::topology::Topology;

/// A read-only snapshot of what the network is doing.
///
/// Design intent:
/// - Observers cannot mutate or steer the network.
/// - Snapshotting is *on-demand* and can allocate; the decision loop stays unchanged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NetworkSnapshot {
    pub topology: Topology,
    pub cycle: u64,
    pub output: Vec<u8>,
    /// Weight `(1, 1)` of the last connection layer, when that layer is at least 2x2.
    pub sample_weight: Option<u8>,
    /// Share of synapses above the activation threshold.
    pub conducting_fraction: f32,
    pub mean_weight: f32,
    pub long_magnitude: i64,
    pub super_magnitude: i64,
    pub last_learn: Option<LearnReport>,
}

impl NetworkSnapshot {
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct NetworkAdapter<'a> {
    net: &'a Network,
}

impl<'a> NetworkAdapter<'a> {
    pub fn new(net: &'a Network) -> Self {
        Self { net }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        let net = self.net;
        let (count, sum) = net
            .weights
            .iter()
            .flat_map(|w| w.iter())
            .fold((0usize, 0u64), |(c, s), w| (c + 1, s + u64::from(*w)));
        let (conducting_fraction, mean_weight) = if count > 0 {
            (
                net.conducting_synapses() as f32 / count as f32,
                sum as f32 / count as f32,
            )
        } else {
            (0.0, 0.0)
        };

        NetworkSnapshot {
            topology: net.topology().clone(),
            cycle: net.cycle(),
            output: net.output().to_vec(),
            sample_weight: sample_weight(net),
            conducting_fraction,
            mean_weight,
            long_magnitude: net.long_magnitude(),
            super_magnitude: net.super_magnitude(),
            last_learn: net.last_learn().cloned(),
        }
    }

    /// Text dump of the output layer (see [`describe`]).
    pub fn describe(&self) -> String {
        describe(self.net)
    }
}

/// Human-readable dump of the network's current output.
///
/// Three parts: the raw output bytes, the sample weight (only when the last
/// connection layer has at least 2 rows and 2 columns), and one character per
/// output neuron computed as `value / 3`.
pub fn describe(net: &Network) -> String {
    let output = net.output();
    let mut s = String::with_capacity(32 + output.len() * 5);

    s.push_str("Output: ");
    for v in output {
        let _ = write!(s, "{v}, ");
    }
    s.push('\n');

    if let Some(w) = sample_weight(net) {
        let _ = writeln!(s, "Sample synapse value: {w}");
    }

    s.extend(output.iter().map(|v| char::from(v / 3)));
    s.push('\n');
    s
}

fn sample_weight(net: &Network) -> Option<u8> {
    let l = net.topology().connection_count() - 1;
    let (rows, cols) = net.topology().connection_shape(l)?;
    if rows > 1 && cols > 1 {
        net.weight(l, 1, 1).ok()
    } else {
        None
    }
}

impl fmt::Display for NetworkSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycle={} topology={} conducting={:.1}% (>{}) mean_w={:.1} long={:+} super={:+}",
            self.cycle,
            self.topology,
            self.conducting_fraction * 100.0,
            ACTIVATION_THRESHOLD,
            self.mean_weight,
            self.long_magnitude,
            self.super_magnitude,
        )?;
        if let Some(r) = &self.last_learn {
            write!(
                f,
                " last=[{:?} {} x{} +{} -{} ~{}]",
                r.consolidation,
                if r.rewarded { "reward" } else { "punish" },
                r.magnitude,
                r.strengthened,
                r.weakened,
                r.reactivated,
            )?;
        }
        Ok(())
    }
}
