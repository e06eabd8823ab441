use crate::error::{NetworkError, Result};
use crate::plasticity::LearnReport;
use crate::prng::Prng;
use crate::topology::Topology;

/// Weights strictly above this value conduct ("active/excitatory").
pub const ACTIVATION_THRESHOLD: u8 = 128;
/// Lower clamp applied by punishment.
pub const WEIGHT_MIN: u8 = 2;
/// Upper clamp applied by reward.
pub const WEIGHT_MAX: u8 = 254;
/// Value a silent synapse is reset to when punishment re-arms it.
pub const REACTIVATION_WEIGHT: u8 = 129;
/// Initial weights are uniform in `INIT_WEIGHT_MIN..=INIT_WEIGHT_MAX`,
/// straddling the activation threshold.
pub const INIT_WEIGHT_MIN: u8 = 120;
pub const INIT_WEIGHT_MAX: u8 = 129;
/// Cycle period of long consolidation.
pub const LONG_WINDOW: u64 = 3;
/// Cycle period of super-long consolidation.
pub const SUPER_WINDOW: u64 = 6;

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub topology: Topology,

    // If set, makes weight initialization and learning reproducible.
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            seed: None,
        }
    }

    /// Set the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration.
    ///
    /// A `Topology` is validated on construction; this re-checks the widths so a
    /// config assembled by hand (or deserialized) cannot slip past.
    pub fn validate(&self) -> Result<()> {
        Topology::new(self.topology.widths().to_vec()).map(|_| ())
    }

    /// Estimated heap usage in bytes for a network with this config.
    ///
    /// `None` when the total does not fit in `usize`; such a network can never
    /// be allocated.
    #[must_use]
    pub fn estimated_memory_bytes(&self) -> Option<usize> {
        // One activation byte per neuron, four bytes (weight + three traces) per synapse.
        let synapse_bytes = self.topology.synapse_count()?.checked_mul(4)?;
        self.topology.neuron_count()?.checked_add(synapse_bytes)
    }
}

/// The mutable aggregate: activations, weights, activity traces and counters.
///
/// Buffers are owned per layer (`layers`) or per connection layer (`weights` and
/// the three traces). Connection layer `l` is stored row-major with
/// `widths[l]` rows and `widths[l + 1]` columns, so synapse `(i, j)` lives at
/// `i * cols + j`.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) topology: Topology,

    pub(crate) layers: Vec<Vec<u8>>,
    pub(crate) weights: Vec<Vec<u8>>,

    // Firing counts since the last learn call.
    pub(crate) short_activity: Vec<Vec<u8>>,
    // Accumulated over the LONG_WINDOW / SUPER_WINDOW cycles.
    pub(crate) long_activity: Vec<Vec<u8>>,
    pub(crate) super_activity: Vec<Vec<u8>>,

    pub(crate) cycle: u64,
    pub(crate) long_magnitude: i64,
    pub(crate) super_magnitude: i64,

    pub(crate) rng: Prng,

    // Scratch partitions reused by every learn call.
    pub(crate) active: Vec<usize>,
    pub(crate) inactive: Vec<usize>,

    pub(crate) last_learn: Option<LearnReport>,
}

impl Network {
    /// Build a network with weights drawn uniformly from `[120, 129]`.
    ///
    /// Fails if the topology is malformed or a buffer cannot be reserved; no
    /// partially built network is ever returned.
    pub fn new(cfg: NetworkConfig) -> Result<Self> {
        let rng = Prng::new(cfg.seed.unwrap_or(1));
        Self::with_rng(cfg, rng)
    }

    /// Build a network drawing initial weights (and later samples) from `rng`.
    pub fn with_rng(cfg: NetworkConfig, mut rng: Prng) -> Result<Self> {
        cfg.validate()?;
        let topology = cfg.topology;

        // Matrix sizes are checked up front so an overflowing shape fails
        // before any buffer is reserved.
        let n = topology.connection_count();
        let mut sizes = Vec::with_capacity(n);
        for l in 0..n {
            let (rows, cols) = shape(&topology, l);
            sizes.push(rows.checked_mul(cols).ok_or(NetworkError::Allocation {
                bytes: usize::MAX,
            })?);
        }

        let mut layers = Vec::with_capacity(topology.layer_count());
        for &w in topology.widths() {
            layers.push(zeroed(w)?);
        }

        let mut weights = Vec::with_capacity(n);
        let mut short_activity = Vec::with_capacity(n);
        let mut long_activity = Vec::with_capacity(n);
        let mut super_activity = Vec::with_capacity(n);
        let mut largest = 0;
        let mut synapses = 0usize;
        for &size in &sizes {
            largest = largest.max(size);
            synapses = synapses.saturating_add(size);

            let mut w = zeroed(size)?;
            for v in w.iter_mut() {
                *v = rng.gen_range_u8(INIT_WEIGHT_MIN, INIT_WEIGHT_MAX);
            }
            weights.push(w);
            short_activity.push(zeroed(size)?);
            long_activity.push(zeroed(size)?);
            super_activity.push(zeroed(size)?);
        }

        let active = scratch(largest)?;
        let inactive = scratch(largest)?;

        tracing::debug!(
            topology = %topology,
            synapses,
            "network created"
        );

        Ok(Self {
            topology,
            layers,
            weights,
            short_activity,
            long_activity,
            super_activity,
            cycle: 1,
            long_magnitude: 0,
            super_magnitude: 0,
            rng,
            active,
            inactive,
            last_learn: None,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Decision-cycle counter; starts at 1 and advances once per learn call.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Signed reward sum of the current long window.
    pub fn long_magnitude(&self) -> i64 {
        self.long_magnitude
    }

    /// Signed reward sum of the current super-long window.
    pub fn super_magnitude(&self) -> i64 {
        self.super_magnitude
    }

    /// Report of the most recent learn call, if any.
    pub fn last_learn(&self) -> Option<&LearnReport> {
        self.last_learn.as_ref()
    }

    pub fn rng(&self) -> &Prng {
        &self.rng
    }

    /// Activation buffer of layer `l`.
    pub fn layer(&self, l: usize) -> Result<&[u8]> {
        self.layers
            .get(l)
            .map(Vec::as_slice)
            .ok_or(NetworkError::LayerOutOfRange {
                layer: l,
                layers: self.layers.len(),
            })
    }

    /// Activations of the output layer as left by the last forward call.
    pub fn output(&self) -> &[u8] {
        &self.layers[self.layers.len() - 1]
    }

    pub fn weights(&self, l: usize) -> Result<&[u8]> {
        self.check_connection(l)?;
        Ok(&self.weights[l])
    }

    pub fn short_activity(&self, l: usize) -> Result<&[u8]> {
        self.check_connection(l)?;
        Ok(&self.short_activity[l])
    }

    pub fn long_activity(&self, l: usize) -> Result<&[u8]> {
        self.check_connection(l)?;
        Ok(&self.long_activity[l])
    }

    pub fn super_activity(&self, l: usize) -> Result<&[u8]> {
        self.check_connection(l)?;
        Ok(&self.super_activity[l])
    }

    pub fn weight(&self, l: usize, row: usize, col: usize) -> Result<u8> {
        let idx = self.index(l, row, col)?;
        Ok(self.weights[l][idx])
    }

    pub fn set_weight(&mut self, l: usize, row: usize, col: usize, value: u8) -> Result<()> {
        let idx = self.index(l, row, col)?;
        self.weights[l][idx] = value;
        Ok(())
    }

    /// Replace a whole weight matrix (row-major, `rows * cols` bytes).
    pub fn set_weights(&mut self, l: usize, values: &[u8]) -> Result<()> {
        self.check_connection(l)?;
        let expected = self.weights[l].len();
        if values.len() != expected {
            return Err(NetworkError::InvalidWeights {
                layer: l,
                expected,
                actual: values.len(),
            });
        }
        self.weights[l].copy_from_slice(values);
        Ok(())
    }

    /// Number of synapses currently above the activation threshold.
    pub fn conducting_synapses(&self) -> usize {
        self.weights
            .iter()
            .flat_map(|w| w.iter())
            .filter(|w| **w > ACTIVATION_THRESHOLD)
            .count()
    }

    #[must_use]
    pub fn estimate_memory_bytes(&self) -> usize {
        let layers: usize = self.layers.iter().map(Vec::len).sum();
        let matrices: usize = self.weights.iter().map(Vec::len).sum();
        let scratch = (self.active.capacity() + self.inactive.capacity())
            * core::mem::size_of::<usize>();
        layers + 4 * matrices + scratch
    }

    fn check_connection(&self, l: usize) -> Result<()> {
        if l < self.weights.len() {
            Ok(())
        } else {
            Err(NetworkError::LayerOutOfRange {
                layer: l,
                layers: self.weights.len(),
            })
        }
    }

    fn index(&self, l: usize, row: usize, col: usize) -> Result<usize> {
        self.check_connection(l)?;
        let (rows, cols) = shape(&self.topology, l);
        if row >= rows || col >= cols {
            return Err(NetworkError::PositionOutOfRange { layer: l, row, col });
        }
        Ok(row * cols + col)
    }
}

pub(crate) fn shape(topology: &Topology, l: usize) -> (usize, usize) {
    let w = topology.widths();
    (w[l], w[l + 1])
}

fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| NetworkError::Allocation { bytes: len })?;
    v.resize(len, 0);
    Ok(v)
}

fn scratch(len: usize) -> Result<Vec<usize>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| NetworkError::Allocation {
        bytes: len.saturating_mul(core::mem::size_of::<usize>()),
    })?;
    Ok(v)
}
