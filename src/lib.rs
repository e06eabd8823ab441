//! # bytebrain
//!
//! A byte-valued layered network trained by reward and punishment alone.
//!
//! Activations and synapse weights are single bytes. A synapse conducts when
//! its weight is above 128; conducting synapses add their source activation
//! into the target with 8-bit wrapping arithmetic. Learning has no gradients:
//! a reward nudges randomly chosen synapses that fired, a punishment weakens
//! them and re-arms randomly chosen silent ones. Every third and sixth cycle
//! the accumulated evidence of the window replaces the single-cycle evidence
//! (long and super-long consolidation).
//!
//! ## Quick Start
//!
//! ```
//! use bytebrain::prelude::*;
//!
//! let topology = Topology::new(vec![9, 16, 5]).unwrap();
//! let mut net = Network::new(NetworkConfig::new(topology).with_seed(42)).unwrap();
//!
//! let output = net.forward(&[64, 64, 0, 128, 192, 64, 64, 64, 0]).unwrap();
//! assert_eq!(output.len(), 5);
//!
//! // Reward the decision that was just taken.
//! let report = net.learn(true, 100).unwrap();
//! assert_eq!(report.cycle, 1);
//! assert_eq!(net.cycle(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization for [`Topology`](topology::Topology),
//!   [`LearnReport`](plasticity::LearnReport) and observer snapshots
//!
//! ## Modules
//!
//! - [`topology`]: layer widths
//! - [`network`]: buffers, weights and activity traces
//! - [`forward`]: forward propagation
//! - [`plasticity`]: reward-driven learning and consolidation
//! - [`observer`]: read-only inspection

#[path = "core/error.rs"]
pub mod error;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/topology.rs"]
pub mod topology;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/forward.rs"]
pub mod forward;

#[path = "core/plasticity.rs"]
pub mod plasticity;

pub mod observer;

/// Prelude module for convenient imports.
///
/// ```
/// use bytebrain::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::NetworkError;
    pub use crate::network::{Network, NetworkConfig};
    pub use crate::observer::{describe, NetworkAdapter, NetworkSnapshot};
    pub use crate::plasticity::{Consolidation, LearnReport};
    pub use crate::prng::{IndexSampler, Prng};
    pub use crate::topology::Topology;
}
