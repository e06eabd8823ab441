//! Games that drive a `bytebrain::network::Network`.
//!
//! The game rules here know nothing about the network; they only produce an
//! environment encoding and consume a [`grid::Direction`]. The glue that turns
//! those into network input/output lives in [`brain_io`] behind the optional
//! `bytebrain` feature.

pub mod grid;
pub mod stats;

// Explicit helper API for feeding a `bytebrain::network::Network`.
// Kept behind the optional `bytebrain` feature.
#[cfg(feature = "bytebrain")]
pub mod brain_io;
