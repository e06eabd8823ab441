use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Immutable ordered list of layer widths.
///
/// Layer 0 is the input layer, the last layer is the output layer. A topology
/// always has at least two layers and every width is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<usize>", into = "Vec<usize>"))]
pub struct Topology {
    widths: Vec<usize>,
}

impl Topology {
    pub fn new(widths: Vec<usize>) -> Result<Self> {
        if widths.len() < 2 {
            return Err(NetworkError::TooFewLayers {
                layers: widths.len(),
            });
        }
        if let Some(layer) = widths.iter().position(|w| *w == 0) {
            return Err(NetworkError::ZeroWidth { layer });
        }
        Ok(Self { widths })
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn layer_count(&self) -> usize {
        self.widths.len()
    }

    /// Number of weight matrices (`layer_count - 1`).
    pub fn connection_count(&self) -> usize {
        self.widths.len() - 1
    }

    pub fn input_width(&self) -> usize {
        self.widths[0]
    }

    pub fn output_width(&self) -> usize {
        self.widths[self.widths.len() - 1]
    }

    /// `(rows, cols)` of connection layer `l`: source width by target width.
    pub fn connection_shape(&self, l: usize) -> Option<(usize, usize)> {
        if l + 1 < self.widths.len() {
            Some((self.widths[l], self.widths[l + 1]))
        } else {
            None
        }
    }

    /// Total neurons, or `None` if the count does not fit in `usize`.
    pub fn neuron_count(&self) -> Option<usize> {
        self.widths
            .iter()
            .try_fold(0usize, |acc, w| acc.checked_add(*w))
    }

    /// Total synapses, or `None` if the count does not fit in `usize`.
    pub fn synapse_count(&self) -> Option<usize> {
        self.widths
            .windows(2)
            .try_fold(0usize, |acc, w| acc.checked_add(w[0].checked_mul(w[1])?))
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = NetworkError;

    fn try_from(widths: Vec<usize>) -> Result<Self> {
        Topology::new(widths)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(t: Topology) -> Self {
        t.widths
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.widths.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{w}")?;
        }
        Ok(())
    }
}

/// Error for topology strings like `1200-1000-1000-5`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTopologyError {
    #[error("invalid layer width {0:?}")]
    Width(String),
    #[error(transparent)]
    Shape(#[from] NetworkError),
}

impl FromStr for Topology {
    type Err = ParseTopologyError;

    /// Accepts widths separated by `-`, `,` or `x`.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let widths = s
            .split(|c| c == '-' || c == ',' || c == 'x')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<usize>()
                    .map_err(|_| ParseTopologyError::Width(p.to_string()))
            })
            .collect::<core::result::Result<Vec<_>, _>>()?;
        Ok(Topology::new(widths)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_layer() {
        assert_eq!(
            Topology::new(vec![4]),
            Err(NetworkError::TooFewLayers { layers: 1 })
        );
        assert_eq!(
            Topology::new(vec![]),
            Err(NetworkError::TooFewLayers { layers: 0 })
        );
    }

    #[test]
    fn rejects_zero_width() {
        assert_eq!(
            Topology::new(vec![3, 0, 2]),
            Err(NetworkError::ZeroWidth { layer: 1 })
        );
    }

    #[test]
    fn shapes_chain() {
        let t = Topology::new(vec![3, 4, 2]).unwrap();
        assert_eq!(t.connection_count(), 2);
        assert_eq!(t.connection_shape(0), Some((3, 4)));
        assert_eq!(t.connection_shape(1), Some((4, 2)));
        assert_eq!(t.connection_shape(2), None);
        assert_eq!(t.synapse_count(), Some(12 + 8));
        assert_eq!(t.neuron_count(), Some(9));
        assert_eq!(t.input_width(), 3);
        assert_eq!(t.output_width(), 2);
    }

    #[test]
    fn huge_widths_report_no_count() {
        let t = Topology::new(vec![usize::MAX / 2, 4]).unwrap();
        assert_eq!(t.synapse_count(), None);
        assert_eq!(t.neuron_count(), Some(usize::MAX / 2 + 4));

        let t = Topology::new(vec![usize::MAX, 1]).unwrap();
        assert_eq!(t.synapse_count(), Some(usize::MAX));
        assert_eq!(t.neuron_count(), None);
    }

    #[test]
    fn parses_and_displays() {
        let t: Topology = "1200-1000-1000-5".parse().unwrap();
        assert_eq!(t.widths(), &[1200, 1000, 1000, 5]);
        assert_eq!(t.to_string(), "1200-1000-1000-5");

        let t: Topology = "9, 16, 5".parse().unwrap();
        assert_eq!(t.widths(), &[9, 16, 5]);

        assert!(matches!(
            "9-abc".parse::<Topology>(),
            Err(ParseTopologyError::Width(_))
        ));
        assert!(matches!(
            "9".parse::<Topology>(),
            Err(ParseTopologyError::Shape(NetworkError::TooFewLayers { layers: 1 }))
        ));
    }
}
