use crate::error::{NetworkError, Result};
use crate::network::{shape, Network, ACTIVATION_THRESHOLD};

/// Propagate `input` through `net` and return the output layer.
///
/// Clears every non-input layer, copies `input` into layer 0, then for each
/// connection layer adds source activations into targets through conducting
/// synapses (weight > 128) with 8-bit wrapping addition. Each conducting
/// synapse bumps its short-term activity counter once. Weights are untouched.
///
/// The returned slice is only valid until the next call.
pub fn forward<'a>(net: &'a mut Network, input: &[u8]) -> Result<&'a [u8]> {
    let expected = net.topology.input_width();
    if input.len() != expected {
        return Err(NetworkError::InputLength {
            expected,
            actual: input.len(),
        });
    }

    for layer in net.layers.iter_mut().skip(1) {
        layer.fill(0);
    }
    net.layers[0].copy_from_slice(input);

    for l in 0..net.topology.connection_count() {
        let (rows, cols) = shape(&net.topology, l);
        let (lower, upper) = net.layers.split_at_mut(l + 1);
        let src = &lower[l];
        let dst = &mut upper[0];
        let weights = &net.weights[l];
        let activity = &mut net.short_activity[l];

        for i in 0..rows {
            let a = src[i];
            let row = i * cols;
            for j in 0..cols {
                if weights[row + j] > ACTIVATION_THRESHOLD {
                    dst[j] = dst[j].wrapping_add(a);
                    activity[row + j] = activity[row + j].wrapping_add(1);
                }
            }
        }
    }

    tracing::trace!(cycle = net.cycle, "forward pass");
    Ok(net.output())
}

impl Network {
    /// See [`forward`].
    pub fn forward(&mut self, input: &[u8]) -> Result<&[u8]> {
        forward(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkConfig;
    use crate::topology::Topology;

    fn fixed_3x2() -> Network {
        let topology = Topology::new(vec![3, 2]).unwrap();
        let mut net = Network::new(NetworkConfig::new(topology).with_seed(1)).unwrap();
        net.set_weights(0, &[130, 100, 90, 140, 200, 50]).unwrap();
        net
    }

    #[test]
    fn conducting_synapses_sum_into_targets() {
        let mut net = fixed_3x2();
        let out = net.forward(&[5, 7, 9]).unwrap().to_vec();
        assert_eq!(out, vec![14, 7]);
        // Fired: (0,0), (1,1), (2,0).
        assert_eq!(net.short_activity[0], vec![1, 0, 0, 1, 1, 0]);
        assert!(net.long_activity[0].iter().all(|v| *v == 0));
        assert!(net.super_activity[0].iter().all(|v| *v == 0));
    }

    #[test]
    fn threshold_is_strict() {
        let mut net = fixed_3x2();
        net.set_weights(0, &[128, 129, 128, 129, 128, 129]).unwrap();
        let out = net.forward(&[1, 2, 4]).unwrap().to_vec();
        assert_eq!(out, vec![0, 7]);
    }

    #[test]
    fn addition_wraps_at_eight_bits() {
        let mut net = fixed_3x2();
        let out = net.forward(&[200, 0, 100]).unwrap().to_vec();
        assert_eq!(out[0], 200u8.wrapping_add(100));
        assert_eq!(out[0], 44);
    }

    #[test]
    fn repeated_forward_is_identical_and_leaves_weights() {
        let mut net = fixed_3x2();
        let before = net.weights[0].clone();
        let a = net.forward(&[5, 7, 9]).unwrap().to_vec();
        let b = net.forward(&[5, 7, 9]).unwrap().to_vec();
        assert_eq!(a, b);
        assert_eq!(net.weights[0], before);
        // Activity keeps counting until learn clears it.
        assert_eq!(net.short_activity[0], vec![2, 0, 0, 2, 2, 0]);
    }

    #[test]
    fn hidden_layers_are_cleared_between_calls() {
        let topology = Topology::new(vec![2, 2, 1]).unwrap();
        let mut net = Network::new(NetworkConfig::new(topology).with_seed(3)).unwrap();
        net.set_weights(0, &[200, 200, 200, 200]).unwrap();
        net.set_weights(1, &[200, 0]).unwrap();

        let a = net.forward(&[3, 4]).unwrap().to_vec();
        assert_eq!(net.layers[1], vec![7, 7]);
        assert_eq!(a, vec![7]);

        let b = net.forward(&[1, 1]).unwrap().to_vec();
        assert_eq!(net.layers[1], vec![2, 2]);
        assert_eq!(b, vec![2]);
        assert_eq!(net.short_activity[1], vec![2, 0]);
    }

    #[test]
    fn wrong_input_length_is_rejected() {
        let mut net = fixed_3x2();
        assert_eq!(
            net.forward(&[1, 2]),
            Err(NetworkError::InputLength {
                expected: 3,
                actual: 2
            })
        );
        assert!(net.short_activity[0].iter().all(|v| *v == 0));
    }

    #[test]
    fn deterministic_for_fixed_weights() {
        let topology = Topology::new(vec![16, 12, 4]).unwrap();
        let mut a = Network::new(NetworkConfig::new(topology.clone()).with_seed(77)).unwrap();
        let mut b = Network::new(NetworkConfig::new(topology).with_seed(77)).unwrap();
        let input: Vec<u8> = (0..16u8).map(|v| v.wrapping_mul(37)).collect();
        assert_eq!(
            a.forward(&input).unwrap().to_vec(),
            b.forward(&input).unwrap().to_vec()
        );
        assert_eq!(a.short_activity, b.short_activity);
    }
}
