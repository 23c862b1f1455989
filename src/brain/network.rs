use itertools::Itertools;

use crate::error::TopologyError;
use crate::{CONTROL_COUNT, SENSOR_COUNT};

use super::genotype::Genotype;

fn soft_sign(x: f64) -> f64 {
    x / (1. + x.abs())
}

/// One fully connected layer. Weights are stored input-major, with the bias
/// weights in the final row.
#[derive(Clone, Debug)]
struct Layer {
    n_inputs: usize,
    n_outputs: usize,
    weights: Vec<f64>,
}

impl Layer {
    fn activate(&self, inputs: &[f64]) -> Vec<f64> {
        debug_assert!(inputs.len() == self.n_inputs);
        let bias = &self.weights[self.n_inputs * self.n_outputs..];
        (0..self.n_outputs)
            .map(|j| {
                let active_sum = inputs.iter().enumerate().fold(bias[j], |acc, (i, &input)| {
                    acc + input * self.weights[i * self.n_outputs + j]
                });
                soft_sign(active_sum)
            })
            .collect()
    }
}

/// Fixed-topology feed-forward network. Its output depends only on the
/// parameters it was built from and the inputs of the current call.
#[derive(Clone, Debug)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    pub fn validate_topology(topology: &[usize]) -> Result<(), TopologyError> {
        if topology.len() < 2 {
            return Err(TopologyError::TooFewLayers(topology.len()));
        }
        if let Some(index) = topology.iter().position(|&n| n == 0) {
            return Err(TopologyError::EmptyLayer { index });
        }
        if topology[0] != SENSOR_COUNT {
            return Err(TopologyError::InputMismatch { expected: SENSOR_COUNT, actual: topology[0] });
        }
        let n_outputs = topology[topology.len() - 1];
        if n_outputs != CONTROL_COUNT {
            return Err(TopologyError::OutputMismatch { expected: CONTROL_COUNT, actual: n_outputs });
        }
        Ok(())
    }

    pub fn create_from_genotype(topology: &[usize], genotype: &Genotype) -> Result<Network, TopologyError> {
        Network::validate_topology(topology)?;
        let expected = Genotype::parameter_count(topology);
        if genotype.len() != expected {
            return Err(TopologyError::ParameterMismatch { expected, actual: genotype.len() });
        }

        let mut remaining = genotype.parameters();
        let layers = topology
            .iter()
            .tuple_windows()
            .map(|(&n_inputs, &n_outputs)| {
                let (weights, rest) = remaining.split_at((n_inputs + 1) * n_outputs);
                remaining = rest;
                Layer { n_inputs, n_outputs, weights: weights.to_vec() }
            })
            .collect_vec();

        Ok(Network { layers })
    }

    pub fn topology(&self) -> Vec<usize> {
        let mut topology = Vec::with_capacity(self.layers.len() + 1);
        topology.push(SENSOR_COUNT);
        topology.extend(self.layers.iter().map(|layer| layer.n_outputs));
        topology
    }

    pub fn process_inputs(&self, sensor_values: &[f64; SENSOR_COUNT]) -> [f64; CONTROL_COUNT] {
        let outputs = self
            .layers
            .iter()
            .fold(sensor_values.to_vec(), |values, layer| layer.activate(&values));

        let mut controls = [0.; CONTROL_COUNT];
        controls.copy_from_slice(&outputs);
        controls
    }
}
