use rand::RngCore;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Evolvable parameter vector of one agent together with the score it earned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    parameters: Vec<f64>,
    /// Raw score written by the simulation during an episode.
    pub evaluation: f64,
    /// Score assigned by the optimizer, typically derived from `evaluation`. Never written by the simulation.
    pub fitness: f64,
}

impl Genotype {
    pub fn create(parameters: Vec<f64>) -> Genotype {
        Genotype {
            parameters,
            evaluation: 0.,
            fitness: 0.,
        }
    }

    pub fn init<R: RngCore>(rng: &mut R, topology: &[usize]) -> Genotype {
        let between = Uniform::from(-1.0..1.0);
        let parameters = (0..Genotype::parameter_count(topology))
            .map(|_| between.sample(rng))
            .collect();
        Genotype::create(parameters)
    }

    /// Weights plus one bias per neuron for every layer transition.
    pub fn parameter_count(topology: &[usize]) -> usize {
        topology.windows(2).map(|pair| (pair[0] + 1) * pair[1]).sum()
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
