use crate::error::TopologyError;
use crate::{CONTROL_COUNT, SENSOR_COUNT};

use super::genotype::Genotype;
use super::network::Network;

/// Pairs a genotype with the network derived from it for the length of an episode.
#[derive(Clone, Debug)]
pub struct Agent {
    genotype: Genotype,
    network: Network,
    is_alive: bool,
}

impl Agent {
    pub fn create(genotype: Genotype, topology: &[usize]) -> Result<Agent, TopologyError> {
        let network = Network::create_from_genotype(topology, &genotype)?;
        Ok(Agent {
            genotype,
            network,
            is_alive: false,
        })
    }

    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    pub fn into_genotype(self) -> Genotype {
        self.genotype
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn evaluation(&self) -> f64 {
        self.genotype.evaluation
    }

    /// Records the current score. Ignored once the agent has been killed, so
    /// the value standing at death is the one the optimizer reads.
    pub fn set_evaluation(&mut self, evaluation: f64) {
        if self.is_alive {
            self.genotype.evaluation = evaluation;
        }
    }

    pub fn process_inputs(&self, sensor_values: &[f64; SENSOR_COUNT]) -> [f64; CONTROL_COUNT] {
        self.network.process_inputs(sensor_values)
    }

    /// Starts a new episode: the score goes back to zero, the parameters stay.
    pub fn reset(&mut self) {
        self.genotype.evaluation = 0.;
        self.is_alive = true;
    }

    pub fn kill(&mut self) {
        self.is_alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn sample_agent() -> Agent {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let topology = [5, 4, 3, 2];
        Agent::create(Genotype::init(&mut rng, &topology), &topology).unwrap()
    }

    #[test]
    fn evaluation_freezes_on_kill() {
        let mut agent = sample_agent();
        agent.reset();
        agent.set_evaluation(0.4);
        agent.kill();
        agent.set_evaluation(0.9);
        assert_eq!(agent.evaluation(), 0.4);
        assert!(!agent.is_alive());
    }

    #[test]
    fn reset_keeps_parameters() {
        let mut agent = sample_agent();
        let parameters = agent.genotype().parameters().to_vec();
        agent.reset();
        agent.set_evaluation(0.7);
        agent.kill();
        agent.reset();

        assert!(agent.is_alive());
        assert_eq!(agent.evaluation(), 0.);
        assert_eq!(agent.genotype().parameters(), &parameters[..]);
    }

    #[test]
    fn extreme_sensor_vectors_are_deterministic() {
        let agent = sample_agent();
        let clear = agent.process_inputs(&[1., 1., 1., 1., 1.]);
        let blocked = agent.process_inputs(&[0., 0., 0., 0., 0.]);
        for _ in 0..10 {
            assert_eq!(agent.process_inputs(&[1., 1., 1., 1., 1.]), clear);
            assert_eq!(agent.process_inputs(&[0., 0., 0., 0., 0.]), blocked);
        }
    }
}
