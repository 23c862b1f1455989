#![allow(dead_code)]

use racing_agents::brain::agent::Agent;
use racing_agents::brain::genotype::Genotype;
use racing_agents::racing::geometry::{DrivableArea, Pose, RayCaster, Vec2};
use racing_agents::racing::movement::{Movement, MovementStatus};
use racing_agents::settings::Settings;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// No walls anywhere.
pub struct EmptyWorld;

impl RayCaster for EmptyWorld {
    fn raycast(&self, _origin: Vec2, _direction: Vec2, _max_distance: f64) -> Option<f64> {
        None
    }
}

impl DrivableArea for EmptyWorld {
    fn is_drivable(&self, _position: Vec2, _radius: f64) -> bool {
        true
    }
}

/// Movement that ignores its inputs and drives straight along the x axis.
#[derive(Default)]
pub struct ScriptedMovement {
    pub pose: Pose,
    pub speed: f64,
    pub inputs: [f64; 2],
    pub enabled: bool,
    pub crash_on_update: bool,
    pub updates: usize,
    pub set_inputs_calls: usize,
    pub stops: usize,
}

impl ScriptedMovement {
    pub fn with_speed(speed: f64) -> ScriptedMovement {
        ScriptedMovement { speed, ..ScriptedMovement::default() }
    }
}

impl Movement for ScriptedMovement {
    fn set_inputs(&mut self, inputs: [f64; 2]) {
        self.inputs = inputs;
        self.set_inputs_calls += 1;
    }

    fn current_inputs(&self) -> [f64; 2] {
        self.inputs
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn place(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn update(&mut self, _world: &dyn DrivableArea, dt: f64) -> MovementStatus {
        self.updates += 1;
        self.pose.position.x += self.speed * dt;
        if self.crash_on_update {
            MovementStatus::Died
        } else {
            MovementStatus::Moving
        }
    }
}

pub fn test_settings() -> Settings {
    Settings {
        fixed_delta: 0.5,
        parallel: false,
        ..Settings::standard()
    }
}

pub fn seeded_genotypes(seed: u64, n: usize, topology: &[usize]) -> Vec<Genotype> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..n).map(|_| Genotype::init(&mut rng, topology)).collect()
}

pub fn seeded_agent(seed: u64) -> Agent {
    let topology = Settings::standard().topology;
    let genotype = seeded_genotypes(seed, 1, &topology).remove(0);
    Agent::create(genotype, &topology).unwrap()
}
