use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brain::agent::Agent;
use crate::settings::Settings;
use crate::{CONTROL_COUNT, SENSOR_COUNT};

use super::body::{CarBody, Collidable, Visible};
use super::geometry::{DrivableArea, Pose, RayCaster};
use super::movement::{Movement, MovementStatus};
use super::sensor::Sensor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CarId(pub u64);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Car ({})", self.0)
    }
}

/// Hands out car ids. Ids are never reused, so one generator should serve a whole run.
#[derive(Debug, Default)]
pub struct CarIdGenerator {
    next_id: u64,
}

impl CarIdGenerator {
    pub fn new() -> CarIdGenerator {
        CarIdGenerator::default()
    }

    pub fn next_id(&mut self) -> CarId {
        let id = CarId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarState {
    Idle,
    Racing,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    /// No checkpoint captured within the allowed delay.
    Stalled,
    /// The movement reported a fatal collision.
    Crashed,
    /// The episode ran out of time.
    OutOfTime,
}

/// A car on the track: sensors, an agent to drive it and the external movement
/// and body it steers.
pub struct Car<M: Movement, B: CarBody> {
    id: CarId,
    agent: Agent,
    movement: M,
    body: B,
    sensors: [Sensor; SENSOR_COUNT],
    state: CarState,
    time_since_last_checkpoint: f64,
    max_checkpoint_delay: f64,
    use_user_input: bool,
}

impl<M: Movement, B: CarBody> Car<M, B> {
    pub fn create(ids: &mut CarIdGenerator, agent: Agent, movement: M, body: B, settings: &Settings) -> Car<M, B> {
        let sensors = settings
            .sensor_angles
            .map(|angle| Sensor::create(angle, settings.sensor_min_range, settings.sensor_max_range));

        Car {
            id: ids.next_id(),
            agent,
            movement,
            body,
            sensors,
            state: CarState::Idle,
            time_since_last_checkpoint: 0.,
            max_checkpoint_delay: settings.max_checkpoint_delay,
            use_user_input: settings.use_user_input,
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    /// Only a racing car senses, thinks and moves.
    pub fn is_enabled(&self) -> bool {
        self.state == CarState::Racing
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Swaps in the agent for the next episode and returns the previous one.
    pub fn set_agent(&mut self, agent: Agent) -> Agent {
        std::mem::replace(&mut self.agent, agent)
    }

    pub fn movement(&self) -> &M {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut M {
        &mut self.movement
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn sensors(&self) -> &[Sensor; SENSOR_COUNT] {
        &self.sensors
    }

    pub fn pose(&self) -> Pose {
        self.movement.pose()
    }

    pub fn time_since_last_checkpoint(&self) -> f64 {
        self.time_since_last_checkpoint
    }

    pub fn current_control_inputs(&self) -> [f64; CONTROL_COUNT] {
        self.movement.current_inputs()
    }

    pub fn use_user_input(&self) -> bool {
        self.use_user_input
    }

    /// In user-input mode the agent is not consulted; the host feeds the movement directly.
    pub fn set_use_user_input(&mut self, use_user_input: bool) {
        self.use_user_input = use_user_input;
    }

    pub fn sensor_outputs(&self) -> [f64; SENSOR_COUNT] {
        std::array::from_fn(|i| self.sensors[i].output())
    }

    /// Re-arms the car for a new episode.
    pub fn restart(&mut self) {
        self.movement.set_enabled(true);
        self.body.set_visible(true);
        self.body.set_collision_enabled(true);
        self.time_since_last_checkpoint = 0.;

        for sensor in self.sensors.iter_mut() {
            sensor.show();
            sensor.set_visible(false);
        }

        self.agent.reset();
        self.state = CarState::Racing;
    }

    /// Advances the car by one fixed tick. Does nothing unless the car is racing.
    pub fn fixed_update<W: RayCaster + DrivableArea>(&mut self, world: &W, dt: f64) -> CarState {
        if !self.is_enabled() {
            return self.state;
        }

        self.time_since_last_checkpoint += dt;

        if !self.use_user_input {
            let pose = self.movement.pose();
            for sensor in self.sensors.iter_mut() {
                sensor.sense(world, &pose);
            }
            let controls = self.agent.process_inputs(&self.sensor_outputs());
            self.movement.set_inputs(controls);
        }

        if self.movement.update(world, dt) == MovementStatus::Died {
            self.die(DeathCause::Crashed);
        } else if self.time_since_last_checkpoint > self.max_checkpoint_delay {
            debug!(car = %self.id, "time exceeded to reach checkpoint");
            self.die(DeathCause::Stalled);
        }

        self.state
    }

    /// Resets the stall timer. Reward is not touched here.
    pub fn checkpoint_captured(&mut self, index: usize) {
        if !self.is_enabled() {
            return;
        }
        debug!(car = %self.id, index, "checkpoint captured");
        self.time_since_last_checkpoint = 0.;
    }

    /// Fitness hook: records how much of the track this car has completed.
    /// Has no effect once the car is dead.
    pub fn set_completion_reward(&mut self, reward: f64) {
        self.agent.set_evaluation(reward);
    }

    /// Ends the episode for this car. Later calls change nothing.
    pub fn die(&mut self, cause: DeathCause) {
        if self.state == CarState::Dead {
            return;
        }
        debug!(car = %self.id, ?cause, evaluation = self.agent.evaluation(), "car died");
        self.state = CarState::Dead;
        self.movement.stop();
        self.movement.set_enabled(false);
        self.body.set_visible(false);
        self.body.set_collision_enabled(false);

        for sensor in self.sensors.iter_mut() {
            sensor.hide();
        }

        self.agent.kill();
    }
}
