use crate::CONTROL_COUNT;

use super::geometry::{DrivableArea, Pose, Vec2};

/// Outcome of advancing a car's physics by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementStatus {
    Moving,
    /// The car left the drivable area or hit something fatal.
    Died,
}

/// Physics side of a car. Consumes control vectors and owns position and velocity.
pub trait Movement: Send {
    fn set_inputs(&mut self, inputs: [f64; CONTROL_COUNT]);
    fn current_inputs(&self) -> [f64; CONTROL_COUNT];
    fn stop(&mut self);
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn pose(&self) -> Pose;
    /// Moves the car to `pose`, typically the start line of a new episode.
    fn place(&mut self, pose: Pose);
    fn update(&mut self, world: &dyn DrivableArea, dt: f64) -> MovementStatus;
}

const MAX_VELOCITY: f64 = 20.;
const ACCELERATION: f64 = 8.;
const VELOCITY_FRICTION: f64 = 2.;
/// Degrees per second at full turn input.
const TURN_SPEED: f64 = 100.;

/// Top-down car driven by `[turn, engine]`, both in [-1, 1].
/// Positive turn steers clockwise, positive engine accelerates forward.
#[derive(Clone, Debug)]
pub struct KinematicMovement {
    pose: Pose,
    velocity: f64,
    inputs: [f64; CONTROL_COUNT],
    radius: f64,
    enabled: bool,
}

impl KinematicMovement {
    pub fn create(pose: Pose, radius: f64) -> KinematicMovement {
        KinematicMovement {
            pose,
            velocity: 0.,
            inputs: [0.; CONTROL_COUNT],
            radius,
            enabled: false,
        }
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    fn apply_input(&mut self, dt: f64) {
        let [turn, engine] = self.inputs;
        self.velocity = (self.velocity + engine * ACCELERATION * dt).clamp(-MAX_VELOCITY, MAX_VELOCITY);
        self.pose.heading -= turn * TURN_SPEED * dt;
    }

    fn apply_velocity(&mut self, dt: f64) {
        let direction = Vec2::from_degrees(self.pose.heading);
        self.pose.position = self.pose.position + direction * (self.velocity * dt);
    }

    fn apply_friction(&mut self, dt: f64) {
        if self.inputs[1] != 0. {
            return;
        }
        if self.velocity > 0. {
            self.velocity = (self.velocity - VELOCITY_FRICTION * dt).max(0.);
        } else if self.velocity < 0. {
            self.velocity = (self.velocity + VELOCITY_FRICTION * dt).min(0.);
        }
    }
}

impl Movement for KinematicMovement {
    fn set_inputs(&mut self, inputs: [f64; CONTROL_COUNT]) {
        self.inputs = inputs.map(|x| if x.is_finite() { x.clamp(-1., 1.) } else { 0. });
    }

    fn current_inputs(&self) -> [f64; CONTROL_COUNT] {
        self.inputs
    }

    fn stop(&mut self) {
        self.velocity = 0.;
        self.inputs = [0.; CONTROL_COUNT];
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

    fn update(&mut self, world: &dyn DrivableArea, dt: f64) -> MovementStatus {
        if !self.enabled {
            return MovementStatus::Moving;
        }
        self.apply_input(dt);
        self.apply_velocity(dt);
        self.apply_friction(dt);

        if world.is_drivable(self.pose.position, self.radius) {
            MovementStatus::Moving
        } else {
            MovementStatus::Died
        }
    }
}
