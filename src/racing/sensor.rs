use super::body::Visible;
use super::geometry::{Pose, RayCaster, Vec2};

/// A distance probe fixed to a car, pointing `angle` degrees off the car heading.
#[derive(Clone, Debug)]
pub struct Sensor {
    angle: f64,
    max_range: f64,
    min_range: f64,
    output: f64,
    shown: bool,
    visible: bool,
}

impl Sensor {
    pub fn create(angle: f64, min_range: f64, max_range: f64) -> Sensor {
        Sensor {
            angle,
            max_range,
            min_range,
            output: 1.,
            shown: false,
            visible: false,
        }
    }

    /// Casts the probe from `pose` and stores the reading.
    pub fn sense<W: RayCaster + ?Sized>(&mut self, world: &W, pose: &Pose) {
        self.output = self.measure(world, pose);
    }

    fn measure<W: RayCaster + ?Sized>(&self, world: &W, pose: &Pose) -> f64 {
        let usable = self.max_range.is_finite()
            && self.max_range > 0.
            && pose.position.is_finite()
            && pose.heading.is_finite();
        if !usable {
            return 1.;
        }

        let direction = Vec2::from_degrees(pose.heading + self.angle);
        match world.raycast(pose.position, direction, self.max_range) {
            Some(distance) if distance.is_finite() => {
                distance.clamp(self.min_range.min(self.max_range), self.max_range) / self.max_range
            }
            _ => 1.,
        }
    }

    /// Latest reading in [0, 1]: 1 means nothing within range.
    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Attaches the probe's visual to the scene. Whether the ray is drawn is
    /// still governed by [`Visible`].
    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

impl Visible for Sensor {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
