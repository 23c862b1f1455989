use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0., y: 0. };

    pub fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    /// Unit vector pointing `degrees` counter-clockwise from the x axis.
    pub fn from_degrees(degrees: f64) -> Vec2 {
        let radians = degrees.to_radians();
        Vec2::new(radians.cos(), radians.sin())
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Position and heading (degrees, counter-clockwise from the x axis) of a car.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub heading: f64,
}

impl Pose {
    pub fn new(position: Vec2, heading: f64) -> Pose {
        Pose { position, heading }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Segment {
        Segment { start, end }
    }

    /// Distance along the unit ray `origin + t * direction` at which it meets
    /// this segment, if it does.
    pub fn ray_intersection(&self, origin: Vec2, direction: Vec2) -> Option<f64> {
        let edge = self.end - self.start;
        let denominator = direction.cross(edge);
        if denominator.abs() < f64::EPSILON {
            return None;
        }
        let offset = self.start - origin;
        let t = offset.cross(edge) / denominator;
        let u = offset.cross(direction) / denominator;
        if t >= 0. && (0. ..=1.).contains(&u) {
            Some(t)
        } else {
            None
        }
    }

    pub fn distance_to_point(&self, point: Vec2) -> f64 {
        let edge = self.end - self.start;
        let length_squared = edge.dot(edge);
        if length_squared == 0. {
            return point.distance(self.start);
        }
        let t = ((point - self.start).dot(edge) / length_squared).clamp(0., 1.);
        point.distance(self.start + edge * t)
    }
}

/// Anything a sensor ray can hit.
pub trait RayCaster {
    /// Distance to the closest obstacle along the ray within `max_distance`.
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f64) -> Option<f64>;
}

/// Answers whether a circular car body is still on the drivable part of the world.
pub trait DrivableArea {
    fn is_drivable(&self, position: Vec2, radius: f64) -> bool;
}
