use serde::{Deserialize, Serialize};

use super::body::Visible;
use super::geometry::Vec2;

/// Waypoint of a track. Everything except visibility is fixed when the track is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: Vec2,
    pub capture_radius: f64,
    pub reward_value: f64,
    pub distance_to_previous: f64,
    pub accumulated_distance: f64,
    pub accumulated_reward: f64,
    #[serde(skip)]
    is_visible: bool,
}

impl Checkpoint {
    pub fn create(position: Vec2, capture_radius: f64, reward_value: f64, distance_to_previous: f64) -> Checkpoint {
        Checkpoint {
            position,
            capture_radius,
            reward_value,
            distance_to_previous,
            accumulated_distance: 0.,
            accumulated_reward: 0.,
            is_visible: true,
        }
    }

    /// Reward for standing `current_distance` away from this checkpoint,
    /// scaled by how much of the leg from the previous checkpoint is covered.
    pub fn get_reward_value(&self, current_distance: f64) -> f64 {
        let completion = (self.distance_to_previous - current_distance) / self.distance_to_previous;
        if completion < 0. {
            0.
        } else {
            completion * self.reward_value
        }
    }

    pub fn can_capture(&self, position: Vec2) -> bool {
        self.position.distance(position) <= self.capture_radius
    }
}

impl Visible for Checkpoint {
    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn sample_checkpoint() -> Checkpoint {
        Checkpoint::create(Vec2::new(50., 0.), 1., 10., 50.)
    }

    #[test]
    fn halfway_earns_half() {
        assert_approx_eq!(sample_checkpoint().get_reward_value(25.), 5.);
    }

    #[test]
    fn reaching_earns_full_reward() {
        assert_eq!(sample_checkpoint().get_reward_value(0.), 10.);
    }

    #[test]
    fn farther_than_previous_earns_nothing() {
        let checkpoint = sample_checkpoint();
        for distance in [50., 50.5, 80., 1e6] {
            assert_eq!(checkpoint.get_reward_value(distance), 0.);
        }
    }

    #[test]
    fn reward_never_grows_with_distance() {
        let checkpoint = sample_checkpoint();
        let rewards: Vec<f64> = (0..=120).map(|i| checkpoint.get_reward_value(i as f64 * 0.5)).collect();
        assert!(rewards.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn capture_uses_radius() {
        let checkpoint = sample_checkpoint();
        assert!(checkpoint.can_capture(Vec2::new(49.2, 0.5)));
        assert!(!checkpoint.can_capture(Vec2::new(48., 0.)));
    }
}
