use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::SENSOR_COUNT;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds a car may go without capturing a checkpoint before it is stopped.
    pub max_checkpoint_delay: f64,
    /// Length of one fixed simulation tick in seconds.
    pub fixed_delta: f64,
    /// Hard cap on simulated seconds per episode.
    pub episode_time_budget: f64,
    pub population_size: usize,
    pub topology: Vec<usize>,
    pub sensor_max_range: f64,
    pub sensor_min_range: f64,
    /// Ray directions in degrees relative to the car heading, in sensor order.
    pub sensor_angles: [f64; SENSOR_COUNT],
    pub capture_radius: f64,
    pub use_user_input: bool,
    pub parallel: bool,
}

impl Settings {
    pub fn standard() -> Settings {
        Settings {
            max_checkpoint_delay: 3.0,
            fixed_delta: 0.02,
            episode_time_budget: 60.0,
            population_size: 20,
            topology: vec![5, 4, 3, 2],
            sensor_max_range: 10.0,
            sensor_min_range: 0.01,
            sensor_angles: [-70.0, -35.0, 0.0, 35.0, 70.0],
            capture_radius: 1.0,
            use_user_input: false,
            parallel: true,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Settings> {
        serde_json::from_str(json)
    }

    /// Rejects values that would stall the clock or end an episode before its first tick.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("fixed_delta", self.fixed_delta),
            ("episode_time_budget", self.episode_time_budget),
            ("max_checkpoint_delay", self.max_checkpoint_delay),
        ] {
            if !(value > 0. && value.is_finite()) {
                return Err(SettingsError::NonPositive { field, value });
            }
        }
        let (min, max) = (self.sensor_min_range, self.sensor_max_range);
        if !(min >= 0. && min < max && max.is_finite()) {
            return Err(SettingsError::InvalidSensorRange { min, max });
        }
        Ok(())
    }

    pub fn max_ticks(&self) -> usize {
        (self.episode_time_budget / self.fixed_delta).ceil() as usize
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::standard()
    }
}
