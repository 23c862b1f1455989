pub mod brain;
pub mod error;
pub mod racing;
pub mod settings;

/// Number of distance sensors mounted on every car, and so the width of the network input.
pub const SENSOR_COUNT: usize = 5;
/// Number of control signals a car consumes: turn and engine.
pub const CONTROL_COUNT: usize = 2;
