use thiserror::Error;

/// Errors raised when a network topology does not fit the car's sensors and controls.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("topology must contain at least an input and an output layer, got {0} layers")]
    TooFewLayers(usize),
    #[error("layer {index} has zero neurons")]
    EmptyLayer { index: usize },
    #[error("input layer has {actual} neurons but the car has {expected} sensors")]
    InputMismatch { expected: usize, actual: usize },
    #[error("output layer has {actual} neurons but the car takes {expected} controls")]
    OutputMismatch { expected: usize, actual: usize },
    #[error("genotype holds {actual} parameters but the topology needs {expected}")]
    ParameterMismatch { expected: usize, actual: usize },
}

/// Errors raised while building a track from checkpoint positions.
#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("a track needs at least two checkpoints, got {0}")]
    TooFewCheckpoints(usize),
    #[error("checkpoint {index} lies {distance} units from its predecessor")]
    DegenerateSegment { index: usize, distance: f64 },
    #[error("capture radius must be positive, got {0}")]
    InvalidCaptureRadius(f64),
}

/// Errors raised when settings cannot drive a bounded episode.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("sensor range [{min}, {max}] is empty or not finite")]
    InvalidSensorRange { min: f64, max: f64 },
}

/// Errors raised when handing a generation of genotypes to a race.
#[derive(Debug, Error, PartialEq)]
pub enum EpisodeError {
    #[error("got {genotypes} genotypes for {cars} cars")]
    PopulationMismatch { genotypes: usize, cars: usize },
    #[error(transparent)]
    Topology(#[from] TopologyError),
}
