use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

use super::body::Visible;
use super::checkpoint::Checkpoint;
use super::geometry::{DrivableArea, Pose, RayCaster, Segment, Vec2};

/// Ordered checkpoints plus the walls bounding the drivable area.
/// Serialized as its layout; deserializing goes through `Track::build`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TrackLayout", into = "TrackLayout")]
pub struct Track {
    checkpoints: Vec<Checkpoint>,
    walls: Vec<Segment>,
    length: f64,
}

/// Wire form of a track: the inputs of `Track::build`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub points: Vec<Vec2>,
    pub capture_radius: f64,
    #[serde(default)]
    pub walls: Vec<Segment>,
}

impl TryFrom<TrackLayout> for Track {
    type Error = TrackError;

    fn try_from(layout: TrackLayout) -> Result<Track, TrackError> {
        Track::build(&layout.points, layout.capture_radius, layout.walls)
    }
}

impl From<Track> for TrackLayout {
    fn from(track: Track) -> TrackLayout {
        TrackLayout {
            points: track.checkpoints.iter().map(|c| c.position).collect(),
            capture_radius: track.checkpoints.first().map_or(0., |c| c.capture_radius),
            walls: track.walls,
        }
    }
}

impl Track {
    /// Lays out checkpoints along `points`. The first point is the start line.
    /// Each checkpoint is worth the share of the total track length its leg covers,
    /// so the whole track is worth 1.
    pub fn build(points: &[Vec2], capture_radius: f64, walls: Vec<Segment>) -> Result<Track, TrackError> {
        if points.len() < 2 {
            return Err(TrackError::TooFewCheckpoints(points.len()));
        }
        if !(capture_radius > 0. && capture_radius.is_finite()) {
            return Err(TrackError::InvalidCaptureRadius(capture_radius));
        }

        let mut checkpoints = Vec::with_capacity(points.len());
        checkpoints.push(Checkpoint::create(points[0], capture_radius, 0., 0.));
        for (index, (&previous, &current)) in points.iter().tuple_windows().enumerate() {
            let distance = previous.distance(current);
            if !(distance > 0. && distance.is_finite()) {
                return Err(TrackError::DegenerateSegment { index: index + 1, distance });
            }
            let mut checkpoint = Checkpoint::create(current, capture_radius, 0., distance);
            checkpoint.accumulated_distance = checkpoints[index].accumulated_distance + distance;
            checkpoints.push(checkpoint);
        }

        let length = checkpoints[checkpoints.len() - 1].accumulated_distance;
        for i in 1..checkpoints.len() {
            let previous_reward = checkpoints[i - 1].accumulated_reward;
            let checkpoint = &mut checkpoints[i];
            checkpoint.reward_value = checkpoint.accumulated_distance / length - previous_reward;
            checkpoint.accumulated_reward = previous_reward + checkpoint.reward_value;
        }

        Ok(Track { checkpoints, walls, length })
    }

    /// Closed elliptic ring centred on the origin, driven counter-clockwise
    /// from the rightmost point of the centre line.
    pub fn oval(radius_x: f64, radius_y: f64, half_width: f64, n_checkpoints: usize, capture_radius: f64) -> Result<Track, TrackError> {
        let n_wall_segments = 64;
        let ring = |scale: f64, n: usize| -> Vec<Vec2> {
            (0..n)
                .map(|i| {
                    let angle = std::f64::consts::TAU * i as f64 / n as f64;
                    Vec2::new((radius_x + scale) * angle.cos(), (radius_y + scale) * angle.sin())
                })
                .collect()
        };
        let close = |points: Vec<Vec2>| -> Vec<Segment> {
            points
                .iter()
                .circular_tuple_windows()
                .map(|(&start, &end)| Segment::new(start, end))
                .collect()
        };

        let mut walls = close(ring(half_width, n_wall_segments));
        walls.extend(close(ring(-half_width, n_wall_segments)));

        let mut points = ring(0., n_checkpoints);
        if let Some(&start) = points.first() {
            points.push(start);
        }
        Track::build(&points, capture_radius, walls)
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn set_checkpoints_visible(&mut self, visible: bool) {
        for checkpoint in self.checkpoints.iter_mut() {
            checkpoint.set_visible(visible);
        }
    }

    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// The start line, facing the first checkpoint to capture.
    pub fn start_pose(&self) -> Pose {
        let start = self.checkpoints[0].position;
        let direction = self.checkpoints[1].position - start;
        Pose::new(start, direction.y.atan2(direction.x).to_degrees())
    }
}

impl RayCaster for Track {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f64) -> Option<f64> {
        self.walls
            .iter()
            .filter_map(|wall| wall.ray_intersection(origin, direction))
            .filter(|&distance| distance <= max_distance)
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl DrivableArea for Track {
    fn is_drivable(&self, position: Vec2, radius: f64) -> bool {
        position.is_finite() && self.walls.iter().all(|wall| wall.distance_to_point(position) > radius)
    }
}

/// Result of one progress check.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressUpdate {
    /// Indices captured during this check, in ascending order.
    pub captured: Vec<usize>,
    /// Share of the track completed, in [0, 1].
    pub completion_reward: f64,
}

/// Walks one car through a track's checkpoints in order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackProgress {
    next_checkpoint: usize,
}

impl Default for TrackProgress {
    fn default() -> Self {
        TrackProgress { next_checkpoint: 1 }
    }
}

impl TrackProgress {
    pub fn next_checkpoint(&self) -> usize {
        self.next_checkpoint
    }

    pub fn reset(&mut self) {
        *self = TrackProgress::default();
    }

    pub fn update(&mut self, track: &Track, position: Vec2) -> ProgressUpdate {
        let checkpoints = track.checkpoints();
        let mut captured = Vec::new();
        loop {
            let Some(checkpoint) = checkpoints.get(self.next_checkpoint) else {
                return ProgressUpdate { captured, completion_reward: 1. };
            };

            let distance = checkpoint.position.distance(position);
            if distance <= checkpoint.capture_radius {
                captured.push(self.next_checkpoint);
                self.next_checkpoint += 1;
                continue;
            }

            let completion_reward = checkpoints[self.next_checkpoint - 1].accumulated_reward + checkpoint.get_reward_value(distance);
            return ProgressUpdate { captured, completion_reward };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn straight_track() -> Track {
        let points = [Vec2::new(0., 0.), Vec2::new(10., 0.), Vec2::new(30., 0.), Vec2::new(40., 0.)];
        Track::build(&points, 1., Vec::new()).unwrap()
    }

    #[test]
    fn accumulates_distance_and_reward() {
        let track = straight_track();
        let checkpoints = track.checkpoints();
        assert_approx_eq!(track.length(), 40.);
        assert_approx_eq!(checkpoints[1].reward_value, 0.25);
        assert_approx_eq!(checkpoints[2].reward_value, 0.5);
        assert_approx_eq!(checkpoints[2].distance_to_previous, 20.);
        assert_approx_eq!(checkpoints[2].accumulated_distance, 30.);
        assert_approx_eq!(checkpoints[3].accumulated_reward, 1.);
        assert!(checkpoints.windows(2).all(|pair| pair[1].accumulated_distance >= pair[0].accumulated_distance));
        assert!(checkpoints.windows(2).all(|pair| pair[1].accumulated_reward >= pair[0].accumulated_reward));
    }

    #[test]
    fn rejects_degenerate_tracks() {
        assert_eq!(Track::build(&[Vec2::ZERO], 1., Vec::new()).unwrap_err(), TrackError::TooFewCheckpoints(1));
        let repeated = [Vec2::ZERO, Vec2::new(5., 0.), Vec2::new(5., 0.)];
        assert_eq!(
            Track::build(&repeated, 1., Vec::new()).unwrap_err(),
            TrackError::DegenerateSegment { index: 2, distance: 0. }
        );
        assert_eq!(
            Track::build(&[Vec2::ZERO, Vec2::new(1., 0.)], 0., Vec::new()).unwrap_err(),
            TrackError::InvalidCaptureRadius(0.)
        );
    }

    #[test]
    fn progress_rewards_partial_leg() {
        let track = straight_track();
        let mut progress = TrackProgress::default();
        let update = progress.update(&track, Vec2::new(5., 0.));
        assert!(update.captured.is_empty());
        assert_approx_eq!(update.completion_reward, 0.125);
    }

    #[test]
    fn progress_captures_in_order() {
        let track = straight_track();
        let mut progress = TrackProgress::default();
        let update = progress.update(&track, Vec2::new(10.5, 0.));
        assert_eq!(update.captured, vec![1]);
        assert_eq!(progress.next_checkpoint(), 2);
        assert_approx_eq!(update.completion_reward, 0.25 + 0.5 * 0.5 / 20.);

        // skipping ahead does not capture the checkpoint in between
        let update = progress.update(&track, Vec2::new(40., 0.));
        assert!(update.captured.is_empty());
        assert_eq!(progress.next_checkpoint(), 2);
        assert_approx_eq!(update.completion_reward, 0.5);
    }

    #[test]
    fn finished_track_is_worth_one() {
        let track = straight_track();
        let mut progress = TrackProgress::default();
        for x in [10., 30., 40.] {
            progress.update(&track, Vec2::new(x, 0.));
        }
        let update = progress.update(&track, Vec2::new(40., 0.));
        assert_eq!(update.completion_reward, 1.);
        progress.reset();
        assert_eq!(progress.next_checkpoint(), 1);
    }

    #[test]
    fn visibility_toggle_leaves_geometry_alone() {
        let mut track = straight_track();
        let before: Vec<f64> = track.checkpoints().iter().map(|c| c.accumulated_reward).collect();
        track.set_checkpoints_visible(false);
        assert!(track.checkpoints().iter().all(|c| !c.is_visible()));
        let after: Vec<f64> = track.checkpoints().iter().map(|c| c.accumulated_reward).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn oval_is_closed_and_drivable_on_centre_line() {
        let track = Track::oval(30., 20., 4., 16, 2.).unwrap();
        assert_eq!(track.checkpoints().len(), 17);
        assert_eq!(track.walls().len(), 128);
        let start = track.start_pose();
        assert_eq!(start.position, Vec2::new(30., 0.));
        assert!(start.heading > 90. && start.heading < 180.);
        assert!(track.is_drivable(Vec2::new(30., 0.), 0.5));
        assert!(!track.is_drivable(Vec2::new(33.8, 0.), 0.5));
        let ahead = track.raycast(Vec2::new(30., 0.), Vec2::new(1., 0.), 10.).unwrap();
        assert_approx_eq!(ahead, 4.);
    }

    #[test]
    fn deserializing_rejects_tracks_build_would_reject() {
        let empty = serde_json::from_str::<Track>(r#"{ "points": [], "capture_radius": 1.0 }"#);
        assert!(empty.is_err());

        let degenerate = r#"{ "points": [{ "x": 0.0, "y": 0.0 }, { "x": 0.0, "y": 0.0 }], "capture_radius": 1.0 }"#;
        assert!(serde_json::from_str::<Track>(degenerate).is_err());

        let raw = r#"{ "checkpoints": [], "walls": [], "length": 0.0 }"#;
        assert!(serde_json::from_str::<Track>(raw).is_err());
    }

    #[test]
    fn deserialized_track_has_accumulated_totals() {
        let json = serde_json::to_string(&straight_track()).unwrap();
        let track: Track = serde_json::from_str(&json).unwrap();

        assert_eq!(track.checkpoints().len(), 4);
        assert_approx_eq!(track.length(), 40.);
        assert_approx_eq!(track.checkpoints()[3].accumulated_reward, 1.);
        assert_eq!(track.start_pose().position, Vec2::new(0., 0.));
    }
}
