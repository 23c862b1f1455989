use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use tracing::info;

use crate::brain::agent::Agent;
use crate::brain::genotype::Genotype;
use crate::error::{EpisodeError, SettingsError};
use crate::settings::Settings;

use super::body::CarBody;
use super::car::{Car, CarId, CarIdGenerator, CarState, DeathCause};
use super::movement::Movement;
use super::track::{Track, TrackProgress};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// The genetic optimizer seen from the simulation: evaluated genotypes in,
/// the next generation out.
pub trait Optimizer {
    fn next_generation(&mut self, evaluated: Vec<Genotype>) -> Vec<Genotype>;
}

struct Entrant<M: Movement, B: CarBody> {
    car: Car<M, B>,
    progress: TrackProgress,
}

impl<M: Movement, B: CarBody> Entrant<M, B> {
    /// One fixed tick for one car. Touches nothing outside this entrant.
    fn step(&mut self, track: &Track, dt: f64) {
        if self.car.fixed_update(track, dt) != CarState::Racing {
            return;
        }
        let update = self.progress.update(track, self.car.pose().position);
        for index in update.captured {
            self.car.checkpoint_captured(index);
        }
        self.car.set_completion_reward(update.completion_reward);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub ticks: usize,
    pub elapsed: f64,
    pub best: Option<(CarId, f64)>,
    pub mean_evaluation: f64,
}

/// Runs a population of cars on one track in fixed ticks.
pub struct Race<M: Movement, B: CarBody> {
    track: Track,
    settings: Settings,
    entrants: FxIndexMap<CarId, Entrant<M, B>>,
    elapsed: f64,
    ticks: usize,
}

impl<M: Movement, B: CarBody + Send> Race<M, B> {
    pub fn create(track: Track, settings: Settings) -> Result<Race<M, B>, SettingsError> {
        settings.validate()?;
        Ok(Race {
            track,
            settings,
            entrants: FxIndexMap::default(),
            elapsed: 0.,
            ticks: 0,
        })
    }

    pub fn spawn(&mut self, ids: &mut CarIdGenerator, agent: Agent, movement: M, body: B) -> CarId {
        let car = Car::create(ids, agent, movement, body, &self.settings);
        let id = car.id();
        self.entrants.insert(id, Entrant { car, progress: TrackProgress::default() });
        id
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn car(&self, id: CarId) -> Option<&Car<M, B>> {
        self.entrants.get(&id).map(|entrant| &entrant.car)
    }

    pub fn car_mut(&mut self, id: CarId) -> Option<&mut Car<M, B>> {
        self.entrants.get_mut(&id).map(|entrant| &mut entrant.car)
    }

    /// Cars in spawn order.
    pub fn cars(&self) -> impl Iterator<Item = &Car<M, B>> {
        self.entrants.values().map(|entrant| &entrant.car)
    }

    pub fn progress(&self, id: CarId) -> Option<TrackProgress> {
        self.entrants.get(&id).map(|entrant| entrant.progress)
    }

    /// Puts every car back on the start line and starts a new episode.
    pub fn restart_all(&mut self) {
        let start = self.track.start_pose();
        for entrant in self.entrants.values_mut() {
            entrant.car.movement_mut().place(start);
            entrant.car.restart();
            entrant.progress.reset();
        }
        self.elapsed = 0.;
        self.ticks = 0;
    }

    pub fn tick(&mut self) {
        let dt = self.settings.fixed_delta;
        let track = &self.track;
        if self.settings.parallel {
            self.entrants.par_values_mut().for_each(|entrant| entrant.step(track, dt));
        } else {
            self.entrants.values_mut().for_each(|entrant| entrant.step(track, dt));
        }
        self.elapsed += dt;
        self.ticks += 1;
    }

    pub fn all_dead(&self) -> bool {
        self.cars().all(|car| car.state() != CarState::Racing)
    }

    /// Evaluations may be read once this holds: every car is dead or the time budget is spent.
    pub fn is_finished(&self) -> bool {
        self.all_dead() || self.ticks >= self.settings.max_ticks()
    }

    /// Stops every car still racing, freezing its evaluation.
    pub fn finish(&mut self) {
        for entrant in self.entrants.values_mut() {
            entrant.car.die(DeathCause::OutOfTime);
        }
    }

    pub fn best_car(&self) -> Option<(CarId, f64)> {
        self.cars()
            .map(|car| (car.id(), car.agent().evaluation()))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    pub fn summary(&self) -> EpisodeSummary {
        let evaluations = self.cars().map(|car| car.agent().evaluation()).collect_vec();
        let mean_evaluation = if evaluations.is_empty() {
            0.
        } else {
            evaluations.iter().sum::<f64>() / evaluations.len() as f64
        };
        EpisodeSummary {
            ticks: self.ticks,
            elapsed: self.elapsed,
            best: self.best_car(),
            mean_evaluation,
        }
    }

    /// Gives each car one genotype, in spawn order, and races until the episode
    /// is over. Returns the genotypes with their final evaluations.
    pub fn run_episode(&mut self, genotypes: Vec<Genotype>) -> Result<Vec<Genotype>, EpisodeError> {
        if genotypes.len() != self.entrants.len() {
            return Err(EpisodeError::PopulationMismatch { genotypes: genotypes.len(), cars: self.entrants.len() });
        }

        let agents = genotypes
            .into_iter()
            .map(|genotype| Agent::create(genotype, &self.settings.topology))
            .collect::<Result<Vec<_>, _>>()?;
        for (entrant, agent) in self.entrants.values_mut().zip(agents) {
            entrant.car.set_agent(agent);
        }

        self.restart_all();
        while !self.is_finished() {
            self.tick();
        }
        self.finish();

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            elapsed = summary.elapsed,
            best = ?summary.best,
            mean = summary.mean_evaluation,
            "episode finished"
        );

        Ok(self.cars().map(|car| car.agent().genotype().clone()).collect())
    }
}
