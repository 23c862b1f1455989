use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use racing_agents::brain::agent::Agent;
use racing_agents::brain::genotype::Genotype;
use racing_agents::racing::body::HeadlessBody;
use racing_agents::racing::car::CarIdGenerator;
use racing_agents::racing::movement::KinematicMovement;
use racing_agents::racing::race::{Optimizer, Race};
use racing_agents::racing::track::Track;
use racing_agents::settings::Settings;
use tracing::info;

#[derive(Parser)]
#[command(name = "racing-agents")]
#[command(about = "Race neural-network driven cars around a demo track")]
struct Args {
    /// JSON file overriding the standard settings
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Number of episodes to run
    #[arg(long, default_value_t = 10)]
    generations: usize,
    /// Seed for genotype initialisation
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Keeps the best genotype and refills the rest of the population at random.
/// Enough to exercise the simulation, not a genetic algorithm.
struct RandomRestart<R: RngCore> {
    rng: R,
    topology: Vec<usize>,
}

impl<R: RngCore> Optimizer for RandomRestart<R> {
    fn next_generation(&mut self, evaluated: Vec<Genotype>) -> Vec<Genotype> {
        let population_size = evaluated.len();
        let champion = evaluated
            .into_iter()
            .max_by(|a, b| a.evaluation.total_cmp(&b.evaluation));

        let mut next = Vec::with_capacity(population_size);
        if let Some(champion) = champion {
            next.push(Genotype::create(champion.parameters().to_vec()));
        }
        while next.len() < population_size {
            next.push(Genotype::init(&mut self.rng, &self.topology));
        }
        next
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let settings = match path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Settings::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
        }
        None => Ok(Settings::standard()),
    }?;
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings(args.settings.as_ref())?;

    let track = Track::oval(30., 20., 4., 24, settings.capture_radius)?;
    let start = track.start_pose();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(args.seed);
    let mut ids = CarIdGenerator::new();
    let mut race = Race::create(track, settings.clone())?;

    let mut genotypes = (0..settings.population_size)
        .map(|_| Genotype::init(&mut rng, &settings.topology))
        .collect_vec();
    for genotype in genotypes.iter() {
        let agent = Agent::create(genotype.clone(), &settings.topology)?;
        race.spawn(&mut ids, agent, KinematicMovement::create(start, 0.5), HeadlessBody::default());
    }

    let mut optimizer = RandomRestart { rng, topology: settings.topology.clone() };
    for generation in 0..args.generations {
        let evaluated = race.run_episode(genotypes)?;
        let best = evaluated.iter().map(|g| g.evaluation).fold(0., f64::max);
        info!(generation, best, "generation evaluated");
        genotypes = optimizer.next_generation(evaluated);
    }

    Ok(())
}
