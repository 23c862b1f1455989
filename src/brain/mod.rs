pub mod agent;
pub mod genotype;
pub mod network;
