pub mod agents;
pub mod health;
pub mod platform;
pub mod swarm;
