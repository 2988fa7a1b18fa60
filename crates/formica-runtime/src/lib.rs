//! # Formica Runtime
//!
//! Colony management, the solver loop and the concrete problem variants.
//!
//! The runtime is the "nest": it owns the pheromone trail for the
//! duration of a solve, sends a colony of ants out every iteration,
//! keeps the best solution found, and runs the daemon actions that
//! evaporate and reinforce the trail between iterations.

pub mod config;
pub mod directory_impl;
pub mod routing;
pub mod placement;
pub mod daemon;
pub mod colony;
pub mod solver;
pub mod metrics;
pub mod scenario;
pub mod prelude;
