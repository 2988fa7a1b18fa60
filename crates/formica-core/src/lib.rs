//! # Formica Core
//!
//! Core traits and types for ant colony optimisation over a small weighted
//! graph of compute nodes.
//!
//! This crate holds everything that is shared between problem variants:
//!
//! - **Types** — node identities, capability profiles, geographic positions, modules
//! - **Directory** — the narrow interfaces through which node data, latencies
//!   and a reference trajectory are consumed
//! - **Pheromone** — the dense trail matrix, indexed by node id
//! - **Ant** — the solution-building walker and its state machine
//! - **Problem** — the capability set a variant implements
//! - **Selection** — the probabilistic node-selection policy
//!
//! ## Quick Start
//!
//! ```rust
//! use formica_core::prelude::*;
//!
//! let dublin = GeoPosition::new(53.3498, -6.2603);
//! let cork = GeoPosition::new(51.8985, -8.4756);
//! assert!(dublin.distance_to(&cork) > 200_000.0);
//!
//! let mut trail = PheromoneMatrix::filled(3, Symmetry::Undirected, 0.5);
//! trail.deposit(NodeId(0), NodeId(2), 1.0);
//! assert_eq!(trail.get(NodeId(2), NodeId(0)), 1.5);
//! ```

pub mod types;
pub mod error;
pub mod directory;
pub mod pheromone;
pub mod ant;
pub mod problem;
pub mod selection;
pub mod prelude;
