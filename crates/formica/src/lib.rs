//! # Formica
//!
//! Ant colony optimisation for routing and module placement over a small
//! weighted graph of fog nodes.
//!
//! A colony of ants walks the latency graph. Each ant builds one
//! solution, choosing every next node at random with a probability that
//! grows with a problem-specific heuristic and with the pheromone left by
//! earlier good solutions. Between iterations the trail evaporates and is
//! reinforced along the solutions just built. The solver keeps the
//! cheapest valid solution it has seen.
//!
//! ## Quick Start
//!
//! ```rust
//! use formica::prelude::*;
//!
//! // Four nodes in a line, 5 ms between neighbours
//! let nodes = (0..4).map(|i| NodeProfile::new(i, 1.0)).collect();
//! let links = [Link::new(0, 1, 5.0), Link::new(1, 2, 5.0), Link::new(2, 3, 5.0)];
//! let directory = StaticDirectory::new(nodes, &links).unwrap();
//!
//! // Route from 0 to 3
//! let env = RoutingEnvironment::new(directory, RouteRequest::new(0, 3, 3)).unwrap();
//! let solver = Solver::new(AcoConfig::routing().with_seed(7)).unwrap();
//! let report = solver.solve(&env).unwrap();
//!
//! assert_eq!(report.best.nodes, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
//! assert_eq!(report.best.cost, 15.0);
//! ```
//!
//! ## Architecture
//!
//! - [`formica_core`] - Shared types, the trail matrix, the ant, the
//!   `Problem` trait and the node-selection policy
//! - [`formica_runtime`] - Routing and placement variants, colony, daemon
//!   actions, solver loop, metrics and scenario files
//!
//! ## Variants
//!
//! | | Routing | Placement |
//! |---|---|---|
//! | Solution | path from start to end | chain of module hosts |
//! | Heuristic | 1 / distance or 1 / latency | 1 / distance to the reference track |
//! | Trail | undirected | directed |
//! | Selection | roulette wheel | pseudo-random-proportional |
//! | Dead end | ant marked invalid | solve aborted |
//! | Cost | Σ latency | Σ (latency + power) |

// Re-export all subcrates
pub use formica_core as core;
pub use formica_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use formica::prelude::*;
/// ```
pub mod prelude {
    pub use formica_core::prelude::*;
    pub use formica_runtime::prelude::*;
}
