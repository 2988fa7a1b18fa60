//! Formica Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use formica_runtime::prelude::*;
//! ```

// Configuration
pub use crate::config::AcoConfig;

// In-memory collaborators
pub use crate::directory_impl::{Link, SampledTrack, StaticDirectory, TrackSample};

// Problem variants
pub use crate::routing::{HeuristicStrategy, RouteRequest, RoutingEnvironment, LATENCY_EPSILON};
pub use crate::placement::{
    InitialNode, PlacementBookkeeping, PlacementEnvironment, PlacementOutcome,
};

// Colony, daemon actions and solver
pub use crate::colony::Colony;
pub use crate::daemon::{DaemonAction, ITERATION_SCHEDULE};
pub use crate::solver::{BestSolution, IterationStats, SolveReport, Solver};

// Metrics
pub use crate::metrics::ConvergenceSummary;

// Scenario files
pub use crate::scenario::{PlacementRequest, Scenario};
