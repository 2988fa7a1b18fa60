//! Formica Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use formica_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{GeoPosition, Module, NodeId, NodeProfile, EARTH_RADIUS_M};

// External collaborator traits
pub use crate::directory::{NodeDirectory, TimeTrack};

// Trail
pub use crate::pheromone::{PheromoneMatrix, Symmetry};

// Ant and problem capability set
pub use crate::ant::{Ant, AntState};
pub use crate::problem::{EmptyCandidates, Problem, SelectionRule};

// Selection policy
pub use crate::selection::{
    candidate_probabilities, construct_solution, feasible_candidates, select_next, Candidate,
    SelectionParams, DEFAULT_EXPLOIT_THRESHOLD, PROBABILITY_TOLERANCE,
};

// Re-export error types
pub use crate::error::{FormicaError, Result};
