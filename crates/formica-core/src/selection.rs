//! Node selection — the probabilistic policy that moves an ant one hop.
//!
//! Each call either appends exactly one node to the ant's solution or
//! finishes the ant as invalid. The policy only reads the pheromone
//! matrix, so any number of ants can run it concurrently against the
//! same trail.
//!
//! 1. First hop: place the ant on the problem's initial node (no randomness).
//! 2. Collect feasible candidates: neighbourhood minus visited, minus invalid.
//! 3. Weight each candidate `heuristic^α × pheromone^β` and normalise.
//! 4. Reject distributions whose mass is non-finite or not within 0.001 of 1.
//! 5. Draw with the problem's [`SelectionRule`].

use crate::ant::Ant;
use crate::error::{FormicaError, Result};
use crate::pheromone::PheromoneMatrix;
use crate::problem::{EmptyCandidates, Problem, SelectionRule};
use crate::types::NodeId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Allowed deviation of the probability mass from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 0.001;

/// Floor of the normalisation denominator.
pub const DENOMINATOR_FLOOR: f64 = f64::MIN_POSITIVE;

/// Default exploitation threshold of the pseudo-random-proportional rule.
pub const DEFAULT_EXPLOIT_THRESHOLD: f64 = 0.8;

/// Exponents and thresholds that shape the candidate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    /// α — weight of the heuristic value.
    pub heuristic_exponent: f64,
    /// β — weight of the pheromone value.
    pub pheromone_exponent: f64,
    /// Draws above this value exploit the best candidate.
    pub exploit_threshold: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            heuristic_exponent: 1.0,
            pheromone_exponent: 1.0,
            exploit_threshold: DEFAULT_EXPLOIT_THRESHOLD,
        }
    }
}

/// A feasible next node and its normalised probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub node: NodeId,
    pub probability: f64,
}

/// Feasible candidates for the ant's next hop, in neighbourhood order.
pub fn feasible_candidates<P: Problem + ?Sized>(
    problem: &P,
    ant: &Ant<P::Bookkeeping>,
) -> Vec<NodeId> {
    problem
        .neighbourhood(ant)
        .into_iter()
        .filter(|&node| !ant.is_visited(node) && problem.is_valid(ant, node))
        .collect()
}

/// Compute the normalised distribution over `candidates`.
///
/// Returns a `Configuration` error when the mass is non-finite or strays
/// more than [`PROBABILITY_TOLERANCE`] from 1.0.
pub fn candidate_probabilities<P: Problem + ?Sized>(
    problem: &P,
    pheromone: &PheromoneMatrix,
    ant: &Ant<P::Bookkeeping>,
    candidates: &[NodeId],
    params: &SelectionParams,
) -> Result<Vec<Candidate>> {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|&node| {
            let heuristic = problem.heuristic(ant, node);
            let trail = problem.pheromone_value(pheromone, ant, Some(node));
            heuristic.powf(params.heuristic_exponent) * trail.powf(params.pheromone_exponent)
        })
        .collect();

    let denominator = weights.iter().fold(DENOMINATOR_FLOOR, |acc, w| acc + w);

    let distribution: Vec<Candidate> = candidates
        .iter()
        .zip(&weights)
        .map(|(&node, &w)| Candidate {
            node,
            probability: w / denominator,
        })
        .collect();

    let total: f64 = distribution.iter().map(|c| c.probability).sum();
    if !total.is_finite() || (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(FormicaError::configuration(format!(
            "The sum of probabilities for the possible components is {}. \
             We expect this value to be closer to 1.",
            total
        )));
    }

    Ok(distribution)
}

/// Weighted-random pick: first candidate whose cumulative mass reaches the draw.
pub fn roulette_wheel<R: Rng + ?Sized>(distribution: &[Candidate], rng: &mut R) -> Option<NodeId> {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for candidate in distribution {
        cumulative += candidate.probability;
        if cumulative >= draw {
            return Some(candidate.node);
        }
    }
    // Rounding can leave the total a hair below the draw.
    distribution.last().map(|c| c.node)
}

/// Exploit the most probable candidate when the draw exceeds the
/// threshold, otherwise explore uniformly (ignoring weights).
pub fn pseudo_random_proportional<R: Rng + ?Sized>(
    distribution: &[Candidate],
    exploit_threshold: f64,
    rng: &mut R,
) -> Option<NodeId> {
    if distribution.is_empty() {
        return None;
    }
    let draw: f64 = rng.gen();
    if draw > exploit_threshold {
        most_probable(distribution)
    } else {
        let index = rng.gen_range(0..distribution.len());
        Some(distribution[index].node)
    }
}

/// Highest-probability candidate; the earliest one wins ties.
pub fn most_probable(distribution: &[Candidate]) -> Option<NodeId> {
    let mut best: Option<&Candidate> = None;
    for candidate in distribution {
        match best {
            Some(b) if candidate.probability <= b.probability => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| c.node)
}

/// Advance the ant by one hop. Returns whether a node was chosen.
pub fn select_next<P, R>(
    problem: &P,
    pheromone: &PheromoneMatrix,
    ant: &mut Ant<P::Bookkeeping>,
    params: &SelectionParams,
    rng: &mut R,
) -> Result<bool>
where
    P: Problem + ?Sized,
    R: Rng + ?Sized,
{
    if ant.position() == 0 {
        ant.visit(problem, problem.initial_node());
        return Ok(true);
    }

    let candidates = feasible_candidates(problem, ant);
    if candidates.is_empty() {
        return match problem.empty_candidates() {
            EmptyCandidates::MarkInvalid => {
                ant.mark_invalid();
                Ok(false)
            }
            EmptyCandidates::Fail => Err(FormicaError::solution_construction(format!(
                "{}: no suitable components to add from position {} (previous component {}); partial solution {:?}",
                problem.name(),
                ant.position() - 1,
                ant.last().map_or_else(|| "none".to_string(), |n| n.to_string()),
                ant.solution()
            ))),
        };
    }

    let distribution = candidate_probabilities(problem, pheromone, ant, &candidates, params)?;
    let choice = match problem.selection_rule() {
        SelectionRule::RouletteWheel => roulette_wheel(&distribution, rng),
        SelectionRule::PseudoRandomProportional => {
            pseudo_random_proportional(&distribution, params.exploit_threshold, rng)
        }
    };

    match choice {
        Some(node) => {
            ant.visit(problem, node);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Drive a cleared ant until it is `Ready` or `Invalid`.
pub fn construct_solution<P, R>(
    problem: &P,
    pheromone: &PheromoneMatrix,
    ant: &mut Ant<P::Bookkeeping>,
    params: &SelectionParams,
    rng: &mut R,
) -> Result<()>
where
    P: Problem + ?Sized,
    R: Rng + ?Sized,
{
    while !ant.is_solution_ready(problem) {
        if !select_next(problem, pheromone, ant, params, rng)? && !ant.is_invalid() {
            return Err(FormicaError::configuration(format!(
                "{}: selection policy made no choice at position {}",
                problem.name(),
                ant.position()
            )));
        }
    }
    Ok(())
}
