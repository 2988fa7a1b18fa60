//! Colony — the pool of ants sent out every iteration.
//!
//! Ants are cleared and rebuilt each iteration against a read-only trail.
//! Every ant gets its own generator, seeded from a value the solver draws
//! from its master generator, so the outcome does not depend on whether
//! the ants are built one after another or on the rayon pool.

use formica_core::ant::Ant;
use formica_core::error::{FormicaError, Result};
use formica_core::pheromone::PheromoneMatrix;
use formica_core::problem::Problem;
use formica_core::selection::{construct_solution, SelectionParams};
use formica_core::types::NodeId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// A fixed-size pool of ants for one problem.
#[derive(Debug)]
pub struct Colony<B> {
    ants: Vec<Ant<B>>,
}

impl<B: Clone + Send + Sync + std::fmt::Debug> Colony<B> {
    /// Create `size` cleared ants.
    pub fn new<P>(problem: &P, size: usize) -> Result<Self>
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        if size == 0 {
            return Err(FormicaError::configuration("the ant colony is empty"));
        }
        Ok(Self {
            ants: (0..size).map(|_| Ant::new(problem.fresh_bookkeeping())).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.ants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ants.is_empty()
    }

    pub fn ants(&self) -> &[Ant<B>] {
        &self.ants
    }

    /// Clear every ant and drive it to `Ready` or `Invalid`.
    ///
    /// `seeds` holds one generator seed per ant.
    pub fn build<P>(
        &mut self,
        problem: &P,
        pheromone: &PheromoneMatrix,
        params: &SelectionParams,
        seeds: &[u64],
        parallel: bool,
    ) -> Result<()>
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        if seeds.len() != self.ants.len() {
            return Err(FormicaError::configuration(format!(
                "{} seeds for {} ants",
                seeds.len(),
                self.ants.len()
            )));
        }

        let build_one = |ant: &mut Ant<B>, seed: u64| -> Result<()> {
            ant.clear(problem.fresh_bookkeeping());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            construct_solution(problem, pheromone, ant, params, &mut rng)
        };

        if parallel {
            self.ants
                .par_iter_mut()
                .zip(seeds.par_iter())
                .try_for_each(|(ant, &seed)| build_one(ant, seed))
        } else {
            self.ants
                .iter_mut()
                .zip(seeds)
                .try_for_each(|(ant, &seed)| build_one(ant, seed))
        }
    }

    /// Costs of the valid ants, in pool order.
    pub fn valid_costs<P>(&self, problem: &P) -> Vec<f64>
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        self.ants
            .iter()
            .filter(|a| !a.is_invalid())
            .map(|a| a.solution_cost(problem))
            .collect()
    }

    /// Cheapest valid solution of this iteration; the earliest ant wins ties.
    pub fn iteration_best<P>(&self, problem: &P) -> Option<(Vec<NodeId>, f64)>
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        let mut best: Option<(&Ant<B>, f64)> = None;
        for ant in self.ants.iter().filter(|a| !a.is_invalid()) {
            let cost = ant.solution_cost(problem);
            match best {
                Some((_, c)) if cost >= c => {}
                _ => best = Some((ant, cost)),
            }
        }
        best.map(|(ant, cost)| (ant.solution().to_vec(), cost))
    }

    pub fn invalid_count(&self) -> usize {
        self.ants.iter().filter(|a| a.is_invalid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory_impl::{Link, StaticDirectory};
    use crate::routing::{RouteRequest, RoutingEnvironment};
    use formica_core::types::NodeProfile;

    fn diamond() -> RoutingEnvironment<StaticDirectory> {
        let nodes = (0..4).map(|i| NodeProfile::new(i, 1.0)).collect();
        let links = [
            Link::new(0, 1, 1.0),
            Link::new(0, 2, 3.0),
            Link::new(1, 3, 1.0),
            Link::new(2, 3, 3.0),
        ];
        RoutingEnvironment::new(StaticDirectory::new(nodes, &links).unwrap(), RouteRequest::new(0, 3, 2))
            .unwrap()
    }

    #[test]
    fn empty_colony_is_a_configuration_error() {
        let env = diamond();
        assert!(Colony::new(&env, 0).unwrap_err().is_configuration());
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let env = diamond();
        let trail = env.create_pheromone_matrix(Some(1.0)).unwrap();
        let params = SelectionParams::default();
        let seeds: Vec<u64> = (0..16).collect();

        let mut seq = Colony::new(&env, 16).unwrap();
        seq.build(&env, &trail, &params, &seeds, false).unwrap();
        let mut par = Colony::new(&env, 16).unwrap();
        par.build(&env, &trail, &params, &seeds, true).unwrap();

        let a: Vec<_> = seq.ants().iter().map(|a| a.solution().to_vec()).collect();
        let b: Vec<_> = par.ants().iter().map(|a| a.solution().to_vec()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn iteration_best_picks_cheapest_valid() {
        let env = diamond();
        let trail = env.create_pheromone_matrix(Some(1.0)).unwrap();
        let mut colony = Colony::new(&env, 32).unwrap();
        let seeds: Vec<u64> = (100..132).collect();
        colony.build(&env, &trail, &SelectionParams::default(), &seeds, false).unwrap();
        let (nodes, cost) = colony.iteration_best(&env).unwrap();
        let min = colony.valid_costs(&env).into_iter().fold(f64::MAX, f64::min);
        assert_eq!(cost, min);

        // Several ants find the cheap branch; the earliest one is reported.
        let first = colony
            .ants()
            .iter()
            .find(|a| !a.is_invalid() && a.solution_cost(&env) == min)
            .unwrap();
        assert_eq!(nodes, first.solution());
        let cheapest = colony.valid_costs(&env).iter().filter(|&&c| c == min).count();
        assert!(cheapest > 1);
    }

    #[test]
    fn invalid_ants_have_no_valid_cost() {
        let nodes = (0..3).map(|i| NodeProfile::new(i, 1.0)).collect();
        let links = [Link::new(0, 1, 1.0)];
        let env = RoutingEnvironment::new(StaticDirectory::new(nodes, &links).unwrap(), RouteRequest::new(0, 2, 2))
            .unwrap();
        let trail = env.create_pheromone_matrix(Some(1.0)).unwrap();
        let mut colony = Colony::new(&env, 4).unwrap();
        colony.build(&env, &trail, &SelectionParams::default(), &[1, 2, 3, 4], false).unwrap();
        assert_eq!(colony.invalid_count(), 4);
        assert!(colony.valid_costs(&env).is_empty());
        assert!(colony.iteration_best(&env).is_none());
    }

    #[test]
    fn seed_count_must_match() {
        let env = diamond();
        let trail = env.create_pheromone_matrix(Some(1.0)).unwrap();
        let mut colony = Colony::new(&env, 2).unwrap();
        assert!(colony.build(&env, &trail, &SelectionParams::default(), &[1], false).is_err());
    }
}
