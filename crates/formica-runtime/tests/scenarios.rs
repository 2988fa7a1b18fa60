//! End-to-end solves of the reference scenarios.

use formica_core::prelude::*;
use formica_runtime::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn line_of_four() -> RoutingEnvironment<StaticDirectory> {
    let nodes = (0..4).map(|i| NodeProfile::new(i, 1.0)).collect();
    let links = [Link::new(0, 1, 5.0), Link::new(1, 2, 5.0), Link::new(2, 3, 5.0)];
    let directory = StaticDirectory::new(nodes, &links).unwrap();
    RoutingEnvironment::new(directory, RouteRequest::new(0, 3, 3)).unwrap()
}

#[test]
fn routing_line_of_four() {
    let env = line_of_four();
    let solver = Solver::new(AcoConfig::routing().with_agents(10).with_iterations(10)).unwrap();
    for seed in [1, 2, 3] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = solver.solve_with_rng(&env, &mut rng).unwrap();
        assert_eq!(report.best.nodes, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(report.best.cost, 15.0);
    }
}

#[test]
fn routing_line_of_four_is_stable_for_a_seed() {
    let env = line_of_four();
    let solver = Solver::new(AcoConfig::routing().with_agents(5).with_iterations(5).with_seed(11)).unwrap();
    let a = solver.solve(&env).unwrap();
    let b = solver.solve(&env).unwrap();
    assert_eq!(a.best, b.best);
    // 3 sampled latencies of 5 each.
    assert!((a.initial_pheromone.unwrap() - 0.2).abs() < 1e-12);
}

/// Three nodes of capacity 4, 8 and 16. The 8 sits on the track start,
/// so it initiates; only the 16 can take the second module.
fn capacity_ladder(initial: InitialNode) -> PlacementEnvironment<StaticDirectory, SampledTrack> {
    let nodes = vec![
        NodeProfile::new(0, 4.0).with_power(1.0).at(GeoPosition::new(0.0, 0.01)),
        NodeProfile::new(1, 8.0).with_power(1.0).at(GeoPosition::new(0.0, 0.0)),
        NodeProfile::new(2, 16.0).with_power(1.0).at(GeoPosition::new(0.0, 0.02)),
    ];
    let links = [Link::new(0, 1, 1.0), Link::new(1, 2, 2.0), Link::new(0, 2, 1.0)];
    let directory = StaticDirectory::new(nodes, &links).unwrap();
    let track = SampledTrack::new(vec![
        TrackSample { time: 0.0, position: GeoPosition::new(0.0, 0.0) },
        TrackSample { time: 100.0, position: GeoPosition::new(0.1, 0.1) },
    ])
    .unwrap();
    let modules = vec![
        Module::new("client", 0.0),
        Module::new("m1", 5.0),
        Module::new("m2", 10.0),
    ];
    PlacementEnvironment::new(directory, track, modules, initial).unwrap()
}

#[test]
fn placement_capacity_ladder() {
    for initial in [InitialNode::NearestToTrackStart, InitialNode::Fixed(NodeId(1))] {
        let env = capacity_ladder(initial);
        let solver = Solver::new(AcoConfig::placement().with_seed(5)).unwrap();
        let report = solver.solve(&env).unwrap();

        assert_eq!(report.best.nodes, vec![NodeId(1), NodeId(2)]);
        // latency 1 → 2 plus node 2's power.
        assert_eq!(report.best.cost, 3.0);

        let outcome = env.outcome(&report.best.nodes);
        assert!(!outcome.assignment.contains_key(&NodeId(0)));
        assert_eq!(outcome.assignment.get(&NodeId(2)).map(String::as_str), Some("m2"));
        assert_eq!(outcome.assignment.get(&NodeId(1)).map(String::as_str), Some("m1"));
    }
}

#[test]
fn placement_without_capable_successor_fails() {
    let nodes = vec![
        NodeProfile::new(0, 8.0).at(GeoPosition::new(0.0, 0.0)),
        NodeProfile::new(1, 9.0).at(GeoPosition::new(0.0, 0.01)),
    ];
    let directory = StaticDirectory::new(nodes, &[Link::new(0, 1, 1.0)]).unwrap();
    let track = SampledTrack::stationary(GeoPosition::new(0.0, 0.0));
    let modules = vec![
        Module::new("client", 0.0),
        Module::new("m1", 5.0),
        Module::new("m2", 10.0),
    ];
    let env = PlacementEnvironment::new(directory, track, modules, InitialNode::Fixed(NodeId(0))).unwrap();
    let err = Solver::new(AcoConfig::placement().with_seed(1))
        .unwrap()
        .solve(&env)
        .unwrap_err();
    assert!(err.is_solution_construction());
}

/// 0 → 1 is a dead end; 0 → 2 → 3 reaches the end node.
fn dead_end() -> RoutingEnvironment<StaticDirectory> {
    let nodes = (0..4).map(|i| NodeProfile::new(i, 1.0)).collect();
    let links = [
        Link::directed(0, 1, 1.0),
        Link::directed(0, 2, 1.0),
        Link::directed(2, 3, 1.0),
    ];
    let directory = StaticDirectory::new(nodes, &links).unwrap();
    RoutingEnvironment::new(directory, RouteRequest::new(0, 3, 2)).unwrap()
}

#[test]
fn invalid_ants_are_never_best() {
    let env = dead_end();
    let solver = Solver::new(
        AcoConfig::routing()
            .with_agents(20)
            .with_iterations(5)
            .with_initial_pheromone(1.0)
            .with_seed(4),
    )
    .unwrap();
    let report = solver.solve(&env).unwrap();

    assert_eq!(report.best.nodes, vec![NodeId(0), NodeId(2), NodeId(3)]);
    assert_eq!(report.best.cost, 2.0);
    let invalid: usize = report.iterations.iter().map(|s| s.invalid_agents).sum();
    assert!(invalid > 0);
    for stats in &report.iterations {
        assert_eq!(stats.valid_agents + stats.invalid_agents, 20);
        assert!(stats.best_cost < f64::MAX);
    }
}

#[test]
fn dead_end_ant_costs_the_maximum() {
    let env = dead_end();
    let trail = env.create_pheromone_matrix(Some(1.0)).unwrap();
    let mut ant = Ant::new(());
    ant.visit(&env, NodeId(0));
    ant.visit(&env, NodeId(1));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let chose = select_next(&env, &trail, &mut ant, &SelectionParams::default(), &mut rng).unwrap();
    assert!(!chose);
    assert_eq!(ant.state(), AntState::Invalid);
    assert_eq!(ant.solution_cost(&env), f64::MAX);
}

#[test]
fn scenario_file_round_trip_solves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("example.json");
    Scenario::example().save(&path).unwrap();

    let scenario = Scenario::load(&path).unwrap();
    let solver = Solver::new(AcoConfig::routing().with_agents(10).with_iterations(10).with_seed(2)).unwrap();
    let report = solver.solve(&scenario.routing_environment().unwrap()).unwrap();
    assert!(report.best.is_found());
    assert_eq!(report.best.nodes.first(), Some(&NodeId(0)));
    assert_eq!(report.best.nodes.last(), Some(&NodeId(3)));
}
