//! The four-seed Hamming landscape, end to end.

use u_landscape::interpolation::InterpolationMethod;
use u_landscape::metric::Metric;
use u_landscape::numeric::{int_point, Number, Point};
use u_landscape::problem::{Codomain, Domain, SeededMetricProblem};
use u_landscape::random::create_rng;
use u_landscape::tree::{EdgeSelector, SpanningTreeBuilder, TreeFitnessAssigner, VertexSelector};

fn seeds() -> Vec<Point> {
    vec![
        int_point(&[0, 0, 0]),
        int_point(&[1, 0, 0]),
        int_point(&[1, 1, 0]),
        int_point(&[1, 1, 1]),
    ]
}

#[test]
fn test_pairwise_weights() {
    let matrix = Metric::Hamming.create_distance_matrix(&seeds()).unwrap();
    let expected = [(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 2, 2), (1, 3, 2), (0, 3, 3)];
    for (i, j, w) in expected {
        assert_eq!(matrix[i][j], Number::Int(w));
        assert_eq!(matrix[j][i], Number::Int(w));
    }
}

#[test]
fn test_minimum_tree_is_the_path() {
    let mut rng = create_rng(42);
    let path = vec![(0, 1), (1, 2), (2, 3)];
    for builder in [
        SpanningTreeBuilder::OptimisedMin {
            metric: Metric::Hamming,
        },
        SpanningTreeBuilder::Kruskal {
            metric: Metric::Hamming,
            selector: EdgeSelector::Minimum,
        },
        SpanningTreeBuilder::Prim {
            metric: Metric::Hamming,
            selector: EdgeSelector::Minimum,
        },
    ] {
        let tree = builder.build(&seeds(), &mut rng).unwrap();
        assert_eq!(
            tree.edges().iter().copied().collect::<Vec<_>>(),
            path,
            "{}",
            builder.name()
        );
    }
}

#[test]
fn test_depth_fitness_from_vertex_zero() {
    let mut rng = create_rng(42);
    let tree = SpanningTreeBuilder::default()
        .build(&seeds(), &mut rng)
        .unwrap();
    let assigner = TreeFitnessAssigner::IntDepth {
        vertex: VertexSelector::forced(0),
    };
    let assignment = assigner.assign(&tree, false, &mut rng).unwrap();
    assert_eq!(
        assignment.fitnesses,
        vec![Number::Int(3), Number::Int(2), Number::Int(1), Number::Int(0)]
    );
    assert_eq!(assignment.optimum, 0);

    let minimised = assigner.assign(&tree, true, &mut rng).unwrap();
    assert_eq!(
        minimised.fitnesses,
        vec![Number::Int(0), Number::Int(1), Number::Int(2), Number::Int(3)]
    );
    assert_eq!(minimised.optimum, 0);
}

#[test]
fn test_problem_from_worked_example() {
    let fitnesses = vec![Number::Int(3), Number::Int(2), Number::Int(1), Number::Int(0)];
    let problem = SeededMetricProblem::new(
        Domain::Bit,
        Codomain::of_values(&fitnesses).unwrap(),
        seeds(),
        fitnesses,
        InterpolationMethod::default(),
        Metric::Hamming,
        false,
    )
    .unwrap();
    assert_eq!(problem.best_seed(), 0);

    // (0,1,0) is at distances 1, 2, 1, 2 from S0..S3.
    let value = problem.evaluate(&int_point(&[0, 1, 0])).unwrap();
    assert_eq!(value, Number::fraction(9, 5));
    assert_eq!(problem.evaluate(&seeds()[2]).unwrap(), Number::Int(1));

    let nn = SeededMetricProblem::new(
        problem.domain().clone(),
        problem.codomain().clone(),
        seeds(),
        problem.fitnesses().to_vec(),
        InterpolationMethod::NearestNeighbour,
        Metric::Hamming,
        false,
    )
    .unwrap();
    // S0 and S2 tie; the earlier seed wins.
    assert_eq!(nn.evaluate(&int_point(&[0, 1, 0])).unwrap(), Number::Int(3));

    let reloaded: SeededMetricProblem = problem.to_text().parse().unwrap();
    assert_eq!(reloaded, problem);
}

#[test]
fn test_kendall_tau_reverse() {
    let metric = Metric::kendall_tau();
    let identity = int_point(&[0, 1, 2, 3]);
    let reverse = int_point(&[3, 2, 1, 0]);
    assert!(metric.distance(&identity, &identity).unwrap().is_zero());
    assert_eq!(
        metric.distance(&identity, &reverse).unwrap(),
        Number::fraction(1, 1)
    );
    let raw = Metric::KendallTau { normalised: false };
    assert_eq!(raw.distance(&identity, &reverse).unwrap(), Number::Int(6));
}
