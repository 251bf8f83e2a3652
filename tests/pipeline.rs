use std::collections::HashMap;
use std::f64::consts::SQRT_2;

use skel2vec::simplify::simplify;
use skel2vec::{
    vectorize, CornerConfig, EdgeKind, Pixel, Recovery, SearchConfig, Skeleton, Strategy, VectorizeConfig,
    Vectorization, VertexKind,
};

fn run(art: &str, config: &VectorizeConfig) -> (Skeleton, Vectorization) {
    let skel = Skeleton::from_ascii(art).expect("valid grid");
    let result = vectorize(&skel, config).expect("vectorize");
    (skel, result)
}

const T_SHAPE: &str = r#"
    .......
    .#####.
    ...#...
    ...#...
    ...#...
"#;

const RING: &str = r#"
    .........
    ...###...
    ..#...#..
    .#.....#.
    .#.....#.
    .#.....#.
    ..#...#..
    ...###...
    .........
"#;

const LOLLIPOP: &str = r#"
    .###.
    .#.#.
    .###.
    ..#..
    ..#..
"#;

const SAMPLER: &str = r#"
    ..............
    .#####...###..
    ...#....#...#.
    ...#....#...#.
    ...#.....###..
    ..............
    .#.......#....
    ..#......#....
    ...#.....#####
    ..............
    ......#.......
"#;

#[test]
fn t_shape_is_three_linked_edges() {
    let (_, result) = run(T_SHAPE, &VectorizeConfig::default());

    assert_eq!(result.vertices.len(), 4);
    let ends = result.vertices.iter().filter(|v| v.kind == VertexKind::End).count();
    let branches = result.vertices.iter().filter(|v| v.kind == VertexKind::Branch).count();
    assert_eq!((ends, branches), (3, 1));

    assert_eq!(result.edges.len(), 3);
    assert!(result.edges.iter().all(|e| e.kind == EdgeKind::Linked));
    assert!(!result
        .recoveries
        .iter()
        .any(|r| matches!(r, Recovery::AmbiguousConnectivity { .. })));
}

#[test]
fn ring_becomes_a_closed_circuit_of_corner_arcs() {
    let (_, result) = run(RING, &VectorizeConfig::default());

    let corners = result.vertices.len();
    assert!(corners >= 3, "got {corners} corners");
    assert!(result.vertices.iter().all(|v| v.kind == VertexKind::Corner));
    assert!(matches!(
        result.recoveries.first(),
        Some(Recovery::VertexlessLoop { component: 0, .. })
    ));

    // One arc per corner-to-corner stretch, and each corner closes two arcs.
    assert_eq!(result.edges.len(), corners);
    assert_eq!(result.polylines.len(), corners);
    let mut uses: HashMap<usize, usize> = HashMap::new();
    for edge in &result.edges {
        assert_ne!(edge.a, edge.b);
        *uses.entry(edge.a).or_default() += 1;
        *uses.entry(edge.b).or_default() += 1;
    }
    assert!(uses.values().all(|&n| n == 2), "{uses:?}");
}

#[test]
fn lollipop_has_a_loop_edge_on_its_branch() {
    let (_, result) = run(LOLLIPOP, &VectorizeConfig::default());

    let loops: Vec<_> = result.edges.iter().filter(|e| e.kind == EdgeKind::Loop).collect();
    assert_eq!(loops.len(), 1);
    let branch = &result.vertices[loops[0].a];
    assert_eq!(branch.kind, VertexKind::Branch);
    assert_eq!(branch.pixel, Pixel::new(2, 2));

    let path = &result.paths[loops[0].id];
    assert!(path.is_closed());
    assert_eq!(path.points.len(), 9);
    assert_eq!(path.strategy, Strategy::Exact);

    let poly = &result.polylines[loops[0].id];
    assert!(poly.is_closed());
    assert_eq!(poly.points.first(), Some(&Pixel::new(2, 2)));
}

#[test]
fn cornerless_ring_is_one_anchored_loop() {
    let config = VectorizeConfig {
        corner: CornerConfig {
            sensitivity: 4.0,
            min_corners: 0,
            ..CornerConfig::default()
        },
        ..VectorizeConfig::default()
    };
    let (_, result) = run(
        r#"
            .###.
            #...#
            #...#
            .###.
        "#,
        &config,
    );

    assert_eq!(result.vertices.len(), 1);
    assert_eq!(result.vertices[0].kind, VertexKind::Anchor);
    assert_eq!(result.vertices[0].pixel, Pixel::new(0, 1));
    assert!(result
        .recoveries
        .contains(&Recovery::VertexlessLoop { component: 0, corners: 0 }));

    assert_eq!(result.edges.len(), 1);
    assert_eq!(result.edges[0].kind, EdgeKind::Loop);
    assert!(result.paths[0].is_closed());
    assert_eq!(result.paths[0].points.len(), 11);
    assert!(result.polylines[0].is_closed());
    assert_eq!(result.polylines[0].points.first(), Some(&Pixel::new(0, 1)));
}

#[test]
fn colinear_run_takes_the_axis_sort_and_simplifies_to_its_ends() {
    let config = VectorizeConfig {
        smoothness: 0.01,
        ..VectorizeConfig::default()
    };
    let (_, result) = run("##########", &config);

    assert_eq!(result.edges.len(), 1);
    assert_eq!(result.paths[0].strategy, Strategy::Degenerate);
    assert_eq!(result.paths[0].points.len(), 10);
    assert!(result
        .recoveries
        .contains(&Recovery::DegenerateGeometry { edge: 0 }));
    assert_eq!(
        result.polylines[0].points,
        vec![Pixel::new(0, 0), Pixel::new(0, 9)]
    );
}

#[test]
fn zero_smoothness_returns_the_ordered_paths() {
    let config = VectorizeConfig {
        smoothness: 0.0,
        ..VectorizeConfig::default()
    };
    let (_, result) = run(SAMPLER, &config);
    for (path, poly) in result.paths.iter().zip(&result.polylines) {
        assert_eq!(path.points, poly.points);
    }
}

#[test]
fn every_foreground_pixel_is_covered_once() {
    let (skel, result) = run(SAMPLER, &VectorizeConfig::default());

    let vertex_pixels: Vec<Pixel> = result.vertices.iter().map(|v| v.pixel).collect();
    let mut seen: HashMap<Pixel, usize> = HashMap::new();
    for edge in &result.edges {
        for &p in edge.interior() {
            *seen.entry(p).or_default() += 1;
        }
    }

    for p in skel.foreground() {
        if vertex_pixels.contains(&p) {
            assert!(
                result.edges.iter().any(|e| e.chain.contains(&p)),
                "vertex {p:?} is in no edge"
            );
            assert!(!seen.contains_key(&p));
        } else {
            assert_eq!(seen.get(&p), Some(&1), "link pixel {p:?}");
        }
    }
}

fn assert_unit_steps(result: &Vectorization) {
    for (edge, path) in result.edges.iter().zip(&result.paths) {
        assert_eq!(path.points.len(), edge.chain.len());
        assert_eq!(path.points.first(), edge.chain.first());
        assert_eq!(path.points.last(), edge.chain.last());
        for w in path.points.windows(2) {
            assert!(
                w[0].distance(w[1]) <= SQRT_2 + 1e-9,
                "edge {} ({:?}): {:?} -> {:?}",
                edge.id,
                path.strategy,
                w[0],
                w[1]
            );
        }
    }
}

#[test]
fn ordered_paths_step_between_adjacent_pixels() {
    let (_, result) = run(SAMPLER, &VectorizeConfig::default());
    assert_unit_steps(&result);
}

#[test]
fn heuristic_paths_step_between_adjacent_pixels() {
    let config = VectorizeConfig {
        search: SearchConfig {
            max_steps: 1,
            ..SearchConfig::default()
        },
        ..VectorizeConfig::default()
    };
    let (_, result) = run(SAMPLER, &config);
    assert!(result
        .paths
        .iter()
        .any(|p| matches!(p.strategy, Strategy::Heuristic { .. })));
    assert_unit_steps(&result);
}

#[test]
fn simplified_polylines_are_stable() {
    let config = VectorizeConfig {
        smoothness: 0.7,
        ..VectorizeConfig::default()
    };
    let (_, result) = run(SAMPLER, &config);
    for poly in &result.polylines {
        assert_eq!(simplify(&poly.points, config.smoothness), poly.points);
    }
}

#[test]
fn isolated_pixel_becomes_a_point_polyline() {
    let (_, result) = run(SAMPLER, &VectorizeConfig::default());
    let isolated = result
        .vertices
        .iter()
        .find(|v| v.kind == VertexKind::Isolated)
        .expect("isolated vertex");
    assert_eq!(isolated.pixel, Pixel::new(10, 6));
    let poly = result
        .polylines
        .iter()
        .find(|p| p.points.first() == Some(&isolated.pixel))
        .expect("polyline for the isolated pixel");
    assert_eq!(poly.points, vec![isolated.pixel, isolated.pixel]);
}

#[test]
fn exhausted_search_falls_back_and_is_reported() {
    let config = VectorizeConfig {
        search: SearchConfig {
            max_steps: 1,
            ..SearchConfig::default()
        },
        ..VectorizeConfig::default()
    };
    let (_, result) = run(
        r#"
            #####
            ....#
            ....#
        "#,
        &config,
    );

    assert_eq!(result.edges.len(), 1);
    assert_eq!(
        result.paths[0].strategy,
        Strategy::Heuristic {
            budget_exceeded: true
        }
    );
    assert!(result
        .recoveries
        .contains(&Recovery::SearchBudgetExceeded { edge: 0 }));
    assert_eq!(
        result.paths[0].points,
        vec![
            Pixel::new(0, 0),
            Pixel::new(0, 1),
            Pixel::new(0, 2),
            Pixel::new(0, 3),
            Pixel::new(0, 4),
            Pixel::new(1, 4),
            Pixel::new(2, 4)
        ]
    );
}

#[test]
fn reruns_are_reproducible() {
    let config = VectorizeConfig::default();
    let (_, a) = run(SAMPLER, &config);
    let (_, b) = run(SAMPLER, &config);
    assert_eq!(a.edges, b.edges);
    assert_eq!(a.polylines, b.polylines);
    assert_eq!(a.recoveries, b.recoveries);
}
