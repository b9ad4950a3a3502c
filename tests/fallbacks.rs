use earclip::{deviation, Earcut, Stats};

fn run(data: &[f64], hole_indices: &[u32]) -> (Vec<u32>, Stats) {
    let mut earcut = Earcut::new();
    let mut triangles = vec![];
    earcut.earcut(data, hole_indices, 2, &mut triangles).unwrap();
    (triangles, earcut.stats())
}

#[test]
fn test_simple_polygon_needs_no_fallback() {
    let (triangles, stats) = run(&[0.0, 0.0, 4.0, 2.0, 0.0, 4.0, 1.0, 2.0], &[]);
    assert_eq!(triangles.len(), 2 * 3);
    assert_eq!(stats, Stats::default());
}

#[test]
fn test_filter_pass_drops_collinear_point() {
    let (triangles, stats) = run(&[0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0], &[]);
    assert_eq!(triangles, vec![3, 4, 0, 3, 0, 2]);
    assert_eq!(
        stats,
        Stats {
            filter_retries: 1,
            ..Stats::default()
        }
    );
}

#[test]
fn test_cure_local_intersection() {
    // edges 0-1 and 2-3 cross next to vertex 1
    let data = [4.0, 3.0, 0.0, 5.0, 1.0, 0.0, 6.0, 4.0, 2.0, 2.0, 4.0, 4.0];
    let (triangles, stats) = run(&data, &[]);
    assert_eq!(triangles, vec![4, 5, 1, 4, 1, 2, 2, 3, 4]);
    assert_eq!(stats.filter_retries, 1);
    assert_eq!(stats.cured_intersections, 1);
    assert_eq!(stats.splits, 0);
    assert_eq!(stats.abandoned, 0);
    assert!(deviation(&data, &[], 2, &triangles).unwrap() > 0.0);
}

#[test]
fn test_split_at_pinched_vertex() {
    // two lobes sharing the point (4, 1)
    let data = [4.0, 1.0, 3.0, 6.0, 6.0, 0.0, 4.0, 1.0, 4.0, 0.0, 1.0, 5.0];
    let (triangles, stats) = run(&data, &[]);
    assert_eq!(triangles, vec![2, 1, 3, 5, 4, 0]);
    assert_eq!(stats.splits, 1);
    assert_eq!(stats.cured_intersections, 0);
    assert_eq!(stats.abandoned, 0);
    assert_eq!(deviation(&data, &[], 2, &triangles), Ok(0.0));
}

#[test]
fn test_fragment_without_diagonal_is_abandoned() {
    let data = [4.0, 4.0, 6.0, 0.0, 3.0, 5.0, 4.0, 2.0, 4.0, 2.0];
    let (triangles, stats) = run(&data, &[]);
    assert_eq!(triangles, vec![2, 1, 0]);
    assert_eq!(stats.abandoned, 1);
    assert_eq!(stats.splits, 0);
}

#[test]
fn test_hole_outside_is_skipped() {
    let data = [
        10.0, 10.0, 20.0, 10.0, 20.0, 20.0, 10.0, 20.0, //
        0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0,
    ];
    let (triangles, stats) = run(&data, &[4]);
    assert_eq!(triangles, vec![2, 3, 0, 0, 1, 2]);
    assert_eq!(stats.holes, 1);
    assert_eq!(stats.unbridged, 1);
}

#[test]
fn test_hole_outside_does_not_block_others() {
    let data = [
        10.0, 10.0, 20.0, 10.0, 20.0, 20.0, 10.0, 20.0, //
        0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0, //
        12.0, 12.0, 12.0, 14.0, 14.0, 14.0, 14.0, 12.0,
    ];
    let (triangles, stats) = run(&data, &[4, 8]);
    assert_eq!(triangles.len(), 8 * 3);
    assert!(triangles.iter().all(|&i| !(4..8).contains(&i)));
    assert_eq!(stats.holes, 2);
    assert_eq!(stats.unbridged, 1);
}

#[test]
fn test_degenerate_rings_emit_nothing() {
    for data in [
        vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0],
        vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0],
        vec![5.0; 12],
    ] {
        let (triangles, stats) = run(&data, &[]);
        assert!(triangles.is_empty(), "{data:?}");
        assert_eq!(stats.cured_intersections, 0);
        assert_eq!(deviation(&data, &[], 2, &triangles), Ok(0.0));
    }
}

#[test]
fn test_stats_reset_between_calls() {
    let mut earcut = Earcut::new();
    let mut triangles: Vec<u32> = vec![];
    let twisted = [4.0, 3.0, 0.0, 5.0, 1.0, 0.0, 6.0, 4.0, 2.0, 2.0, 4.0, 4.0];
    earcut.earcut(&twisted, &[], 2, &mut triangles).unwrap();
    assert_eq!(earcut.stats().cured_intersections, 1);

    let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    earcut.earcut(&square, &[], 2, &mut triangles).unwrap();
    assert_eq!(earcut.stats(), Stats::default());
}
