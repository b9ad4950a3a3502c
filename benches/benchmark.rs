use std::fs;

use criterion::{criterion_group, criterion_main, Criterion};

use earclip::{flatten, Earcut, Flattened};

fn load_fixture(name: &str) -> Flattened<f64> {
    // load JSON
    type Coords = Vec<Vec<[f64; 2]>>;
    let s = fs::read_to_string("./tests/fixtures/".to_string() + name + ".json").unwrap();
    let rings = serde_json::from_str::<Coords>(&s).unwrap();
    flatten(&rings).unwrap()
}

fn bench(c: &mut Criterion) {
    let mut earcut = Earcut::new();
    let mut triangles: Vec<u32> = Vec::new();

    for name in [
        "building",
        "star",
        "donut",
        "grid-holes",
        "comb",
        "collinear",
        "spiral",
    ] {
        let flat = load_fixture(name);
        let hole_indices: Vec<u32> = flat.hole_indices.iter().map(|&i| i as u32).collect();
        c.bench_function(name, |b| {
            b.iter(|| {
                earcut
                    .earcut(&flat.vertices, &hole_indices, flat.dim, &mut triangles)
                    .unwrap();
            })
        });
    }

    c.bench_function("spiral-stride3", |b| {
        let flat = load_fixture("spiral");
        let data: Vec<f64> = flat
            .vertices
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[1], 0.0])
            .collect();
        b.iter(|| {
            earcut.earcut(&data, &[], 3, &mut triangles).unwrap();
            assert_eq!(triangles.len(), 238 * 3)
        })
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
