use earclip::{deviation, flatten, utils3d::project3d_to_2d, Earcut, Flattened};
use std::fs;

fn load_fixture(name: &str, num_triangles: usize, expected_deviation: f64) {
    // load JSON
    type Coords = Vec<Vec<[f64; 2]>>;
    let s = fs::read_to_string("./tests/fixtures/".to_string() + name + ".json").unwrap();
    let rings = serde_json::from_str::<Coords>(&s).unwrap();
    let flat: Flattened<f64> = flatten(&rings).unwrap();

    // earcut
    let mut triangles: Vec<usize> = vec![];
    let mut earcut = Earcut::new();
    for _ in 0..500 {
        earcut
            .earcut(&flat.vertices, &flat.hole_indices, flat.dim, &mut triangles)
            .unwrap();
    }

    // check
    assert!(triangles.len() == num_triangles * 3);
    let d = deviation(&flat.vertices, &flat.hole_indices, flat.dim, &triangles).unwrap();
    assert!(d <= expected_deviation);
    println!("{name}: {} triangles, {:?}", num_triangles, earcut.stats());
}

fn roof() {
    // a tilted roof face with a skylight
    let vertices = [
        [0.0, 0.0, 0.0],
        [8.0, 0.0, 0.0],
        [8.0, 6.0, 4.5],
        [0.0, 6.0, 4.5],
        [2.0, 2.0, 1.5],
        [2.0, 4.0, 3.0],
        [4.0, 4.0, 3.0],
        [4.0, 2.0, 1.5],
    ];
    let mut projected = vec![];
    project3d_to_2d(&vertices, 4, &mut projected).unwrap();
    let data: Vec<f64> = projected.iter().flatten().copied().collect();

    let triangles: Vec<u32> = earclip::earcut(&data, &[4], 2).unwrap();
    println!("roof: {:?}", triangles);
}

fn main() {
    load_fixture("spiral", 238, 1e-13);
    roof();
}
