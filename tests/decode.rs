use mesh_decoder::{stl, ErrorKind, Format, Mesh, Vec3};
use quickcheck::TestResult;

const EPS: f32 = 1e-4;

fn binary_stl(triangles: &[[Vec3; 4]]) -> Vec<u8> {
    let mut out = vec![0; 80];
    out.extend_from_slice(&u32::try_from(triangles.len()).unwrap().to_le_bytes());
    for t in triangles {
        for x in t.iter().flatten() {
            out.extend_from_slice(&x.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0]);
    }
    out
}

fn random_triangles(rng: &mut fastrand::Rng, count: usize) -> Vec<[Vec3; 4]> {
    let mut coord = || rng.f32() * 200. - 100.;
    (0..count)
        .map(|_| {
            let mut t = [[0.; 3]; 4];
            for x in t.iter_mut().flatten() {
                *x = coord();
            }
            t
        })
        .collect()
}

#[track_caller]
fn assert_invariants(mesh: &Mesh) {
    let n = mesh.positions().len();
    assert_eq!(n % 3, 0);
    assert_eq!(mesh.normals().len(), n);
    if let Some(colors) = mesh.colors() {
        assert_eq!(colors.len(), n);
        for c in colors.iter().flatten() {
            assert!((0. ..=1.).contains(c), "{c}");
        }
    }
    assert!(mesh.positions().iter().flatten().all(|x| x.is_finite()));

    let sphere = mesh.bounding_sphere();
    assert_eq!(sphere.center, [0.; 3]);
    for p in mesh.positions() {
        let d = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!(d <= sphere.radius * (1. + EPS) + EPS, "{d} > {}", sphere.radius);
    }
    let center = mesh.bounding_box().center();
    let size = mesh.bounding_box().size();
    for i in 0..3 {
        assert!(center[i].abs() <= EPS * (1. + size[i]), "{center:?}");
    }
    for normal in mesh.normals() {
        let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        assert!(len == 0. || (len - 1.).abs() < EPS, "{normal:?}");
    }
}

quickcheck::quickcheck! {
    fn binary_stl_corner_count(seed: u64, count: u8) -> TestResult {
        if count == 0 {
            return TestResult::discard();
        }
        let mut rng = fastrand::Rng::with_seed(seed);
        let bytes = binary_stl(&random_triangles(&mut rng, count.into()));
        assert_eq!(bytes.len(), 84 + 50 * usize::from(count));
        assert_eq!(stl::sniff(&bytes), Format::BinaryStl);
        let mesh = mesh_decoder::decode_auto(&bytes).unwrap();
        assert_eq!(mesh.positions().len(), 3 * usize::from(count));
        assert_invariants(&mesh);
        TestResult::passed()
    }

    fn binary_stl_round_trip(seed: u64, count: u8) -> TestResult {
        if count == 0 {
            return TestResult::discard();
        }
        let mut rng = fastrand::Rng::with_seed(seed);
        let triangles = random_triangles(&mut rng, count.into());
        let mesh = mesh_decoder::decode_auto(&binary_stl(&triangles)).unwrap();
        let again = mesh_decoder::decode_auto(&stl::to_binary(&mesh).unwrap()).unwrap();
        for (a, b) in mesh.positions().iter().zip(again.positions()) {
            for i in 0..3 {
                assert!((a[i] - b[i]).abs() <= EPS * 100., "{a:?} != {b:?}");
            }
        }
        assert_eq!(mesh.positions().len(), again.positions().len());
        TestResult::passed()
    }

    fn binary_stl_bad_size(seed: u64, count: u8, cut: u8) -> bool {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut bytes = binary_stl(&random_triangles(&mut rng, count.into()));
        if count != 0 {
            // at least two bytes short of the declared size
            let cut = 2 + usize::from(cut) % (bytes.len() - 84 - 1);
            bytes.truncate(bytes.len() - cut);
        }
        let e = stl::from_binary_slice(&bytes).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::SizeMismatch);
        true
    }

    fn off_fan_triangle_count(degree: u8) -> bool {
        let degree = usize::from(degree % 16);
        let mut text = format!("OFF\n{} 1 0\n", degree.max(1));
        for i in 0..degree.max(1) {
            let angle = i as f32;
            text += &format!("{} {} 0\n", angle.cos(), angle.sin());
        }
        text += &degree.to_string();
        for i in 0..degree {
            text += &format!(" {i}");
        }
        let mesh = mesh_decoder::decode_off(&text).unwrap();
        assert_eq!(mesh.triangle_count(), degree.saturating_sub(2));
        assert_invariants(&mesh);
        true
    }
}

#[test]
fn binary_stl_zero_triangles() {
    let e = mesh_decoder::decode_auto(&binary_stl(&[])).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::SizeMismatch);
    let msg = e.to_string();
    assert!(msg.contains("0 triangles"), "{msg}");
}

#[test]
fn off_tetrahedron_soup() {
    // 4 vertices, 6 triangular faces (two faces are listed twice).
    let text = "OFF
4 6 0
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2
3 1 2 3
3 0 1 3
3 1 2 3
";
    let mesh = mesh_decoder::decode_off(text).unwrap();
    assert_eq!(mesh.positions().len(), 18);
    assert!(mesh.colors().is_none());
    assert_invariants(&mesh);
}

#[test]
fn off_single_colored_face() {
    let text = "OFF
4 2 0
0 0 0
1 0 0
1 1 0
0 1 0
3 0 1 2 255 0 0
3 0 2 3
";
    let mesh = mesh_decoder::decode_off(text).unwrap();
    let colors = mesh.colors().unwrap();
    assert_eq!(colors.len(), mesh.positions().len());
    assert_eq!(colors[..3], [[1., 0., 0.]; 3]);
    assert_invariants(&mesh);
}

#[test]
fn off_degenerate_and_quad() {
    let text = "OFF
4 2 0
0 0 0
1 0 0
1 1 0
0 1 0
2 0 1
4 0 1 2 3
";
    let mesh = mesh_decoder::decode_off(text).unwrap();
    assert_eq!(mesh.triangle_count(), 2);
    let p = mesh.positions();
    // fan around vertex 0: (0,1,2), (0,2,3); centered at (0.5, 0.5, 0)
    assert_eq!(p[0], [-0.5, -0.5, 0.]);
    assert_eq!(p[3], [-0.5, -0.5, 0.]);
    assert_eq!(p[5], [-0.5, 0.5, 0.]);
    assert_eq!(mesh.normals(), [[0., 0., 1.]; 6]);
}

#[test]
fn ascii_stl_without_facets() {
    for text in ["", "solid", "solid empty\nendsolid empty\n", "endsolid"] {
        let mesh = stl::from_ascii_slice(text.as_bytes()).unwrap();
        assert_eq!(mesh.positions().len(), 0, "{text:?}");
        assert!(mesh.is_empty());
        assert_invariants(&mesh);
    }
    let mesh = mesh_decoder::decode_auto(b"  solid empty\nendsolid empty\n").unwrap();
    assert!(mesh.is_empty());

    // without the keyword the sniffer picks binary, which is too short
    let e = mesh_decoder::decode_auto(b"").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::TruncatedInput);
}

#[test]
fn ascii_stl_declared_normals_are_replaced() {
    let text = "solid t
facet normal 1 0 0
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid t
";
    let mesh = mesh_decoder::decode_auto(text.as_bytes()).unwrap();
    assert_eq!(mesh.normals(), [[0., 0., 1.]; 3]);
}

#[test]
fn explicit_format() {
    let text = "solid t\nendsolid t\n";
    assert!(mesh_decoder::decode(text.as_bytes(), Format::AsciiStl)
        .unwrap()
        .is_empty());
    let e = mesh_decoder::decode(text.as_bytes(), Format::BinaryStl).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::TruncatedInput);
    let e = mesh_decoder::decode(text.as_bytes(), Format::Off).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidHeader);
}

#[test]
fn parallel_decode() {
    let mut rng = fastrand::Rng::with_seed(7);
    let buffers: Vec<Vec<u8>> = (1..=8)
        .map(|n| binary_stl(&random_triangles(&mut rng, n * 10)))
        .collect();
    let sequential: Vec<Mesh> = buffers
        .iter()
        .map(|b| mesh_decoder::decode_auto(b).unwrap())
        .collect();
    let parallel: Vec<Mesh> = std::thread::scope(|s| {
        let handles: Vec<_> = buffers
            .iter()
            .map(|b| s.spawn(move || mesh_decoder::decode_auto(b).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, parallel);
}
