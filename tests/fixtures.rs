use std::{
    collections::BTreeMap,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use fs_err as fs;
use mesh_decoder::{ErrorKind, Loader, Mesh};
use walkdir::WalkDir;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_all() -> BTreeMap<String, Mesh> {
    let loader = Loader::default();
    let mut meshes = BTreeMap::new();
    for e in WalkDir::new(fixtures_dir()).into_iter().filter_map(Result::ok) {
        let path = e.path();
        if !matches!(
            path.extension().and_then(OsStr::to_str),
            Some("stl" | "STL" | "off" | "OFF")
        ) {
            continue;
        }
        eprintln!("loading {:?}", path.file_name().unwrap());
        let mesh = loader.load(path).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap().to_owned();
        meshes.insert(name, mesh);
    }
    meshes
}

#[test]
fn cubes() {
    let meshes = load_all();
    assert_eq!(meshes.len(), 4);

    for (name, mesh) in &meshes {
        assert_eq!(mesh.triangle_count(), 12, "{name}");
        let bb = mesh.bounding_box();
        assert_eq!(bb.min, [-1.; 3], "{name}");
        assert_eq!(bb.max, [1.; 3], "{name}");
        assert_eq!(mesh.bounding_sphere().radius, 3_f32.sqrt(), "{name}");
        // outward-facing unit normals
        for (tri, normals) in mesh
            .positions()
            .chunks_exact(3)
            .zip(mesh.normals().chunks_exact(3))
        {
            let centroid: Vec<f32> = (0..3)
                .map(|i| (tri[0][i] + tri[1][i] + tri[2][i]) / 3.)
                .collect();
            let outward: f32 = (0..3).map(|i| centroid[i] * normals[0][i]).sum();
            assert!(outward > 0., "{name}: {normals:?}");
        }
    }

    // both STL encodings describe the same triangles
    assert_eq!(meshes["cube.stl"], meshes["cube_binary.stl"]);
    assert!(meshes["cube.stl"].colors().is_none());
    assert!(meshes["cube.off"].colors().is_none());
    assert_eq!(
        meshes["cube.off"].positions(),
        meshes["cube_colored.off"].positions()
    );
}

#[test]
fn colored_off() {
    let meshes = load_all();
    let mesh = &meshes["cube_colored.off"];
    let colors = mesh.colors().unwrap();
    assert_eq!(colors.len(), mesh.positions().len());
    assert!(colors.iter().flatten().all(|&c| c == 0. || c == 1.));
    // first face is red, second is green
    assert_eq!(colors[..6], [[1., 0., 0.]; 6]);
    assert_eq!(colors[6..12], [[0., 1., 0.]; 6]);
}

#[test]
fn loader_dispatch() {
    let dir = fixtures_dir();
    let loader = Loader::default();

    // extension decides the format, not the content
    let bytes = fs::read(dir.join("cube.off")).unwrap();
    let e = loader.load_from_slice(&bytes, "cube.stl").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::SizeMismatch);
    assert_eq!(loader.load_from_slice(&bytes, "x/cube.OFF").unwrap().triangle_count(), 12);
    assert_eq!(loader.load_off(dir.join("cube.off")).unwrap().triangle_count(), 12);
    assert_eq!(
        loader.load_stl(dir.join("cube_binary.stl")).unwrap().triangle_count(),
        12
    );

    let e = loader.load_from_slice(&bytes, "cube.obj").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::UnsupportedFormat);
    let e = loader.load_from_slice(&bytes, "cube").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::UnsupportedFormat);

    let e = loader.load(dir.join("missing.stl")).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Io);
    assert_eq!(std::io::Error::from(e).kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn custom_reader() {
    let loader = Loader::default().custom_reader(|path| {
        assert_eq!(path, Path::new("virtual/triangle.off"));
        Ok(b"OFF 3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n".to_vec())
    });
    assert_eq!(loader.load("virtual/triangle.off").unwrap().triangle_count(), 1);

    let loader = Loader::with_custom_reader(|path| {
        let file = std::fs::File::open(path)?;
        // SAFETY: fixtures are not modified while the test runs.
        unsafe { memmap2::Mmap::map(&file) }
    });
    let mesh = loader.load(fixtures_dir().join("cube_binary.stl")).unwrap();
    assert_eq!(mesh.triangle_count(), 12);
}
