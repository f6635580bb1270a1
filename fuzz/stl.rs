/*
Run with libFuzzer:

```sh
cargo fuzz run --release --features libfuzzer stl
```

Run with AFL++:

```sh
cd fuzz
cargo afl build --release --features afl
cargo afl fuzz -i seeds/stl -o out target/release/stl
```
*/

#![cfg_attr(feature = "libfuzzer", no_main)]

use mesh_decoder::{decode_auto, stl};

#[cfg(any(
    not(any(feature = "libfuzzer", feature = "afl")),
    all(feature = "libfuzzer", feature = "afl"),
))]
compile_error!("exactly one of 'libfuzzer' or 'afl' feature must be enabled");

#[cfg(feature = "libfuzzer")]
libfuzzer_sys::fuzz_target!(|bytes: &[u8]| {
    run(bytes);
});

#[cfg(feature = "afl")]
fn main() {
    afl::fuzz!(|bytes: &[u8]| {
        run(bytes);
    });
}

fn run(bytes: &[u8]) {
    if let Ok(mesh) = decode_auto(bytes) {
        assert_eq!(mesh.positions().len(), mesh.normals().len());
        assert!(mesh.positions().iter().flatten().all(|x| x.is_finite()));
        let _ = stl::to_binary(&mesh);
    }
}
