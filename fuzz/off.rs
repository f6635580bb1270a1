/*
Run with libFuzzer:

```sh
cargo fuzz run --release --features libfuzzer off
```

Run with AFL++:

```sh
cd fuzz
cargo afl build --release --features afl
cargo afl fuzz -i seeds/off -o out target/release/off
```
*/

#![cfg_attr(feature = "libfuzzer", no_main)]

use mesh_decoder::off::from_slice;

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
    if let Ok(mesh) = from_slice(bytes) {
        if let Some(colors) = mesh.colors() {
            assert_eq!(colors.len(), mesh.positions().len());
            assert!(colors.iter().flatten().all(|c| (0. ..=1.).contains(c)));
        }
    }
}
