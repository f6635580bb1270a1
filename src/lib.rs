//! Decodes ASCII STL, binary STL and OFF/COFF into one normalized triangle soup.
//!
//! ```
//! let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
//! let mesh = mesh_decoder::decode_off(text)?;
//! assert_eq!(mesh.positions().len(), 3);
//! assert_eq!(mesh.normals()[0], [0., 0., 1.]);
//! assert!(mesh.colors().is_none());
//! # Ok::<(), mesh_decoder::Error>(())
//! ```

#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    single_use_lifetimes,
    unreachable_pub
)]
#![warn(clippy::exhaustive_enums, clippy::exhaustive_structs)]

mod error;
pub use error::{Error, ErrorKind, Location, Result};

mod utils;

mod common;
pub use common::*;

mod format;
pub use format::Format;

mod loader;
pub use loader::Loader;

mod normalize;

#[cfg(feature = "off")]
pub mod off;
#[cfg(feature = "stl")]
pub mod stl;

/// Decodes STL, detecting ASCII or binary with [`stl::sniff`].
#[cfg(feature = "stl")]
pub fn decode_auto(bytes: &[u8]) -> Result<Mesh> {
    stl::from_slice(bytes)
}

/// Decodes OFF/COFF text. The format is never sniffed; callers select it,
/// typically from a `.off` file extension.
#[cfg(feature = "off")]
pub fn decode_off(text: &str) -> Result<Mesh> {
    off::from_str(text)
}

/// Decodes `bytes` as the given format, without sniffing.
pub fn decode(#[allow(unused_variables)] bytes: &[u8], format: Format) -> Result<Mesh> {
    match format {
        #[cfg(feature = "stl")]
        Format::AsciiStl => stl::from_ascii_slice(bytes),
        #[cfg(feature = "stl")]
        Format::BinaryStl => stl::from_binary_slice(bytes),
        #[cfg(feature = "off")]
        Format::Off => off::from_slice(bytes),
        #[allow(unreachable_patterns)]
        format => Err(Error::FeatureDisabled { format }),
    }
}
