pub(crate) mod bytes;
#[cfg(any(feature = "off", feature = "stl"))]
pub(crate) mod float;
