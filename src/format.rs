use std::fmt;

/// A wire format understood by [`decode`](crate::decode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Format {
    AsciiStl,
    BinaryStl,
    /// OFF, or COFF with per-face colors.
    Off,
}

impl Format {
    /// Name of the cargo feature that enables this format.
    pub(crate) fn feature(self) -> &'static str {
        match self {
            Self::AsciiStl | Self::BinaryStl => "stl",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AsciiStl => "ASCII STL",
            Self::BinaryStl => "binary STL",
            Self::Off => "OFF",
        })
    }
}
