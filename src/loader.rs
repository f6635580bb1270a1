use std::{ffi::OsStr, fmt, fs, io, path::Path};

use crate::{Error, Format, Mesh, Result};

type Reader<B> = fn(&Path) -> io::Result<B>;

/// Loads meshes from files, choosing the decoder from the file extension.
///
/// | extension      | decoder                                   |
/// |----------------|-------------------------------------------|
/// | `stl`, `STL`   | [`decode_auto`](crate::decode_auto)       |
/// | `off`, `OFF`   | [`decode_off`](crate::decode_off)         |
pub struct Loader<B = Vec<u8>> {
    reader: Reader<B>,
}

fn default_reader(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

impl Default for Loader<Vec<u8>> {
    fn default() -> Self {
        Self {
            reader: default_reader,
        }
    }
}

impl<B: AsRef<[u8]>> Loader<B> {
    /// Replaces the function used to read files. The default reads with
    /// [`std::fs::read`].
    ///
    /// ```
    /// use mesh_decoder::Loader;
    ///
    /// const TRIANGLE: &[u8] = b"OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
    ///
    /// // Serve one built-in asset and read everything else from disk.
    /// let loader = Loader::default().custom_reader(|path| {
    ///     if path.starts_with("builtin:") {
    ///         Ok(TRIANGLE.to_vec())
    ///     } else {
    ///         std::fs::read(path)
    ///     }
    /// });
    /// assert_eq!(loader.load("builtin:/triangle.off")?.triangle_count(), 1);
    /// # Ok::<(), mesh_decoder::Error>(())
    /// ```
    #[must_use]
    pub fn custom_reader(mut self, reader: Reader<B>) -> Self {
        self.reader = reader;
        self
    }

    /// Creates a loader whose reader returns any byte container, such as a
    /// memory map.
    ///
    /// ```no_run
    /// use std::fs::File;
    ///
    /// use memmap2::Mmap;
    /// use mesh_decoder::Loader;
    ///
    /// // SAFETY: the file must not be truncated while it is mapped.
    /// let loader = Loader::with_custom_reader(|path| unsafe { Mmap::map(&File::open(path)?) });
    /// println!("{} triangles", loader.load("large.stl")?.triangle_count());
    /// # Ok::<(), mesh_decoder::Error>(())
    /// ```
    #[must_use]
    pub fn with_custom_reader(reader: Reader<B>) -> Self {
        Self { reader }
    }

    /// Reads `path` and decodes it according to its extension.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Mesh> {
        self.load_(path.as_ref())
    }
    fn load_(&self, path: &Path) -> Result<Mesh> {
        self.load_from_slice_(self.read(path)?.as_ref(), path)
    }
    pub fn load_from_slice<P: AsRef<Path>>(&self, bytes: &[u8], path: P) -> Result<Mesh> {
        self.load_from_slice_(bytes, path.as_ref())
    }
    fn load_from_slice_(&self, bytes: &[u8], path: &Path) -> Result<Mesh> {
        match path.extension().and_then(OsStr::to_str) {
            Some("stl" | "STL") => self.load_stl_from_slice_(bytes, path),
            Some("off" | "OFF") => self.load_off_from_slice_(bytes, path),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_owned(),
            }),
        }
    }

    /// Loads an STL file regardless of its extension.
    pub fn load_stl<P: AsRef<Path>>(&self, path: P) -> Result<Mesh> {
        let path = path.as_ref();
        self.load_stl_from_slice_(self.read(path)?.as_ref(), path)
    }
    pub fn load_stl_from_slice<P: AsRef<Path>>(&self, bytes: &[u8], path: P) -> Result<Mesh> {
        self.load_stl_from_slice_(bytes, path.as_ref())
    }
    #[allow(clippy::unused_self)]
    fn load_stl_from_slice_(&self, bytes: &[u8], path: &Path) -> Result<Mesh> {
        tracing::debug!(?path, len = bytes.len(), "loading STL");
        #[cfg(feature = "stl")]
        {
            crate::stl::from_slice(bytes)
        }
        #[cfg(not(feature = "stl"))]
        {
            Err(Error::FeatureDisabled {
                format: Format::BinaryStl,
            })
        }
    }

    /// Loads an OFF/COFF file regardless of its extension.
    pub fn load_off<P: AsRef<Path>>(&self, path: P) -> Result<Mesh> {
        let path = path.as_ref();
        self.load_off_from_slice_(self.read(path)?.as_ref(), path)
    }
    pub fn load_off_from_slice<P: AsRef<Path>>(&self, bytes: &[u8], path: P) -> Result<Mesh> {
        self.load_off_from_slice_(bytes, path.as_ref())
    }
    #[allow(clippy::unused_self)]
    fn load_off_from_slice_(&self, bytes: &[u8], path: &Path) -> Result<Mesh> {
        tracing::debug!(?path, len = bytes.len(), "loading OFF");
        crate::decode(bytes, Format::Off)
    }

    fn read(&self, path: &Path) -> Result<B> {
        (self.reader)(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })
    }
}

impl<B> fmt::Debug for Loader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}
