use std::{fs, path::PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use mesh_decoder::{stl, Format, Loader, Mesh};
use tracing_subscriber::EnvFilter;

/// Prints a summary of an STL or OFF mesh.
#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
    /// Decode as this format instead of choosing from the file extension.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,
    /// Write the normalized mesh as binary STL.
    #[arg(long, value_name = "PATH")]
    write_stl: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    AsciiStl,
    BinaryStl,
    Off,
}

impl From<InputFormat> for Format {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::AsciiStl => Format::AsciiStl,
            InputFormat::BinaryStl => Format::BinaryStl,
            InputFormat::Off => Format::Off,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args);
    let path = &args.path;

    let mesh = match args.format {
        Some(format) => {
            let bytes = fs::read(path).with_context(|| format!("failed to read {path:?}"))?;
            mesh_decoder::decode(&bytes, format.into())?
        }
        None => Loader::default().load(path)?,
    };
    print_summary(&mesh);

    if let Some(out) = &args.write_stl {
        let bytes = stl::to_binary(&mesh)?;
        fs::write(out, bytes).with_context(|| format!("failed to write {out:?}"))?;
        eprintln!("wrote {out:?}");
    }
    Ok(())
}

fn print_summary(mesh: &Mesh) {
    let bb = mesh.bounding_box();
    let sphere = mesh.bounding_sphere();
    println!("triangles:       {}", mesh.triangle_count());
    println!("vertices:        {}", mesh.positions().len());
    println!("colors:          {}", mesh.colors().is_some());
    println!("bounding box:    {:?} .. {:?}", bb.min, bb.max);
    println!("size:            {:?}", bb.size());
    println!("bounding sphere: radius {}", sphere.radius);
}
