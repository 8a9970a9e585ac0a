#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encoding_tools::downloader::download_neural_data;
use encoding_tools::model::DatasetReference;
use encoding_tools::overlay::overlay_neurons;
use ndarray::Array3;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "encoding-tools", about = "Dataset download and footprint visualization helpers")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download one of the course datasets and print its local path
    Fetch {
        /// Dataset kind, either "miniscope" or "widefield"
        dataset: String,
        /// Target folder, defaults to DataSAI_data_folder next to the parent
        /// of the working directory
        #[arg(long)]
        destination: Option<PathBuf>,
    },
    /// Render an RGB overlay of three neuron footprints to a figure file
    Overlay {
        /// Path to an (height, width, neuron) f64 .npy file, e.g. the fetched
        /// miniscope_data.npy
        footprints: PathBuf,
        /// Indices of the neurons mapped to the R, G and B channels; repeat
        /// an index for different color combinations
        n1: usize,
        n2: usize,
        n3: usize,
        #[arg(long, default_value = "overlay.png")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    match Args::parse().command {
        Command::Fetch { dataset, destination } => {
            let dataset = DatasetReference::resolve(&dataset)?;
            let path = download_neural_data(dataset, destination.as_deref())?;
            println!("{}", path.display());
        }
        Command::Overlay {
            footprints,
            n1,
            n2,
            n3,
            output,
        } => {
            let footprints: Array3<f64> = ndarray_npy::read_npy(&footprints)
                .with_context(|| format!("loading footprints from {}", footprints.display()))?;
            overlay_neurons(&footprints, n1, n2, n3, &output)?;
            println!("{}", output.display());
        }
    }
    Ok(())
}
