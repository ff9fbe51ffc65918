//! wavcat - join wav files that share a frame layout into a single wav file.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wavbuild::{probe, Format, Progress, WavBuilder};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";

/// Join wav files that share a frame layout into a single wav file.
///
/// The output format defaults to the format of the first input, individual
/// fields can be overridden. Inputs are never converted: an input with a
/// different frame size is an error.
#[derive(Parser, Debug)]
#[command(name = "wavcat")]
#[command(version)]
struct Cli {
    /// Input wav files, appended in the given order
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Output wav file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: PathBuf,

    /// Number of channels of the output
    #[arg(long)]
    channels: Option<u16>,

    /// Sample rate of the output in Hz
    #[arg(long = "sample-rate")]
    sample_rate: Option<u32>,

    /// Bits per sample of the output
    #[arg(long)]
    bits: Option<u16>,

    /// Audio format tag written to the header (1 = PCM, 3 = IEEE float)
    #[arg(long = "format-tag")]
    format_tag: Option<u16>,

    /// Add every input this many times
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: usize,

    /// Delete the output file first if it exists
    #[arg(short = 'f', long)]
    force: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn format(&self) -> Result<Format> {
        let first = &self.inputs[0];
        let probed = probe(first)
            .with_context(|| format!("cannot read format of {}", first.display()))?;

        let format = Format::new(
            self.format_tag.unwrap_or(probed.format_tag()),
            self.channels.unwrap_or(probed.channels()),
            self.sample_rate.unwrap_or(probed.sample_rate()),
            self.bits.unwrap_or(probed.bits_per_sample()),
        )?;

        Ok(format)
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Delete whatever is at `path`, links are removed without being followed.
fn remove_existing(path: &Path) -> Result<()> {
    // dangling symlinks block the write as well
    if fs::symlink_metadata(path).is_ok() {
        warn!(path = %path.display(), "removing existing output");
        fs::remove_file(path).with_context(|| format!("cannot remove {}", path.display()))?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format()?;
    info!(
        channels = format.channels(),
        sample_rate = format.sample_rate(),
        bits_per_sample = format.bits_per_sample(),
        "output format"
    );

    let pb = progress_bar();
    let mut builder = WavBuilder::new(format).with_observer(move |event: &Progress| match event {
        Progress::HeaderPending { total_bytes } => pb.set_length(*total_bytes),
        Progress::HeaderWritten => pb.set_position(wavbuild::HEADER_LEN as u64),
        Progress::ChunkWritten { bytes_written, .. } => pb.set_position(*bytes_written),
        Progress::Finished { .. } => pb.finish_with_message("done"),
        Progress::Failed { reason } => pb.abandon_with_message(reason.clone()),
    });

    for _ in 0..cli.repeat {
        for input in &cli.inputs {
            builder
                .add_from_file(input)
                .with_context(|| format!("cannot add {}", input.display()))?;
        }
    }

    if cli.force {
        remove_existing(&cli.output)?;
    }

    builder
        .write(&cli.output)
        .with_context(|| format!("cannot write {}", cli.output.display()))?;

    Ok(())
}
