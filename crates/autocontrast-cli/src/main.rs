use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autocontrast_core::correct::{correct, Workers};
use autocontrast_core::pnm::Picture;

#[derive(Parser)]
#[command(name = "autocontrast")]
#[command(about = "Automatic contrast correction for binary PNM images")]
#[command(version)]
struct Cli {
    /// Input image (binary P5 grayscale or P6 color)
    input: PathBuf,

    /// Output image path
    output: PathBuf,

    /// Worker threads: -1 = sequential, 0 = one per hardware thread, N = exactly N
    #[arg(allow_hyphen_values = true)]
    threads: i32,

    /// Fraction of pixels ignored at each extreme, in [0.0, 0.5)
    ignore_rate: f32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_workers(threads: i32) -> Result<Workers> {
    match threads {
        -1 => Ok(Workers::Sequential),
        0 => Ok(Workers::Auto),
        n if n > 0 => {
            let n = NonZeroUsize::new(n as usize).context("Incorrect number of threads!")?;
            Ok(Workers::Fixed(n))
        }
        _ => bail!("Incorrect number of threads!"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Validate everything before touching any file.
    let workers = parse_workers(cli.threads)?;
    if !(0.0..0.5).contains(&cli.ignore_rate) {
        bail!("Incorrect ignored value range!");
    }

    let mut picture = Picture::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let report = correct(&mut picture, cli.ignore_rate, workers)?;

    println!(
        "Time ({} thread(s)): {:.3} ms",
        report.threads,
        report.elapsed.as_secs_f64() * 1e3
    );

    picture
        .write(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
