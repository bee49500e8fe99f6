use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Write a synthetic abalone table in the layout the pipeline reads.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output CSV path
    #[arg(default_value = "sample_abalone.csv")]
    output: PathBuf,

    /// Number of specimens
    #[arg(long, default_value_t = 500)]
    rows: usize,

    /// Every n-th specimen gets an unparseable length (0 disables)
    #[arg(long, default_value_t = 97)]
    malformed_every: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const HEADER: [&str; 9] = [
    "Gender",
    "Length",
    "Diameter",
    "Height",
    "Whole_weight",
    "Shucked_weight",
    "Viscera_weight",
    "Shell_weight",
    "Rings",
];

/// Zero-mean normal noise.
fn noise(rng: &mut impl Rng, std_dev: f64) -> Result<f64> {
    Ok(Normal::new(0.0, std_dev)?.sample(rng))
}

/// One specimen. Measurements grow with age; infants are smaller.
fn generate_specimen(rng: &mut StdRng) -> Result<Vec<String>> {
    let gender = ["M", "F", "I"][rng.gen_range(0..3)];
    let age: f64 = rng.gen_range(0.0..1.0);
    let size = if gender == "I" { 0.75 } else { 1.0 };

    let length = (0.15 + 0.55 * age.sqrt() * size + noise(rng, 0.02)?).max(0.075);
    let diameter = (0.8 * length + noise(rng, 0.01)?).max(0.055);
    let height = (0.27 * length + noise(rng, 0.008)?).max(0.01);
    let whole = (2.2 * length.powi(3) * 1.6 + noise(rng, 0.03)?).max(0.002);
    let shucked = whole * rng.gen_range(0.38..0.48);
    let viscera = whole * rng.gen_range(0.18..0.24);
    let shell = whole * rng.gen_range(0.26..0.33);
    let rings = (3.0 + 18.0 * age + 6.0 * (shell - 0.2) + noise(rng, 1.5)?)
        .round()
        .clamp(1.0, 29.0) as i64;

    let mut record = vec![gender.to_string()];
    record.extend(
        [length, diameter, height, whole, shucked, viscera, shell]
            .iter()
            .map(|v| format!("{v:.4}")),
    );
    record.push(rings.to_string());
    Ok(record)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    // Two metadata rows precede the header, as in the source workbook.
    writer.write_record(["Abalone measurements (synthetic)"])?;
    writer.write_record(["Generated by generate_sample", format!("seed {}", args.seed).as_str()])?;
    writer.write_record(HEADER)?;

    for i in 0..args.rows {
        let mut record = generate_specimen(&mut rng)?;
        if args.malformed_every > 0 && i % args.malformed_every == args.malformed_every - 1 {
            record[1] = "N/A".to_string();
        }
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} specimens to {}", args.rows, args.output.display());
    Ok(())
}
