use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::PathBuf;

mod generate;

#[derive(Parser)]
#[command(name = "dxassist-datagen")]
#[command(about = "Write a hypothetical patient CSV for the dxassist dashboard")]
struct Cli {
    /// Number of patients to generate
    #[arg(long, default_value_t = 20)]
    count: usize,
    /// Output CSV path
    #[arg(long, default_value = dxassist_core::DEFAULT_PATIENT_CSV)]
    output: PathBuf,
    /// Seed for reproducible data (optional)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let records = generate::generate_patients(&mut rng, cli.count);
    let file = File::create(&cli.output)?;
    generate::write_patients_csv(&records, file)?;

    println!(
        "Wrote {} patients to {}",
        records.len(),
        cli.output.display()
    );
    Ok(())
}
