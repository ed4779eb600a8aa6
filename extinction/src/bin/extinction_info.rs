//! Inspect the dust-map registry and tabulate extinction laws

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use extinction::law::ExtinctionLaw;
use extinction::registry::Availability;
use extinction::{DatasetStore, ExtinctionConfig, Law, LocalDataStore, MapRegistry, DEFAULT_R_V};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect dust maps and extinction laws")]
struct Args {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered dust maps and whether their data is installed
    Maps,

    /// Tabulate A_λ/A_V for one or all laws
    Law {
        /// Law name (WangChen2019, Cardelli1989, ODonnell1994); all when omitted
        #[arg(long)]
        name: Option<String>,

        /// Reddening parameter R_V
        #[arg(long, default_value_t = DEFAULT_R_V)]
        r_v: f64,

        /// Effective wavelengths in micrometers
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "0.365,0.445,0.551,0.658,0.806,1.22,1.63,2.19"
        )]
        wavelengths: Vec<f64>,
    },
}

fn list_maps(config: &ExtinctionConfig) {
    let registry = MapRegistry::builtin();
    let store = LocalDataStore::from_config(config);

    println!("Dust maps (data directory: {})", config.data_dir.display());
    println!(
        "  {:<20} {:>3}  {:<17} {:>7} {:>7}  {}",
        "identifier", "dim", "returns", "λ1 µm", "λ2 µm", "status"
    );
    for entry in registry.entries() {
        let quantity = entry.quantity();
        let lambda2 = quantity
            .second_reference_wavelength()
            .map(|l| format!("{l:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let status = match entry.availability() {
            Availability::Reserved => "reserved",
            Availability::Enabled if store.is_present(entry.identifier()) => "installed",
            Availability::Enabled => "missing",
        };
        println!(
            "  {:<20} {:>3}  {:<17} {:>7.4} {:>7}  {}",
            entry.identifier(),
            entry.dimensionality().as_u8(),
            entry.returns(),
            quantity.reference_wavelength(),
            lambda2,
            status
        );
    }
}

fn tabulate_laws(laws: &[Law], r_v: f64, wavelengths: &[f64]) {
    print!("  {:>8}", "λ µm");
    for law in laws {
        print!(" {:>14}", law.name());
    }
    println!();

    for &wavelength in wavelengths {
        print!("  {wavelength:>8.3}");
        for law in laws {
            print!(" {:>14.4}", law.a_lambda_over_a_v(wavelength, r_v));
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ExtinctionConfig::load_from_file(path)?,
        None => ExtinctionConfig::default(),
    };

    match args.command {
        Command::Maps => list_maps(&config),
        Command::Law {
            name,
            r_v,
            wavelengths,
        } => {
            if let Some(bad) = wavelengths.iter().find(|w| !w.is_finite() || **w <= 0.0) {
                return Err(format!("wavelengths must be positive, got {bad}").into());
            }
            let laws = match name {
                Some(name) => vec![Law::from_name(&name)?],
                None => Law::ALL.to_vec(),
            };
            println!("A_λ/A_V at R_V = {r_v}");
            tabulate_laws(&laws, r_v, &wavelengths);
        }
    }

    Ok(())
}
