use std::{fs::File, io::BufWriter};

use color_eyre::eyre::eyre;
use colored::Colorize;
use coordinator::{simulate, Preset, RunKind};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut args = std::env::args().skip(1);
    let preset = match args.next() {
        Some(name) => name.parse::<Preset>().map_err(|e| eyre!(e))?,
        None => Preset::Comparison,
    };
    let seed = match args.next() {
        Some(seed) => seed.parse::<u64>()?,
        None => 0,
    };

    let config = preset.config::<f64>(seed)?;
    let report = simulate(&config)?;

    report.write_csv(BufWriter::new(File::create("./records.csv")?))?;

    println!("{}", report.hints.title.bold());
    println!(
        "  seed {seed}, {} samples, dt = {:.5} s, reference height {:.3} m",
        report.grid().len(),
        report.grid().dt(),
        report.initial_y()
    );
    for (kind, label) in [
        (RunKind::Passive, "passive".red()),
        (RunKind::Active, "active".blue()),
    ] {
        if let Some(variance) = report.tracking_variance(kind) {
            println!("  {label}: tracking variance {variance:.5} m^2");
        }
    }
    if let Err(err) = report.check_finite() {
        println!("  {}", err.to_string().yellow());
    }
    println!("  wrote {}", "./records.csv".green());

    Ok(())
}
