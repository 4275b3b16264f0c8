use cafe_sales::{
    error::Error,
    parser::load,
    pipeline::{Pipeline, PipelineConfig},
    report::Report,
};
use clap::Parser;
use rust_decimal::Decimal;

/// Clean a café sales export and report revenue metrics.
#[derive(Parser)]
struct Cli {
    /// CSV file with Date, ItemName, Category, UnitPrice, QuantitySold, TotalSale columns
    #[clap(default_value = "cafe_sales.csv")]
    input: String,
    /// Largest difference between stored and calculated totals that is not reported
    #[clap(long, default_value = "0.01")]
    tolerance: Decimal,
    /// Number of cleaned records to preview
    #[clap(long, default_value = "5")]
    preview: usize,
}

fn run(cli: Cli) -> Result<(), Error> {
    let raw = load(&cli.input)?;
    let output = Pipeline::new(PipelineConfig {
        tolerance: cli.tolerance,
    })
    .run(raw)?;
    Report::new(&output, cli.preview).write(std::io::stdout().lock())
}

fn main() {
    env_logger::init();

    if let Err(error) = run(Cli::parse()) {
        log::error!("{}", error);
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
