//! Command line front end of the cruise fuel analytics dashboard.
//! Every invocation is one dashboard interaction: generate, filter, aggregate, print and write the page.

use clap::Parser;
use cruise_fuel_analytics::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uom::si::mass::ton;

/// NCLH cruise ship fuel analytics dashboard
#[derive(Parser, Debug)]
#[command(name = "cruise-fuel-dashboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of synthetic voyages to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_ENTRIES)]
    records: usize,

    /// Seed of the random source
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Subsidiary to include, repeat for more (default: all)
    #[arg(long = "subsidiary")]
    subsidiaries: Vec<String>,

    /// Ship to include, repeat for more. Overrides the subsidiary selection.
    #[arg(long = "ship")]
    ships: Vec<String>,

    /// Group warm-up data by ship_name, subsidiary or port_country
    #[arg(long, default_value = "ship_name")]
    warmup_group: String,

    /// Group fuel data by ship_name, subsidiary or port_country
    #[arg(long, default_value = "ship_name")]
    fuel_group: String,

    /// Where to write the dashboard page
    #[arg(short, long, default_value = "dashboard.html")]
    output: PathBuf,

    /// Write the detailed data to this csv file
    #[arg(long)]
    detail_csv: Option<PathBuf>,

    /// Print the detailed data, most wasteful voyage first
    #[arg(long)]
    show_detail: bool,

    /// Print the ships offered for the subsidiary selection and exit
    #[arg(long)]
    list_ships: bool,

    /// Open the charts in the browser
    #[arg(long)]
    open: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn to_config(&self) -> Result<DashboardConfig> {
        Ok(DashboardConfig {
            num_entries: self.records,
            seed: self.seed,
            filters: FilterSelection::parse(self.subsidiaries.as_slice(), self.ships.as_slice())?,
            warmup_group: self.warmup_group.parse()?,
            fuel_group: self.fuel_group.parse()?,
            output_path: self.output.clone(),
            detail_csv_path: self.detail_csv.clone(),
        })
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn print_report(report: &DashboardReport, show_detail: bool) {
    println!("Performance Metrics");
    println!("  Total Extra Fuel Wasted: {}", format_metric_tons(report.summary.total_extra_fuel_wasted));
    println!("  Total Financial Loss:    {}", format_usd(report.summary.total_financial_loss));
    println!("  {}", report.summary);

    println!("\nWarm-Up Efficiency by {}", report.warmup_group.column_title());
    for (group, shares) in &report.warmup {
        let optimal = shares.get(&WarmupStatus::Optimal).copied().unwrap_or(0.0);
        let non_optimal = shares.get(&WarmupStatus::NonOptimal).copied().unwrap_or(0.0);
        println!("  {:<22} optimal {:>5.1}%  non-optimal {:>5.1}%", group, optimal, non_optimal);
    }

    println!("\nFuel Usage by {}", report.fuel_group.column_title());
    for row in &report.fuel {
        println!("  {:<22} {:<12} {:>8.1} t  ({} voyages)", row.group, row.warmup_status.name(), row.total_fuel().get::<ton>(), row.count);
    }

    if show_detail {
        println!("\nDetailed Data");
        for analyzed in detailed_view(&report.records) {
            let record = &analyzed.record;
            println!(
                "  {:<18} {:<22} {:<12} {:>5.1} t  {:>2} min  {:>6.3} t wasted  ${:>8.2}",
                record.subsidiary.name(),
                record.ship_name,
                record.port_country.name(),
                record.fuel_used().get::<ton>(),
                record.engine_warmup_minutes,
                analyzed.extra_fuel().get::<ton>(),
                analyzed.financial_loss
            );
        }
    }
}

fn print_ship_options(config: &DashboardConfig) -> Result<()> {
    let records = derive(&generate(config.num_entries, config.seed)?);
    for ship in available_ships(&records, &config.filters.subsidiaries) {
        println!("{}", ship);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;
    if cli.list_ships {
        return print_ship_options(&config);
    }
    let report = build_report(&config)?;

    if !cli.quiet {
        print_report(&report, cli.show_detail);
    }

    write_dashboard(&report, &config)?;
    if let Some(csv_path) = &config.detail_csv_path {
        write_detail_csv(csv_path, &report.records)?;
    }

    // Open plot
    if cli.open {
        warmup_chart(&report.warmup, report.warmup_group).show();
        fuel_chart(&report.fuel, report.fuel_group).show();
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
