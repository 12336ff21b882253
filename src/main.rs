mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use climastat::{
    climatology_frame, default_source, extremes_frame, monthly_statistics_frame,
    temperature_stats_frame, BatchReport, ClimastatError, Crossing, FileOutcome,
    GriddedAnalysis, StationAnalysis, StationDataLoader, StationReport, VariableOutcome,
    VariableResult,
};
use log::warn;

use crate::cli::{Cli, Command, GridArgs, StationArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Command::Grid(args) => run_grid(args),
        Command::Station(args) => run_station(args),
    };
    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_grid(args: GridArgs) -> Result<u8, ClimastatError> {
    if (args.plot || args.map) && !cfg!(feature = "plotting") {
        warn!("Built without the `plotting` feature; ignoring --plot and --map");
    }
    let analysis = GriddedAnalysis::builder()
        .window(args.window)
        .threshold(args.threshold)
        .keep_last_step(args.map)
        .build();
    let source = default_source();
    let report = analysis.run(source.as_ref(), &args.files);

    print_batch(&report, args.threshold);
    let mut render_failures = 0;
    for (path, result) in report.processed_variables() {
        if let Err(e) = render_variable(result, args.plot, args.map) {
            warn!("Skipping charts for '{}' in {:?}: {}", result.name, path, e);
            render_failures += 1;
        }
    }

    let status = report.status().with_render_failures(render_failures);
    println!(
        "{} file(s), {} skipped file(s), {} skipped variable(s), {} failed chart(s)",
        report.files.len(),
        report.skipped_files(),
        report.skipped_variables(),
        render_failures
    );
    Ok(status.exit_code())
}

fn print_batch(report: &BatchReport, threshold: f64) {
    for file in &report.files {
        match file {
            FileOutcome::Skipped { path, reason } => {
                println!("Skipping {}: {}", path.display(), reason);
            }
            FileOutcome::Processed { path, variables } => {
                println!("{}", path.display());
                for variable in variables {
                    match variable {
                        VariableOutcome::Skipped { name, reason } => {
                            println!("  Skipping variable {name}: {reason}");
                        }
                        VariableOutcome::Processed(result) => {
                            println!("  {}", describe_crossing(result, threshold));
                        }
                    }
                }
            }
        }
    }
}

fn describe_crossing(result: &VariableResult, threshold: f64) -> String {
    match (result.crossing, result.crossing_time) {
        (Some(Crossing::Found { value, .. }), Some(time)) => format!(
            "{}: smoothed global mean reaches {threshold} on {} ({value:.3})",
            result.name,
            time.date()
        ),
        (Some(Crossing::Found { time, value }), None) => format!(
            "{}: smoothed global mean reaches {threshold} at time {time} ({value:.3})",
            result.name
        ),
        (Some(Crossing::NotFound), _) => format!(
            "{}: smoothed global mean never reaches {threshold}",
            result.name
        ),
        (None, _) => format!("{}: no time series to search for a crossing", result.name),
    }
}

#[cfg(feature = "plotting")]
fn render_variable(result: &VariableResult, plot: bool, map: bool) -> Result<(), ClimastatError> {
    use climastat::{GlobalMean, SmoothedMean};

    if plot {
        match (&result.global_mean, &result.smoothed) {
            (GlobalMean::Series(raw), Some(SmoothedMean::Series(smoothed))) => {
                climastat::plot_global_mean(&result.name, raw, smoothed, result.time_units.as_ref())?
            }
            _ => warn!("'{}' has no global-mean time series to plot", result.name),
        }
    }
    if map {
        match (&result.last_step, &result.horizontal_axes) {
            (Some(field), Some((lat, lon))) if field.ndim() == 2 => {
                climastat::plot_map(field, lat, lon)?
            }
            _ => warn!("'{}' has no 2-D latitude/longitude field to map", result.name),
        }
    }
    Ok(())
}

#[cfg(not(feature = "plotting"))]
fn render_variable(_result: &VariableResult, _plot: bool, _map: bool) -> Result<(), ClimastatError> {
    Ok(())
}

fn run_station(args: StationArgs) -> Result<u8, ClimastatError> {
    let analysis = StationAnalysis::builder()
        .ref_start(args.ref_start)
        .ref_end(args.ref_end)
        .top_n(args.top)
        .highlight_years(args.highlight)
        .build();
    let report = analysis.run_file(&StationDataLoader::default(), &args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_station(&report)?;
    }

    if args.plot {
        #[cfg(feature = "plotting")]
        {
            for summary in &report.channels {
                climastat::plot_seasonal_anomalies(
                    &report.seasonal_anomalies,
                    summary,
                    report.season.name,
                )?;
                climastat::plot_monthly_statistics(summary, &report.highlighted)?;
            }
            climastat::plot_extremes(&report.extremes)?;
        }
        #[cfg(not(feature = "plotting"))]
        warn!("Built without the `plotting` feature; ignoring --plot");
    }
    Ok(0)
}

fn print_station(report: &StationReport) -> Result<(), ClimastatError> {
    if let (Some(first), Some(last)) = (report.first_date, report.last_date) {
        println!("{} daily records from {first} to {last}", report.records);
    }

    println!("\nClimatology {}", report.climatology.period());
    println!("{}", climatology_frame(&report.climatology)?);

    println!("\n{} anomalies", report.season.name);
    println!("{}", temperature_stats_frame(&report.seasonal_anomalies)?);

    for summary in &report.channels {
        println!(
            "\nHottest {} seasons by {}",
            report.season.name,
            summary.channel.label()
        );
        for ranked in &summary.hottest_years {
            println!("  {}: {:+.2} °C", ranked.year, ranked.anomaly);
        }
    }

    println!("\nHot days and tropical nights");
    println!("{}", extremes_frame(&report.extremes)?);

    for summary in &report.channels {
        println!("\nMonthly distribution of {}", summary.channel.label());
        println!("{}", monthly_statistics_frame(summary, &report.highlighted)?);
    }
    Ok(())
}
