use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Climate statistics from station and gridded temperature data.
#[derive(Parser)]
#[command(name = "climastat", version, about = "Climate statistics from station and gridded temperature data")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Global means, running means and threshold crossings of gridded files.
    Grid(GridArgs),
    /// Climatology, summer anomalies and extreme days of a station CSV.
    Station(StationArgs),
}

#[derive(clap::Args)]
pub struct GridArgs {
    /// Gridded files, processed one after another.
    #[arg(long, required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Plot the smoothed global mean of each variable.
    #[arg(long)]
    pub plot: bool,

    /// Plot the last time step of each variable that has latitude and longitude.
    #[arg(long)]
    pub map: bool,

    /// Running-mean window, in time steps.
    #[arg(long, default_value_t = climastat::DEFAULT_WINDOW)]
    pub window: usize,

    /// Value the smoothed global mean has to reach.
    #[arg(long, default_value_t = climastat::DEFAULT_CROSSING_THRESHOLD)]
    pub threshold: f64,
}

#[derive(clap::Args)]
pub struct StationArgs {
    /// Station CSV with a date column and tmax/tmin/tmean (or tlmax/tlmin/tl_mittel).
    #[arg(short, long)]
    pub file: PathBuf,

    /// First year of the reference period.
    #[arg(long, default_value_t = 1991)]
    pub ref_start: i32,

    /// Last year of the reference period.
    #[arg(long, default_value_t = 2020)]
    pub ref_end: i32,

    /// Years whose monthly means are listed next to the monthly distribution.
    #[arg(long, num_args = 1..)]
    pub highlight: Vec<i32>,

    /// Number of hottest summers to list.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Plot summer anomalies and extreme days.
    #[arg(long)]
    pub plot: bool,
}
