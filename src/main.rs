mod args;
mod nominate;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use crate::args::{Args, Command};

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("args: {:?}", args);

    let res = match args.command {
        Command::Analyze {
            config,
            out,
            reference,
        } => nominate::run_analysis(config, out, reference),
        Command::Export {
            records,
            out,
            keywords,
        } => nominate::run_export(records, out, keywords.unwrap_or_default()),
        Command::Sessions { records } => nominate::run_sessions(records),
        Command::Sheet { records, out } => nominate::run_sheet(records, out),
    };

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
