use clap::{Parser, Subcommand};

/// This is an ideal-point analysis program for roll-call votes.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Builds the corpus of periods and runs the estimators.
    Analyze {
        /// (file path) The JSON file describing the analysis. See the manual for the format.
        #[clap(short, long, value_parser)]
        config: String,

        /// (directory, optional) Where to write the plots and the coordinates. Setting this option
        /// overrides the directory that may be specified in the configuration.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (file path, optional) A reference coordinate table in CSV format. If provided, the
        /// program will check that the computed coordinates match the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Writes the three CSV files of every year (and of all the years) from the voting records.
    Export {
        /// (directory or .xlsx file) The voting records.
        #[clap(long, value_parser)]
        records: String,

        /// (directory, optional) Where to write the files. It is created if needed.
        /// Defaults to output/<yymmdd-HHMMSS> followed by the keywords.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (list of keywords, optional) Only keep the resolutions whose summary contains one of
        /// these keywords.
        #[clap(long = "match", value_parser)]
        keywords: Option<Vec<String>>,
    },
    /// Lists the sessions of constant membership found in the voting records.
    Sessions {
        /// (directory or .xlsx file) The voting records.
        #[clap(long, value_parser)]
        records: String,
    },
    /// Writes one line per resolution with the start of its session, the tallies and the vote
    /// of every country.
    Sheet {
        /// (directory or .xlsx file) The voting records.
        #[clap(long, value_parser)]
        records: String,

        /// (file path) The CSV file to write.
        #[clap(short, long, value_parser)]
        out: String,
    },
}
