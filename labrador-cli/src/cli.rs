use std::path::PathBuf;

use clap::{ArgEnum, Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use labrador::RAW_COUNT_FIELD;

use crate::opts::{input_stream, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, global = true, value_parser)]
    pub no_progress: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Options describing the contact file to read.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input contact file path; `-` is the standard input. The file must
    /// start with a header line naming the `chrom1`, `pos1`, `chrom2`,
    /// `pos2` and value columns
    #[clap(default_value_t, value_parser = input_stream)]
    pub input: InputStream,

    /// Bin width in base pairs
    #[clap(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub resolution: u64,

    /// Column delimiter
    #[clap(short, long, default_value_t = '\t', value_parser)]
    pub delimiter: char,

    /// Names of the value columns to load as matrix fields
    #[clap(long, default_values = &[RAW_COUNT_FIELD], value_parser, value_delimiter = ',')]
    pub fields: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
pub enum MethodCli {
    #[clap(name = "ICE")]
    Ice,
    #[clap(name = "SCN")]
    Scn,
    #[clap(name = "MinMax")]
    MinMax,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a summary of every chromosome's contact matrix
    Stats {
        #[clap(flatten)]
        input: InputArgs,
    },

    /// Extract a dense square block of a contact matrix
    Query {
        #[clap(flatten)]
        input: InputArgs,

        /// Chromosome to query
        #[clap(long, value_parser)]
        chrom: String,

        /// Start of the queried range, inclusive
        #[clap(long, value_parser)]
        start: u64,

        /// End of the queried range, exclusive
        #[clap(long, value_parser)]
        end: u64,

        /// Field to read the values from
        #[clap(long, default_value = RAW_COUNT_FIELD, value_parser)]
        field: String,

        /// Sum the block with its transpose (doubles the diagonal)
        #[clap(long, value_parser)]
        symmetric: bool,

        /// Output file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Normalize the contact matrices of all chromosomes
    Normalize {
        #[clap(flatten)]
        input: InputArgs,

        /// Normalization method
        #[clap(short, long, arg_enum, ignore_case = true, value_parser)]
        method: MethodCli,

        /// Field to normalize
        #[clap(long, default_value = RAW_COUNT_FIELD, value_parser)]
        source: String,

        /// Maximum number of ICE iterations
        #[clap(long, default_value_t = 50, value_parser)]
        max_iter: usize,

        /// ICE convergence threshold on the change of the bias vector
        #[clap(long, default_value_t = 1e-3, value_parser)]
        threshold: f64,

        /// Number of SCN column/row normalization rounds
        #[clap(long, default_value_t = 10, value_parser)]
        iterations: usize,

        /// Output file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Call topologically associating domain boundaries with TopDom
    Topdom {
        #[clap(flatten)]
        input: InputArgs,

        /// Chromosome to analyze; all chromosomes if not given
        #[clap(long, value_parser)]
        chrom: Option<String>,

        /// Window size in base pairs
        #[clap(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        window: u64,

        /// Field to read the values from
        #[clap(long, default_value = RAW_COUNT_FIELD, value_parser)]
        field: String,

        /// Keep every local minimum of the bin signal, without the rank-sum
        /// test
        #[clap(long, value_parser)]
        no_significance: bool,

        /// Number of threads computing the bin signal; all cores if not given
        #[clap(long, value_parser)]
        threads: Option<usize>,

        /// Output file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },
}
