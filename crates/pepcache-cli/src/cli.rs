use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "pepcache - Coordinate peptide variant scoring work across many annotation workers through a shared on-disk cache.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print only errors to the console; a --log-file still records INFO and above
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Append logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by `batch`.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub cache: CacheArgs,
}

/// Locations of the shared cache, overriding the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct CacheArgs {
    /// Path to a TOML configuration file.
    /// Defaults to `config.toml` in the platform configuration directory, if present.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root directory of the shared peptide cache.
    #[arg(long, global = true, env = "PEPCACHE_CACHE_ROOT", value_name = "DIR")]
    pub cache_root: Option<PathBuf>,

    /// Shared job queue file listing peptides that need scoring.
    #[arg(long, global = true, env = "PEPCACHE_JOB_QUEUE", value_name = "PATH")]
    pub job_queue: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize protein change notations to the one-letter form used as cache keys.
    Normalize(NormalizeArgs),
    /// Record one variant in the cache and print its score if already known.
    Annotate(AnnotateArgs),
    /// Record every variant from a table in parallel and write their scores as TSV.
    Batch(BatchArgs),
    /// Show what the cache holds for one peptide.
    Status(StatusArgs),
    /// List the peptides waiting for a scoring pass.
    Queue,
}

/// Arguments for the `normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Protein change notations, e.g. `Ala123Thr` or `p.Gly45*`.
    #[arg(required = true, value_name = "NOTATION")]
    pub notations: Vec<String>,
}

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Peptide identifier, e.g. a protein accession.
    #[arg(short, long, required = true, value_name = "ID")]
    pub peptide: String,

    /// Protein change notation, e.g. `Ala5Val`.
    #[arg(long = "variant", required = true, value_name = "NOTATION")]
    pub notation: String,

    #[command(flatten)]
    pub sequence: SequenceSource,
}

/// Where the reference sequence of the peptide comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SequenceSource {
    /// The amino-acid sequence itself.
    #[arg(short, long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,

    /// A protein FASTA file containing a record whose id equals the peptide.
    #[arg(short, long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Protein FASTA file with the reference sequence of every peptide.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub fasta: PathBuf,

    /// Tab-separated variants: `peptide<TAB>notation` or a single `PEPTIDE:p.NOTATION` column.
    #[arg(short = 'i', long, required = true, value_name = "PATH")]
    pub variants: PathBuf,

    /// Write results here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Peptide identifier to inspect.
    #[arg(required = true, value_name = "ID")]
    pub peptide: String,
}
