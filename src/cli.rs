//! CLI argument definitions

use crate::align::{AlignOptions, DedupStrategy, MatchStrategy};
use crate::config::CliOverrides;
use crate::exit_codes;
use crate::extract::DiscoveryMode;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
    InvalidArgs,
    InputNotFound,
    OutputError,
    ProcessingError,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_codes::SUCCESS,
            ExitCode::GeneralError => exit_codes::GENERAL_ERROR,
            ExitCode::InvalidArgs => exit_codes::INVALID_ARGS,
            ExitCode::InputNotFound => exit_codes::INPUT_NOT_FOUND,
            ExitCode::OutputError => exit_codes::OUTPUT_ERROR,
            ExitCode::ProcessingError => exit_codes::PROCESSING_ERROR,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input file not found",
            ExitCode::OutputError => "Output error",
            ExitCode::ProcessingError => "Processing error",
        }
    }
}

/// Book digitization passes over EPUBs and book JSON documents
#[derive(Parser, Debug)]
#[command(name = "bookmend", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (default: ./bookmend.toml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract an EPUB into a book JSON document
    Extract(ExtractArgs),
    /// Recompute word counts of every content item
    WordCount(RewriteArgs),
    /// Report the structure of a book document
    Analyze(AnalyzeArgs),
    /// Realign chapters against a reference table of contents
    Align(AlignArgs),
    /// Split `PART ... - SUBTITLE` titles into title and subtitle
    SplitTitles(RewriteArgs),
    /// Apply the configured text corrections
    Fix(RewriteArgs),
    /// Compare character counts of EPUBs against a baseline
    Compare(CompareArgs),
    /// List sentences present in one EPUB but not in another
    DiffContent(DiffContentArgs),
    /// Check that every NCX navigation target exists
    VerifyNav(VerifyNavArgs),
}

/// Output location for passes that rewrite a document
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file (default: overwrite the input)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not keep a backup of an overwritten file
    #[arg(long)]
    pub no_backup: bool,
}

impl OutputArgs {
    /// Where to write, given the input path
    pub fn target(&self, input: &std::path::Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| input.to_path_buf())
    }
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// EPUB file
    pub input: PathBuf,

    /// Book JSON to write
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Pick documents by file name instead of the OPF spine
    #[arg(long)]
    pub by_name: bool,

    /// Drop paragraphs with this many characters or fewer
    #[arg(long, value_name = "N")]
    pub min_item_chars: Option<usize>,
}

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Book JSON document
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Book JSON document
    pub input: PathBuf,

    /// Reference TOC CSV to compare chapter order against
    #[arg(long, value_name = "CSV")]
    pub toc: Option<PathBuf>,
}

/// Named strategy combinations
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignPreset {
    /// Title plus preview dedup, chapter-number matching
    TitleKey,
    /// Chapter-number dedup, positional matching
    Sequential,
    /// Content-hash dedup, positional matching
    ContentHash,
    /// Content-hash dedup, keyword matching
    ContentMatch,
}

impl AlignPreset {
    pub fn options(self) -> AlignOptions {
        match self {
            AlignPreset::TitleKey => AlignOptions::title_key(),
            AlignPreset::Sequential => AlignOptions::sequential(),
            AlignPreset::ContentHash => AlignOptions::content_hash(),
            AlignPreset::ContentMatch => AlignOptions::content_match(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupArg {
    TitlePreview,
    ChapterNumber,
    ContentHash,
}

impl From<DedupArg> for DedupStrategy {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::TitlePreview => DedupStrategy::TitlePreview,
            DedupArg::ChapterNumber => DedupStrategy::ChapterNumber,
            DedupArg::ContentHash => DedupStrategy::ContentHash,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchArg {
    Positional,
    ByNumber,
    Keyword,
}

impl From<MatchArg> for MatchStrategy {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Positional => MatchStrategy::Positional,
            MatchArg::ByNumber => MatchStrategy::ByNumber,
            MatchArg::Keyword => MatchStrategy::Keyword,
        }
    }
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Book JSON document
    pub input: PathBuf,

    /// Reference TOC CSV
    #[arg(long, value_name = "CSV")]
    pub toc: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Start from a strategy preset instead of the config file strategies
    #[arg(long, value_enum)]
    pub preset: Option<AlignPreset>,

    /// Dedup strategy
    #[arg(long, value_enum)]
    pub dedup: Option<DedupArg>,

    /// Match strategy
    #[arg(long = "match", value_enum)]
    pub matching: Option<MatchArg>,

    /// Similarity needed for the fuzzy title bonus, in (0, 1]
    #[arg(long, value_name = "RATIO")]
    pub fuzzy_threshold: Option<f64>,

    /// Keep chapter labels repeated in the first paragraph
    #[arg(long)]
    pub keep_repeated_titles: bool,

    /// Print the chapter mapping without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl AlignArgs {
    /// Values given explicitly on the command line
    pub fn overrides(&self) -> CliOverrides {
        let preset = self.preset.map(AlignPreset::options);
        CliOverrides {
            dedup: self
                .dedup
                .map(Into::into)
                .or(preset.as_ref().map(|p| p.dedup)),
            matching: self
                .matching
                .map(Into::into)
                .or(preset.as_ref().map(|p| p.matching)),
            fuzzy_threshold: self.fuzzy_threshold,
            clean_repeated_titles: self.keep_repeated_titles.then_some(false),
            ..CliOverrides::new()
        }
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Baseline EPUB
    pub baseline: PathBuf,

    /// EPUBs compared against the baseline
    #[arg(required = true)]
    pub others: Vec<PathBuf>,

    /// Also list per-document character counts
    #[arg(long)]
    pub documents: bool,
}

#[derive(Args, Debug)]
pub struct DiffContentArgs {
    /// Original EPUB
    pub original: PathBuf,

    /// Derived EPUB searched for added sentences
    pub other: PathBuf,

    /// Segments shown per category
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct VerifyNavArgs {
    /// EPUB file
    pub input: PathBuf,
}

impl ExtractArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            discovery: self.by_name.then_some(DiscoveryMode::NameHeuristic),
            min_item_chars: self.min_item_chars,
            ..CliOverrides::new()
        }
    }
}
