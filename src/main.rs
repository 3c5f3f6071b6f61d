//! bookmend - EPUB text extraction and chapter reconciliation
//!
//! CLI entry point

use anyhow::{bail, Context};
use bookmend::align::AlignOptions;
use bookmend::cli::{
    AlignArgs, AnalyzeArgs, CompareArgs, DiffContentArgs, ExtractArgs, OutputArgs, RewriteArgs,
    VerifyNavArgs,
};
use bookmend::compare::{
    compare, extract_plain_text, find_added_segments, verify_navigation, LabeledStats, PlainText,
};
use bookmend::epub::{EpubArchive, EpubError};
use bookmend::{
    apply_corrections, exit_codes, split_part_titles, AlignError, Book, ChapterAligner, CharStats,
    Cli, Commands, CompareError, Config, ConfigError, DocumentError, EpubExtractor, ExitCode,
    ExtractError, MatchMethod, OutputMode, ProcessingStage, ProgressCallback, ProgressTracker,
    RunSummary, SegmentCategory, StructureReport, TableOfContents, TocError,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.config.as_deref());
    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_verbosity(cli.verbose)
    };

    let result = match &cli.command {
        Commands::Extract(args) => run_extract(args, config, mode),
        Commands::WordCount(args) => run_word_count(args, mode),
        Commands::Analyze(args) => run_analyze(args),
        Commands::Align(args) => run_align(args, config, mode),
        Commands::SplitTitles(args) => run_split_titles(args, &config, mode),
        Commands::Fix(args) => run_fix(args, &config, mode),
        Commands::Compare(args) => run_compare(args, mode),
        Commands::DiffContent(args) => run_diff_content(args),
        Commands::VerifyNav(args) => run_verify_nav(args),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("Error: {:#}", e);
            debug!(code = code.code(), "{}", code.description());
            code.code()
        }
    });
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Map an error to the process exit code
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let epub_code = |e: &EpubError| match e {
        EpubError::NotFound(_) => ExitCode::InputNotFound,
        _ => ExitCode::ProcessingError,
    };

    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCode::InvalidArgs;
        }
        if let Some(e) = cause.downcast_ref::<DocumentError>() {
            return match e {
                DocumentError::NotFound(_) => ExitCode::InputNotFound,
                DocumentError::Write { .. } => ExitCode::OutputError,
                _ => ExitCode::GeneralError,
            };
        }
        if let Some(e) = cause.downcast_ref::<TocError>() {
            return match e {
                TocError::NotFound(_) => ExitCode::InputNotFound,
                _ => ExitCode::GeneralError,
            };
        }
        if let Some(e) = cause.downcast_ref::<ExtractError>() {
            return match e {
                ExtractError::Epub(inner) => epub_code(inner),
                _ => ExitCode::ProcessingError,
            };
        }
        if let Some(e) = cause.downcast_ref::<CompareError>() {
            return match e {
                CompareError::Epub(inner) => epub_code(inner),
                _ => ExitCode::ProcessingError,
            };
        }
        if let Some(e) = cause.downcast_ref::<EpubError>() {
            return epub_code(e);
        }
        if cause.downcast_ref::<AlignError>().is_some() {
            return ExitCode::ProcessingError;
        }
    }
    ExitCode::GeneralError
}

// ============ Progress Callback Implementation ============

/// Stage display through the tracker, with a bar while documents are read
struct CliProgress {
    mode: OutputMode,
    tracker: RefCell<ProgressTracker>,
    bar: RefCell<Option<ProgressBar>>,
}

impl CliProgress {
    fn new(mode: OutputMode, name: &str) -> Self {
        let mut tracker = ProgressTracker::new(1, mode);
        tracker.start_input(1, name);
        Self {
            mode,
            tracker: RefCell::new(tracker),
            bar: RefCell::new(None),
        }
    }

    fn finish_bar(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }

    fn complete(&self) {
        self.finish_bar();
        self.tracker.borrow_mut().complete_input();
    }
}

impl ProgressCallback for CliProgress {
    fn on_stage(&self, stage: ProcessingStage, total: usize) {
        self.finish_bar();
        self.tracker.borrow_mut().set_stage(stage, total);

        if stage == ProcessingStage::Extracting && total > 0 && self.mode.should_show(OutputMode::Normal)
        {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            {
                bar.set_style(style);
            }
            *self.bar.borrow_mut() = Some(bar);
        }
    }

    fn on_progress(&self, current: usize, item: &str) {
        match self.bar.borrow().as_ref() {
            Some(bar) => {
                bar.set_position(current as u64);
                if self.mode.should_show(OutputMode::Verbose) {
                    bar.set_message(item.to_string());
                }
            }
            None => self.tracker.borrow_mut().update(current, item),
        }
    }

    fn on_stage_complete(&self, stage: ProcessingStage, message: &str) {
        self.finish_bar();
        info!(stage = stage.name(), "{}", message);
    }
}

// ============ Helper Functions ============

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Group digits in thousands: 1234567 -> 1,234,567
fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Write a rewritten book, keeping a backup unless disabled
fn write_book(book: &Book, input: &Path, output: &OutputArgs, suffix: &str) -> anyhow::Result<PathBuf> {
    let target = output.target(input);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    if output.no_backup {
        book.save(&target)?;
    } else if let Some(backup) = book.save_with_backup(&target, suffix)? {
        info!(backup = %backup.display(), "kept backup");
    }
    Ok(target)
}

fn load_plain_text(path: &Path) -> anyhow::Result<PlainText> {
    let mut archive = EpubArchive::open(path).map_err(CompareError::from)?;
    let plain = extract_plain_text(&mut archive)?;
    if plain.documents.is_empty() {
        return Err(CompareError::NoText(path.to_path_buf()).into());
    }
    Ok(plain)
}

// ============ Extract Command ============

fn run_extract(args: &ExtractArgs, config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let config = config.merge_with_cli(&args.overrides());
    config.validate()?;
    let progress = CliProgress::new(mode, &file_label(&args.input));

    let result = EpubExtractor::extract(&args.input, &config.extract, &progress)?;

    progress.on_stage(ProcessingStage::Writing, 0);
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    result.book.save(&args.output)?;
    progress.complete();

    if mode.should_show(OutputMode::Normal) {
        let stats = &result.stats;
        println!("Extracted {}", args.input.display());
        println!("  Documents: {} ({} skipped)", stats.documents, stats.skipped_documents);
        println!("  Parts:     {}", stats.parts);
        println!("  Chapters:  {}", stats.chapters);
        println!("  Items:     {}", format_count(stats.items));
        println!("  Words:     {}", format_count(stats.words));
        println!("Saved: {}", args.output.display());
    }
    Ok(())
}

// ============ Word Count Command ============

fn run_word_count(args: &RewriteArgs, mode: OutputMode) -> anyhow::Result<()> {
    let mut book = Book::load(&args.input)?;
    let changed = book.recompute_word_counts();
    let target = write_book(&book, &args.input, &args.output, "_backup_wordcount")?;

    if mode.should_show(OutputMode::Normal) {
        println!("Word counts updated: {} of {} items changed", changed, book.item_count());
        println!("Total words: {}", format_count(book.word_count()));
        println!("Saved: {}", target.display());
    }
    Ok(())
}

// ============ Analyze Command ============

fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let book = Book::load(&args.input)?;
    let toc = args.toc.as_deref().map(TableOfContents::load).transpose()?;
    let report = StructureReport::analyze(&book, toc.as_ref());
    print_structure_report(&args.input, &report);
    Ok(())
}

fn print_structure_report(input: &Path, report: &StructureReport) {
    println!("=== Structure of {} ===", input.display());
    println!();
    println!("Parts: {}", report.parts.len());
    for (i, part) in report.parts.iter().enumerate() {
        println!(
            "  {:>3}. {} ({} chapters, {} items, {} words)",
            i + 1,
            part.title,
            part.chapters,
            part.items,
            format_count(part.words)
        );
        if let Some(subtitle) = &part.subtitle {
            println!("       {}", subtitle);
        }
    }
    println!();
    println!("Chapters:       {}", report.total_chapters);
    println!("Unique titles:  {}", report.unique_titles);
    println!("Items:          {}", format_count(report.total_items));
    println!("Words:          {}", format_count(report.total_words));
    println!("Stale counts:   {}", report.stale_word_counts);

    if !report.duplicate_titles.is_empty() {
        println!();
        println!("Duplicated titles:");
        for (title, count) in &report.duplicate_titles {
            println!("  {}x {}", count, title);
        }
    }
    if !report.empty_chapters.is_empty() {
        println!();
        println!("Empty chapters:");
        for loc in &report.empty_chapters {
            println!("  part {} chapter {}", loc.part + 1, loc.chapter + 1);
        }
    }
    if !report.blank_items.is_empty() {
        println!();
        println!("Blank items: {}", report.blank_items.len());
    }

    if let Some(toc) = &report.toc {
        println!();
        println!("TOC comparison:");
        println!("  Expected chapters: {}", toc.expected);
        println!("  Found chapters:    {}", toc.found);
        for (key, count) in &toc.parts {
            println!("  Part {}: {} chapters", key, count);
        }
        match toc.first_divergence {
            Some(index) => {
                println!("  First divergence at position {}:", index + 1);
                println!("    expected: {}", toc.expected_at.as_deref().unwrap_or("(none)"));
                println!("    found:    {}", toc.found_at.as_deref().unwrap_or("(none)"));
            }
            None => println!("  Order matches the TOC"),
        }
        for title in &toc.missing {
            println!("  missing:    {}", title);
        }
        for title in &toc.unexpected {
            println!("  unexpected: {}", title);
        }
    }

    println!();
    if report.is_clean() {
        println!("Status: OK");
    } else {
        println!("Status: issues found");
    }
}

// ============ Align Command ============

fn describe_method(method: MatchMethod) -> String {
    match method {
        MatchMethod::Position => "position".to_string(),
        MatchMethod::Number => "number".to_string(),
        MatchMethod::Keyword(score) => format!("keyword score {}", score),
        MatchMethod::Fallback => "fallback".to_string(),
        MatchMethod::Unfilled => "unfilled".to_string(),
    }
}

fn run_align(args: &AlignArgs, config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let config = config.merge_with_cli(&args.overrides());
    config.validate()?;
    let options = config.align_options();

    let book = Book::load(&args.input)?;
    let toc = TableOfContents::load(&args.toc)?;
    info!(entries = toc.len(), chapters = book.chapter_count(), "loaded inputs");

    let progress = CliProgress::new(mode, &file_label(&args.input));
    let result = ChapterAligner::align(&book, &toc, &options, &progress)?;

    if args.dry_run {
        progress.complete();
        print_execution_plan(args, &options, &result.report);
        return Ok(());
    }

    progress.on_stage(ProcessingStage::Writing, 0);
    let target = write_book(&result.book, &args.input, &args.output, "_backup_align")?;
    progress.complete();

    if mode.should_show(OutputMode::Normal) {
        let report = &result.report;
        println!("Aligned {} against {}", args.input.display(), args.toc.display());
        println!("  Chapters collected: {}", report.candidates);
        println!("  Unique chapters:    {}", report.unique);
        println!("  TOC entries:        {}", report.matches.len());
        println!("  Fallback matches:   {}", report.fallbacks());
        println!("  Unfilled entries:   {}", report.unfilled());
        println!("  Unmatched chapters: {}", report.unmatched.len());
        println!(
            "  Repeated titles:    {} removed, {} trimmed",
            report.titles_removed, report.titles_trimmed
        );
        println!("  Output: {} parts, {} chapters", report.parts, report.chapters);
        println!("Saved: {}", target.display());
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Print the alignment plan for dry-run mode
fn print_execution_plan(args: &AlignArgs, options: &AlignOptions, report: &bookmend::AlignReport) {
    println!("=== Dry Run - Alignment Plan ===");
    println!();
    println!("Input:  {}", args.input.display());
    println!("TOC:    {}", args.toc.display());
    println!("Output: {}", args.output.target(&args.input).display());
    println!();
    println!("Options:");
    println!("  Dedup:  {:?}", options.dedup);
    println!("  Match:  {:?}", options.matching);
    println!("  Fuzzy threshold: {}", options.fuzzy_threshold);
    println!("  Skip titles: {}", options.skip_titles.join(", "));
    println!(
        "  Repeated-title cleanup: {}",
        if options.clean_repeated_titles { "ENABLED" } else { "DISABLED" }
    );
    println!();

    if !report.front_matter.is_empty() {
        println!("Front matter:");
        for (title, items) in &report.front_matter {
            println!("  {}: {} items", title, items);
        }
        println!();
    }

    println!(
        "Chapters: {} collected, {} unique",
        report.candidates, report.unique
    );
    println!();
    println!("Mapping:");
    for (i, (heading, chapter, method)) in report.matches.iter().enumerate() {
        println!(
            "  {:>3}. {} <- {} [{}]",
            i + 1,
            heading,
            chapter.as_deref().unwrap_or("(none)"),
            describe_method(*method)
        );
    }

    if !report.unmatched.is_empty() {
        println!();
        println!("Unmatched chapters:");
        for title in &report.unmatched {
            println!("  {}", title);
        }
    }
    if !report.dropped_sections.is_empty() {
        println!();
        println!("Dropped sections: {}", report.dropped_sections.join(", "));
    }
}

// ============ Split Titles Command ============

fn run_split_titles(args: &RewriteArgs, config: &Config, mode: OutputMode) -> anyhow::Result<()> {
    let mut book = Book::load(&args.input)?;
    let changed = split_part_titles(&mut book, &config.titles);
    book.recompute_word_counts();
    let target = write_book(&book, &args.input, &args.output, "_backup_titles")?;

    if mode.should_show(OutputMode::Normal) {
        println!("Part titles split: {} of {}", changed, book.parts.len());
        for part in book.parts.iter().filter(|p| p.part_subtitle.is_some()) {
            println!(
                "  {} / {}",
                part.part_title,
                part.part_subtitle.as_deref().unwrap_or_default()
            );
        }
        println!("Saved: {}", target.display());
    }
    Ok(())
}

// ============ Fix Command ============

fn run_fix(args: &RewriteArgs, config: &Config, mode: OutputMode) -> anyhow::Result<()> {
    let mut book = Book::load(&args.input)?;
    if config.corrections.is_empty() {
        warn!("no [[corrections]] configured, only word counts are refreshed");
    }

    let stats = apply_corrections(&mut book, &config.corrections);
    let stale = book.recompute_word_counts();
    let target = write_book(&book, &args.input, &args.output, "_backup_fix")?;

    if mode.should_show(OutputMode::Normal) {
        println!("Rules:        {}", config.corrections.len());
        println!("Items:        {}", format_count(stats.items));
        println!("Replacements: {}", stats.replacements);
        println!("Stale counts: {}", stale);
        println!("Saved: {}", target.display());
    }
    Ok(())
}

// ============ Compare Command ============

fn run_compare(args: &CompareArgs, mode: OutputMode) -> anyhow::Result<()> {
    let inputs: Vec<&PathBuf> = std::iter::once(&args.baseline).chain(args.others.iter()).collect();
    let mut tracker = ProgressTracker::new(inputs.len(), mode);
    let mut summary = RunSummary {
        total: inputs.len(),
        ..RunSummary::default()
    };

    let mut columns: Vec<LabeledStats> = Vec::new();
    for (idx, path) in inputs.iter().enumerate() {
        tracker.start_input(idx + 1, &file_label(path));
        tracker.set_stage(ProcessingStage::Comparing, 0);

        let plain = match load_plain_text(path) {
            Ok(plain) => plain,
            // without a baseline there is nothing to compare against
            Err(e) if idx == 0 => return Err(e),
            Err(e) => {
                eprintln!("Error processing {}: {:#}", path.display(), e);
                summary.failed += 1;
                continue;
            }
        };

        if args.documents && mode.should_show(OutputMode::Normal) {
            for doc in &plain.documents {
                println!("    {}: {} chars", doc.name, format_count(doc.chars));
            }
        }
        columns.push(LabeledStats::new(file_label(path), CharStats::of(&plain.text)));
        summary.succeeded += 1;
        tracker.complete_input();
    }

    let mut columns = columns.into_iter();
    let Some(baseline) = columns.next() else {
        bail!("no EPUB could be read");
    };
    let comparison = compare(baseline, columns.collect());

    println!("=== Character comparison ===");
    println!();
    let header: Vec<String> = comparison
        .columns()
        .map(|c| format!("{:>16}", c.label))
        .collect();
    println!("{:<20}{}", "Metric", header.join(""));
    println!("{}", "-".repeat(20 + 16 * header.len()));
    for (metric, values) in comparison.table() {
        let cells: Vec<String> = values.iter().map(|v| format!("{:>16}", format_count(*v))).collect();
        println!("{:<20}{}", metric, cells.join(""));
    }
    println!();
    for diff in comparison.differences() {
        println!(
            "{} vs {}: {:+} characters ({:+.1}%)",
            diff.label, comparison.baseline.label, diff.diff, diff.percent
        );
    }

    if mode.should_show(OutputMode::Normal) && inputs.len() > 1 {
        ProgressTracker::print_summary(&summary);
    }
    if summary.failed > 0 {
        bail!("{} EPUB(s) could not be read", summary.failed);
    }
    Ok(())
}

// ============ Diff Content Command ============

fn run_diff_content(args: &DiffContentArgs) -> anyhow::Result<()> {
    let original = load_plain_text(&args.original)?;
    let other = load_plain_text(&args.other)?;
    info!(
        original = original.text.len(),
        other = other.text.len(),
        "extracted both texts"
    );

    let added = find_added_segments(&original.text, &other.text);
    println!(
        "=== Content in {} not in {} ===",
        file_label(&args.other),
        file_label(&args.original)
    );
    println!();
    println!("Added segments: {}", added.segments.len());
    println!("Unique words:   {}", added.unique_words.len());

    for category in SegmentCategory::ALL {
        let segments: Vec<_> = added.in_category(category).collect();
        if segments.is_empty() {
            continue;
        }
        println!();
        println!("{} ({} segments):", category, segments.len());
        for (i, segment) in segments.iter().take(args.limit).enumerate() {
            let preview: String = segment.text.chars().take(200).collect();
            let ellipsis = if segment.length > 200 { "..." } else { "" };
            println!("  {}. ({} chars) \"{}{}\"", i + 1, segment.length, preview, ellipsis);
        }
        if segments.len() > args.limit {
            println!("  [...and {} more]", segments.len() - args.limit);
        }
    }

    let relevant: Vec<&str> = added
        .unique_words
        .iter()
        .filter(|w| w.chars().count() > 3)
        .take(20)
        .map(String::as_str)
        .collect();
    if !relevant.is_empty() {
        println!();
        println!("Unique words: {}", relevant.join(", "));
    }
    Ok(())
}

// ============ Verify Nav Command ============

fn run_verify_nav(args: &VerifyNavArgs) -> anyhow::Result<()> {
    let mut archive = EpubArchive::open(&args.input).map_err(CompareError::from)?;
    let report = verify_navigation(&mut archive)?;

    println!("=== Navigation of {} ===", args.input.display());
    println!("NCX: {}", report.ncx_path);
    println!("Navigation points: {}", report.checks.len());
    println!();
    println!("  {:>5} | {:<15} | {:<30} | src", "order", "id", "label");
    println!("  {}", "-".repeat(70));
    for check in &report.checks {
        let order = check
            .point
            .play_order
            .map(|o| o.to_string())
            .unwrap_or_else(|| "-".to_string());
        let indent = "  ".repeat(check.point.depth);
        println!(
            "  {:>5} | {:<15} | {:<30} | {} {}",
            order,
            check.point.id,
            format!("{}{}", indent, check.point.label),
            check.point.src,
            if check.found { "ok" } else { "MISSING" }
        );
    }

    println!();
    println!("Targets found:   {}", report.found());
    println!("Targets missing: {}", report.checks.len() - report.found());

    if !report.is_ok() {
        for check in report.missing() {
            eprintln!("missing target: {} ({})", check.point.src, check.target);
        }
        bail!("{} navigation target(s) missing", report.checks.len() - report.found());
    }
    println!("All navigation targets resolve");
    Ok(())
}
