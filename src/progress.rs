//! Progress reporting for book processing passes.
//!
//! Library passes report through [`ProgressCallback`]; the CLI decides how
//! to render it. [`ProgressTracker`] prints per-file headers and run
//! summaries for commands that walk several inputs.

use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

/// Processing stages of the book passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    #[default]
    Initializing,
    /// Reading the book JSON or EPUB archive
    Loading,
    /// Turning markup documents into parts and chapters
    Extracting,
    /// Splitting front matter out of the first chapter
    FrontMatter,
    /// Removing duplicated chapters
    Deduplicating,
    /// Pairing chapters with TOC entries
    Matching,
    /// Building the realigned document
    Assembling,
    /// Title cleanup and word counts
    Cleaning,
    /// Comparing archive text
    Comparing,
    /// Writing the result
    Writing,
    Completed,
}

impl ProcessingStage {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "Initializing",
            ProcessingStage::Loading => "Loading",
            ProcessingStage::Extracting => "Extracting",
            ProcessingStage::FrontMatter => "FrontMatter",
            ProcessingStage::Deduplicating => "Deduplicating",
            ProcessingStage::Matching => "Matching",
            ProcessingStage::Assembling => "Assembling",
            ProcessingStage::Cleaning => "Cleaning",
            ProcessingStage::Comparing => "Comparing",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Completed => "Completed",
        }
    }

    /// Short human description of the stage
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "starting",
            ProcessingStage::Loading => "reading input",
            ProcessingStage::Extracting => "reading markup documents",
            ProcessingStage::FrontMatter => "splitting front matter",
            ProcessingStage::Deduplicating => "removing duplicate chapters",
            ProcessingStage::Matching => "matching chapters to the table of contents",
            ProcessingStage::Assembling => "building parts",
            ProcessingStage::Cleaning => "cleaning titles and counts",
            ProcessingStage::Comparing => "comparing text",
            ProcessingStage::Writing => "writing output",
            ProcessingStage::Completed => "done",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}

/// Progress hooks called by library passes
pub trait ProgressCallback {
    /// A stage begins; `total` is the number of units it will process (0 if unknown)
    fn on_stage(&self, _stage: ProcessingStage, _total: usize) {}

    /// One unit of the current stage finished
    fn on_progress(&self, _current: usize, _item: &str) {}

    /// The current stage finished
    fn on_stage_complete(&self, _stage: ProcessingStage, _message: &str) {}
}

/// Callback that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Stage display only
    #[default]
    Normal,
    /// Per-item progress
    Verbose,
    /// Per-item progress with item names
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity level
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

const PROGRESS_BAR_WIDTH: usize = 40;

/// Build a textual progress bar
pub fn build_progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = (percent as usize * PROGRESS_BAR_WIDTH) / 100;
    let empty = PROGRESS_BAR_WIDTH - filled;
    format!("[{}{}]", "=".repeat(filled), "-".repeat(empty))
}

/// Counters for a multi-input run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Console tracker for commands that process several inputs
#[derive(Debug)]
pub struct ProgressTracker {
    /// Current input number (1-based)
    pub current_input: usize,
    pub total_inputs: usize,
    pub current_label: String,
    pub current_stage: ProcessingStage,
    /// Units done in the current stage
    pub current_unit: usize,
    pub total_units: usize,
    pub current_item: String,
    start_time: Instant,
    output_mode: OutputMode,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(1, OutputMode::Normal)
    }
}

impl ProgressTracker {
    pub fn new(total_inputs: usize, output_mode: OutputMode) -> Self {
        Self {
            current_input: 0,
            total_inputs,
            current_label: String::new(),
            current_stage: ProcessingStage::Initializing,
            current_unit: 0,
            total_units: 0,
            current_item: String::new(),
            start_time: Instant::now(),
            output_mode,
        }
    }

    /// Start processing a new input
    pub fn start_input(&mut self, input_number: usize, label: &str) {
        self.current_input = input_number;
        self.current_label = label.to_string();
        self.current_stage = ProcessingStage::Initializing;
        self.current_unit = 0;
        self.total_units = 0;
        self.current_item.clear();
        self.start_time = Instant::now();

        if self.output_mode.should_show(OutputMode::Normal) {
            self.print_input_header();
        }
    }

    /// Set the current stage; a zero total keeps the previous one
    pub fn set_stage(&mut self, stage: ProcessingStage, total_units: usize) {
        self.current_stage = stage;
        if total_units > 0 {
            self.total_units = total_units;
        }
        self.current_unit = 0;

        if self.output_mode.should_show(OutputMode::Normal) {
            println!("  Stage: {}", self.current_stage);
        }
    }

    /// Record progress within the current stage
    pub fn update(&mut self, unit: usize, item_name: &str) {
        self.current_unit = unit;
        if !item_name.is_empty() {
            self.current_item = item_name.to_string();
        }

        if self.output_mode.should_show(OutputMode::Verbose) {
            self.print_progress();
        }
    }

    /// Mark the current book as done
    pub fn complete_input(&mut self) {
        self.current_stage = ProcessingStage::Completed;

        if self.output_mode.should_show(OutputMode::Normal) {
            println!("  Completed in {:.2}s", self.elapsed_secs());
            println!();
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn print_input_header(&self) {
        println!();
        println!("{}", "=".repeat(80));
        println!(
            "[Book {}/{}] {}",
            self.current_input, self.total_inputs, self.current_label
        );
        println!("{}", "=".repeat(80));
    }

    fn print_progress(&self) {
        if self.total_units > 0 && self.current_stage != ProcessingStage::Completed {
            let percent = ((self.current_unit as f64 / self.total_units as f64) * 100.0) as u8;
            print!(
                "\r    {} {:3}% ({}/{})",
                build_progress_bar(percent),
                percent,
                self.current_unit,
                self.total_units
            );
            if self.output_mode.should_show(OutputMode::VeryVerbose) && !self.current_item.is_empty()
            {
                print!(" {}", self.current_item);
            }
            let _ = io::stdout().flush();
        }
    }

    /// Print the final run summary
    pub fn print_summary(summary: &RunSummary) {
        println!();
        println!("{}", "=".repeat(80));
        println!("Run Summary");
        println!("{}", "=".repeat(80));
        println!("  Total inputs: {}", summary.total);
        println!("  Succeeded:    {}", summary.succeeded);
        println!("  Errors:       {}", summary.failed);
        println!("{}", "=".repeat(80));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_progress_tracker_new() {
        let tracker = ProgressTracker::new(5, OutputMode::Normal);
        assert_eq!(tracker.total_inputs, 5);
        assert_eq!(tracker.current_input, 0);
        assert_eq!(tracker.current_stage, ProcessingStage::Initializing);
    }

    #[test]
    fn test_start_file_and_stage() {
        let mut tracker = ProgressTracker::new(3, OutputMode::Quiet);
        tracker.start_input(1, "book.epub");
        assert_eq!(tracker.current_input, 1);
        assert_eq!(tracker.current_label, "book.epub");

        tracker.set_stage(ProcessingStage::Extracting, 12);
        assert_eq!(tracker.current_stage, ProcessingStage::Extracting);
        assert_eq!(tracker.total_units, 12);

        tracker.set_stage(ProcessingStage::Comparing, 0);
        assert_eq!(tracker.total_units, 12);
    }

    #[test]
    fn test_update_keeps_previous_item_name() {
        let mut tracker = ProgressTracker::new(1, OutputMode::Quiet);
        tracker.set_stage(ProcessingStage::Extracting, 10);
        tracker.update(3, "ch03.xhtml");
        tracker.update(4, "");
        assert_eq!(tracker.current_unit, 4);
        assert_eq!(tracker.current_item, "ch03.xhtml");
    }

    #[test]
    fn test_complete_input() {
        let mut tracker = ProgressTracker::new(1, OutputMode::Quiet);
        tracker.start_input(1, "book.epub");
        tracker.complete_input();
        assert_eq!(tracker.current_stage, ProcessingStage::Completed);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ProcessingStage::Matching.name(), "Matching");
        assert_eq!(
            ProcessingStage::Deduplicating.to_string(),
            "Deduplicating (removing duplicate chapters)"
        );
        assert_eq!(ProcessingStage::default(), ProcessingStage::Initializing);
    }

    #[test]
    fn test_run_summary_counts_every_input() {
        let summary = RunSummary {
            total: 3,
            succeeded: 2,
            failed: 1,
        };
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert_eq!(RunSummary::default().total, 0);
    }

    #[test]
    fn test_build_progress_bar() {
        assert_eq!(build_progress_bar(0), format!("[{}]", "-".repeat(40)));
        assert_eq!(
            build_progress_bar(50),
            "[====================--------------------]"
        );
        assert_eq!(build_progress_bar(150), format!("[{}]", "=".repeat(40)));
    }

    #[test]
    fn test_output_mode() {
        assert_eq!(OutputMode::from_verbosity(0), OutputMode::Normal);
        assert_eq!(OutputMode::from_verbosity(1), OutputMode::Verbose);
        assert_eq!(OutputMode::from_verbosity(9), OutputMode::VeryVerbose);

        assert!(!OutputMode::Quiet.should_show(OutputMode::Quiet));
        assert!(OutputMode::Normal.should_show(OutputMode::Normal));
        assert!(!OutputMode::Normal.should_show(OutputMode::Verbose));
        assert!(OutputMode::VeryVerbose.should_show(OutputMode::VeryVerbose));
    }

    #[derive(Default)]
    struct Recorder {
        stages: RefCell<Vec<ProcessingStage>>,
    }

    impl ProgressCallback for Recorder {
        fn on_stage(&self, stage: ProcessingStage, _total: usize) {
            self.stages.borrow_mut().push(stage);
        }
    }

    #[test]
    fn test_callback_default_methods() {
        let recorder = Recorder::default();
        let cb: &dyn ProgressCallback = &recorder;
        cb.on_stage(ProcessingStage::Loading, 0);
        cb.on_progress(1, "x");
        cb.on_stage_complete(ProcessingStage::Loading, "ok");
        assert_eq!(*recorder.stages.borrow(), vec![ProcessingStage::Loading]);

        NoProgress.on_stage(ProcessingStage::Writing, 1);
    }
}
