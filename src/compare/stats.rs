//! Character statistics and baseline comparison

use super::types::{CharStats, Difference, LabeledStats};

fn is_counted_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('À'..='ÿ').contains(&c)
}

impl CharStats {
    pub fn of(text: &str) -> Self {
        let total = text.chars().count();
        Self {
            total,
            without_spaces: total - text.chars().filter(|&c| c == ' ').count(),
            letters: text.chars().filter(|&c| is_counted_letter(c)).count(),
            words: text.split_whitespace().count(),
        }
    }

    /// Metric rows as (name, value)
    pub fn metrics(&self) -> [(&'static str, usize); 4] {
        [
            ("Total characters", self.total),
            ("Without spaces", self.without_spaces),
            ("Letters only", self.letters),
            ("Words", self.words),
        ]
    }
}

/// Signed difference and percentage of `value` against `baseline`
///
/// The percentage is 0 when the baseline is 0.
pub fn difference(baseline: usize, value: usize) -> (i64, f64) {
    let diff = value as i64 - baseline as i64;
    let percent = if baseline == 0 {
        0.0
    } else {
        diff as f64 / baseline as f64 * 100.0
    };
    (diff, percent)
}

/// Counts of several EPUBs against a baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub baseline: LabeledStats,
    pub others: Vec<LabeledStats>,
}

impl Comparison {
    /// Baseline first, then the others in order
    pub fn columns(&self) -> impl Iterator<Item = &LabeledStats> {
        std::iter::once(&self.baseline).chain(self.others.iter())
    }

    /// One row per metric with a value per column
    pub fn table(&self) -> Vec<(&'static str, Vec<usize>)> {
        let metrics = self.baseline.stats.metrics();
        metrics
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (*name, self.columns().map(|c| c.stats.metrics()[i].1).collect()))
            .collect()
    }

    /// Total-character difference of every other EPUB
    pub fn differences(&self) -> Vec<Difference> {
        self.others
            .iter()
            .map(|other| {
                let (diff, percent) = difference(self.baseline.stats.total, other.stats.total);
                Difference {
                    label: other.label.clone(),
                    diff,
                    percent,
                }
            })
            .collect()
    }
}

pub fn compare(baseline: LabeledStats, others: Vec<LabeledStats>) -> Comparison {
    Comparison { baseline, others }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_stats() {
        let stats = CharStats::of("Filotéia, ou Introdução à vida devota!");
        assert_eq!(stats.total, 38);
        assert_eq!(stats.without_spaces, 33);
        assert_eq!(stats.letters, 31);
        assert_eq!(stats.words, 6);
        assert_eq!(CharStats::of(""), CharStats::default());
    }

    #[test]
    fn test_difference() {
        assert_eq!(difference(200, 250), (50, 25.0));
        assert_eq!(difference(200, 150), (-50, -25.0));
        assert_eq!(difference(0, 10), (10, 0.0));
    }

    #[test]
    fn test_comparison_table() {
        let cmp = compare(
            LabeledStats::new("original", CharStats::of("one two")),
            vec![
                LabeledStats::new("en", CharStats::of("one two three")),
                LabeledStats::new("pt", CharStats::of("um")),
            ],
        );
        let table = cmp.table();
        assert_eq!(table.len(), 4);
        assert_eq!(table[0], ("Total characters", vec![7, 13, 2]));
        assert_eq!(table[3], ("Words", vec![2, 3, 1]));

        let diffs = cmp.differences();
        assert_eq!(diffs[0].label, "en");
        assert_eq!(diffs[0].diff, 6);
        assert!((diffs[1].percent - (-5.0 / 7.0 * 100.0)).abs() < 1e-9);
    }
}
