use crate::error::{FilterError, Result};
use crate::qual::{sum_error_rate, PhredHistogram, DEFAULT_PHRED_OFFSET};
use crate::record::Record;
use std::fmt;

/// Threshold of a configured filter, keeping the numeric type the user
/// supplied: floats for quality metrics, integers for lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Quality(f64),
    Length(usize),
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Quality(t) => write!(f, "{}", t),
            Threshold::Length(t) => write!(f, "{}", t),
        }
    }
}

/// Snapshot of one filter's configuration and counters for reporting.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub name: &'static str,
    pub threshold: Threshold,
    pub total: u64,
    pub passed: u64,
}

/// A stateful pass/fail predicate over a group of synchronized records.
///
/// Each call to `passes` increments `total`, and `passed` when the
/// predicate holds. Errors from the underlying statistics propagate
/// without touching either counter.
pub trait GroupFilter {
    fn name(&self) -> &'static str;
    fn passes(&mut self, group: &[Record<'_>]) -> Result<bool>;
    fn report(&self) -> FilterReport;
}

fn quality_of<'a>(record: &Record<'a>) -> Result<&'a [u8]> {
    record.qual.ok_or_else(|| FilterError::MissingQuality {
        record: String::from_utf8_lossy(record.id).into_owned(),
    })
}

/// Passes groups whose combined per-base error rate is at or below the
/// threshold. Numerators and denominators are summed across the group, so
/// members of unequal length are weighted by their base counts.
pub struct AverageErrorRateFilter {
    threshold: f64,
    phred_offset: u8,
    total: u64,
    passed: u64,
}

impl AverageErrorRateFilter {
    pub fn new(threshold: f64) -> Self {
        Self::with_offset(threshold, DEFAULT_PHRED_OFFSET)
    }

    pub fn with_offset(threshold: f64, phred_offset: u8) -> Self {
        AverageErrorRateFilter {
            threshold,
            phred_offset,
            total: 0,
            passed: 0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn phred_offset(&self) -> u8 {
        self.phred_offset
    }
}

impl GroupFilter for AverageErrorRateFilter {
    fn name(&self) -> &'static str {
        "average error rate"
    }

    fn passes(&mut self, group: &[Record<'_>]) -> Result<bool> {
        let mut error_sum = 0.0;
        let mut bases = 0usize;
        for record in group {
            let qual = quality_of(record)?;
            error_sum += sum_error_rate(qual, self.phred_offset)?;
            bases += qual.len();
        }
        if bases == 0 {
            return Err(FilterError::EmptyInput {
                statistic: "average error rate",
            });
        }
        let pass = error_sum / bases as f64 <= self.threshold;
        self.total += 1;
        if pass {
            self.passed += 1;
        }
        Ok(pass)
    }

    fn report(&self) -> FilterReport {
        FilterReport {
            name: self.name(),
            threshold: Threshold::Quality(self.threshold),
            total: self.total,
            passed: self.passed,
        }
    }
}

/// Passes groups whose combined median phred score is at or above the
/// threshold. One histogram is built over all members; a NaN median
/// (all-empty quality strings) never passes.
pub struct MedianQualityFilter {
    threshold: f64,
    phred_offset: u8,
    total: u64,
    passed: u64,
}

impl MedianQualityFilter {
    pub fn new(threshold: f64) -> Self {
        Self::with_offset(threshold, DEFAULT_PHRED_OFFSET)
    }

    pub fn with_offset(threshold: f64, phred_offset: u8) -> Self {
        MedianQualityFilter {
            threshold,
            phred_offset,
            total: 0,
            passed: 0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn phred_offset(&self) -> u8 {
        self.phred_offset
    }
}

impl GroupFilter for MedianQualityFilter {
    fn name(&self) -> &'static str {
        "median quality"
    }

    fn passes(&mut self, group: &[Record<'_>]) -> Result<bool> {
        let mut histogram = PhredHistogram::new();
        for record in group {
            histogram.add(quality_of(record)?, self.phred_offset)?;
        }
        let pass = histogram.median()? >= self.threshold;
        self.total += 1;
        if pass {
            self.passed += 1;
        }
        Ok(pass)
    }

    fn report(&self) -> FilterReport {
        FilterReport {
            name: self.name(),
            threshold: Threshold::Quality(self.threshold),
            total: self.total,
            passed: self.passed,
        }
    }
}

/// Passes groups in which at least one member reaches the minimum length.
/// Sibling reads sequence the same molecule, so the canonical length of
/// the group is the maximum across its members.
pub struct MinLengthFilter {
    threshold: usize,
    total: u64,
    passed: u64,
}

impl MinLengthFilter {
    pub fn new(threshold: usize) -> Self {
        MinLengthFilter {
            threshold,
            total: 0,
            passed: 0,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl GroupFilter for MinLengthFilter {
    fn name(&self) -> &'static str {
        "minimum length"
    }

    fn passes(&mut self, group: &[Record<'_>]) -> Result<bool> {
        let pass = group.iter().any(|record| record.len() >= self.threshold);
        self.total += 1;
        if pass {
            self.passed += 1;
        }
        Ok(pass)
    }

    fn report(&self) -> FilterReport {
        FilterReport {
            name: self.name(),
            threshold: Threshold::Length(self.threshold),
            total: self.total,
            passed: self.passed,
        }
    }
}

/// Passes groups in which every member stays within the maximum length.
pub struct MaxLengthFilter {
    threshold: usize,
    total: u64,
    passed: u64,
}

impl MaxLengthFilter {
    pub fn new(threshold: usize) -> Self {
        MaxLengthFilter {
            threshold,
            total: 0,
            passed: 0,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl GroupFilter for MaxLengthFilter {
    fn name(&self) -> &'static str {
        "maximum length"
    }

    fn passes(&mut self, group: &[Record<'_>]) -> Result<bool> {
        let pass = group.iter().all(|record| record.len() <= self.threshold);
        self.total += 1;
        if pass {
            self.passed += 1;
        }
        Ok(pass)
    }

    fn report(&self) -> FilterReport {
        FilterReport {
            name: self.name(),
            threshold: Threshold::Length(self.threshold),
            total: self.total,
            passed: self.passed,
        }
    }
}

/// An ordered conjunction of filters applied to each record group.
///
/// Evaluation short-circuits on the first failing filter, so later
/// filters see fewer groups. Ordering cheap filters (length) before
/// expensive ones (quality) is purely a performance concern; the boolean
/// outcome is order-independent.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn GroupFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        FilterChain {
            filters: Vec::new(),
        }
    }

    pub fn push(&mut self, filter: Box<dyn GroupFilter>) {
        self.filters.push(filter);
    }

    pub fn with(mut self, filter: Box<dyn GroupFilter>) -> Self {
        self.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn evaluate(&mut self, group: &[Record<'_>]) -> Result<bool> {
        for filter in &mut self.filters {
            if !filter.passes(group)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn reports(&self) -> Vec<FilterReport> {
        self.filters.iter().map(|f| f.report()).collect()
    }

    pub fn print_summary(&self) {
        eprintln!("Filtering statistics:");
        for report in self.reports() {
            let percentage = if report.total == 0 {
                0.0
            } else {
                report.passed as f64 / report.total as f64 * 100.0
            };
            eprintln!(
                "  {} (threshold {}): {} / {} passed ({:.2}%)",
                report.name, report.threshold, report.passed, report.total, percentage
            );
        }
    }
}
