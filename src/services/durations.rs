//! Attempt duration matrices derived from a run's split histories.
//!
//! The engine reconstructs, from the independently populated per-segment
//! history lists, a dense attempt × segment matrix of durations in seconds,
//! joined on `attempt_number`. It handles attempts that reset mid-run,
//! skipped splits, and the cumulative (split) view with independently
//! recorded totals.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{History, Run};

/// Column label for the cumulative time at the final recorded split.
pub const TOTAL_COLUMN: &str = "total";
/// Column label for the run-level recorded total of an attempt.
pub const TRUE_TOTAL_COLUMN: &str = "true_total";

/// An attempt × column matrix of durations in seconds.
///
/// Rows are indexed by attempt number in ascending order; columns carry
/// segment names (split tables append [`TOTAL_COLUMN`] and
/// [`TRUE_TOTAL_COLUMN`]). A `None` cell means the quantity is undefined for
/// that attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationTable {
    attempts: Vec<i64>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl DurationTable {
    fn new(columns: Vec<String>) -> Self {
        Self {
            attempts: Vec::new(),
            columns,
            values: Vec::new(),
        }
    }

    fn push_row(&mut self, attempt: i64, cells: Vec<Option<f64>>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.attempts.push(attempt);
        self.values.push(cells);
    }

    /// Attempt numbers labelling the rows.
    pub fn attempts(&self) -> &[i64] {
        &self.attempts
    }

    /// Column labels.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cells of row `row`, or `None` when out of range.
    pub fn row(&self, row: usize) -> Option<&[Option<f64>]> {
        self.values.get(row).map(|cells| cells.as_slice())
    }

    /// Cells of the row labelled with `attempt`.
    pub fn attempt_row(&self, attempt: i64) -> Option<&[Option<f64>]> {
        let row = self.attempts.iter().position(|&a| a == attempt)?;
        self.row(row)
    }

    /// Value at (`row`, `column`); `None` when out of range or undefined.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row)?.get(column).copied()?
    }

    /// All cells of the column labelled `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let column = self.columns.iter().position(|c| c == name)?;
        Some(self.values.iter().map(|row| row[column]).collect())
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        self.values.iter().map(|cells| cells.as_slice())
    }
}

const HISTORIES_NOT_LOADED: &str =
    "run histories are not loaded; fetch the run with historic data first";

impl Run {
    /// Run-level histories of the attempts that reached the final segment.
    ///
    /// The last segment's history set is, by construction, exactly the set
    /// of attempts that finished the run. Returns an empty list (rather than
    /// an error) when histories or segments are missing.
    pub fn completed_attempts(&self) -> Vec<&History> {
        let histories = match &self.histories {
            Some(histories) => histories,
            None => return Vec::new(),
        };
        let finished: HashSet<i64> = match self.segments.last().and_then(|s| s.histories.as_ref())
        {
            Some(last) => last.iter().map(|h| h.attempt_number).collect(),
            None => return Vec::new(),
        };
        histories
            .iter()
            .filter(|h| finished.contains(&h.attempt_number))
            .collect()
    }

    /// Per-segment duration matrix in seconds.
    ///
    /// Rows are attempts from the run-level histories: all of them, or with
    /// `complete` only those carrying a stored overall duration. (That test
    /// is distinct from "reached the last segment"; see
    /// [`Run::completed_attempts`].) Columns are segments in order. Rows
    /// where no segment recorded anything are always dropped.
    ///
    /// With `clean`, a literal zero is treated as a sentinel for a split
    /// that was not actually run: zeros become missing, and only rows with
    /// every cell populated survive. Without it, missing cells are filled
    /// with zero and the row is kept.
    pub fn segment_durations(&self, complete: bool, clean: bool) -> Result<DurationTable> {
        let histories = self
            .histories
            .as_deref()
            .ok_or_else(|| Error::precondition(HISTORIES_NOT_LOADED))?;

        let selected: Vec<&History> = histories
            .iter()
            .filter(|h| !complete || h.is_complete())
            .collect();
        let row_index: HashMap<i64, usize> = selected
            .iter()
            .enumerate()
            .map(|(row, h)| (h.attempt_number, row))
            .collect();

        let columns: Vec<String> = self.segments.iter().map(|s| s.name.clone()).collect();
        let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; columns.len()]; selected.len()];
        for (column, segment) in self.segments.iter().enumerate() {
            for history in segment.histories.iter().flatten() {
                if let Some(&row) = row_index.get(&history.attempt_number) {
                    cells[row][column] = history.duration_ms().map(|ms| ms as f64 / 1000.0);
                }
            }
        }

        let mut table = DurationTable::new(columns);
        for (history, mut row) in selected.iter().zip(cells) {
            if row.iter().all(|cell| cell.is_none()) {
                continue;
            }
            if clean {
                for cell in &mut row {
                    if *cell == Some(0.0) {
                        *cell = None;
                    }
                }
                if row.iter().any(|cell| cell.is_none()) {
                    continue;
                }
            } else {
                for cell in &mut row {
                    cell.get_or_insert(0.0);
                }
            }
            table.push_row(history.attempt_number, row);
        }
        Ok(table)
    }

    /// Cumulative split-duration matrix: elapsed seconds since the run began
    /// at each segment boundary.
    ///
    /// Two columns are appended to the cumulative sums of
    /// [`Run::segment_durations`]: [`TOTAL_COLUMN`], a duplicate of the last
    /// cumulative column, and [`TRUE_TOTAL_COLUMN`], the attempt's
    /// independently recorded run-level duration, kept separate so callers
    /// can detect drift between the segment sum and the authoritative total.
    /// `true_total` is `None` where the run-level record has no resolvable
    /// duration.
    pub fn split_durations(&self, complete: bool, clean: bool) -> Result<DurationTable> {
        let segment_table = self.segment_durations(complete, clean)?;
        let histories = self
            .histories
            .as_deref()
            .ok_or_else(|| Error::precondition(HISTORIES_NOT_LOADED))?;

        let recorded_totals: HashMap<i64, Option<i64>> = histories
            .iter()
            .map(|h| (h.attempt_number, h.duration_ms()))
            .collect();

        let mut columns = segment_table.columns().to_vec();
        columns.push(TOTAL_COLUMN.to_string());
        columns.push(TRUE_TOTAL_COLUMN.to_string());

        let mut table = DurationTable::new(columns);
        for (row, &attempt) in segment_table.attempts().iter().enumerate() {
            let segment_row = segment_table.row(row).unwrap_or(&[]);
            let mut cells = Vec::with_capacity(segment_row.len() + 2);
            let mut elapsed = 0.0;
            for cell in segment_row {
                elapsed += cell.unwrap_or(0.0);
                cells.push(Some(elapsed));
            }

            let total = cells.last().copied().flatten();
            cells.push(total);
            let true_total = recorded_totals
                .get(&attempt)
                .copied()
                .flatten()
                .map(|ms| ms as f64 / 1000.0);
            cells.push(true_total);
            table.push_row(attempt, cells);
        }
        Ok(table)
    }
}
