//! Table detection from decoded page geometry.
//!
//! Detects tabular regions by analyzing run X positions for column
//! alignment. The algorithm:
//!
//! 1. Find column boundaries (large horizontal gaps between runs) in each line
//! 2. Group consecutive lines with aligned boundaries
//! 3. Runs of 3+ aligned lines are classified as tables
//! 4. Extract cell text by assigning runs to the column their left edge falls in
//!
//! Only the extracted rows are consumed downstream: each table is rendered
//! to plain text and appended to summarization prompts.

use super::{DecodedBlock, DecodedLine, DecodedPage};

/// Minimum number of consecutive aligned rows to consider a table.
const MIN_TABLE_ROWS: usize = 3;

/// Tolerance (in points) for column boundary alignment.
const BOUNDARY_TOLERANCE: f32 = 5.0;

/// Horizontal gap (in points) between runs that separates columns.
const COLUMN_GAP: f32 = 12.0;

/// A detected table region with its extracted rows.
#[derive(Debug, Clone)]
pub struct ExtractedTable {
    /// Stable label used as the table's reference in prompts and results.
    pub label: String,
    /// Page index (0-based).
    pub page: usize,
    /// Cell contents: `rows[row_idx][col_idx]`.
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    /// Render this table as a GitHub-flavored markdown table.
    pub fn to_text(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let col_count = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if col_count == 0 {
            return String::new();
        }

        let mut out = String::new();

        // Header row
        out.push('|');
        let header = &self.rows[0];
        for col in 0..col_count {
            let cell = header.get(col).map(String::as_str).unwrap_or("");
            out.push_str(&format!(" {cell} |"));
        }
        out.push('\n');

        // Separator row
        out.push('|');
        for _ in 0..col_count {
            out.push_str(" --- |");
        }
        out.push('\n');

        // Data rows
        for row in self.rows.iter().skip(1) {
            out.push('|');
            for col in 0..col_count {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                out.push_str(&format!(" {cell} |"));
            }
            out.push('\n');
        }

        out
    }
}

/// Detect tables across all pages of a decoded document.
///
/// Lines are examined in page order; runs of [`MIN_TABLE_ROWS`]+
/// consecutive lines whose column boundaries align within
/// [`BOUNDARY_TOLERANCE`] become one table each. Labels are assigned
/// in detection order (`table_1`, `table_2`, ...).
pub fn detect_tables(pages: &[DecodedPage]) -> Vec<ExtractedTable> {
    let mut tables = Vec::new();

    for (page_idx, page) in pages.iter().enumerate() {
        let lines: Vec<&DecodedLine> = page
            .blocks
            .iter()
            .filter_map(|b| match b {
                DecodedBlock::Text { lines } => Some(lines.iter()),
                DecodedBlock::NonText => None,
            })
            .flatten()
            .filter(|l| !l.runs.is_empty())
            .collect();

        let line_boundaries: Vec<Vec<f32>> =
            lines.iter().map(|l| find_column_boundaries(l)).collect();

        let mut run_start = 0;
        while run_start < lines.len() {
            let mut run_end = run_start + 1;

            while run_end < lines.len()
                && boundaries_align(
                    &line_boundaries[run_start],
                    &line_boundaries[run_end],
                    BOUNDARY_TOLERANCE,
                )
            {
                run_end += 1;
            }

            let run_len = run_end - run_start;
            if run_len >= MIN_TABLE_ROWS && !line_boundaries[run_start].is_empty() {
                let boundaries = &line_boundaries[run_start];
                let rows: Vec<Vec<String>> = lines[run_start..run_end]
                    .iter()
                    .map(|l| split_at_boundaries(l, boundaries))
                    .collect();

                tables.push(ExtractedTable {
                    label: format!("table_{}", tables.len() + 1),
                    page: page_idx,
                    rows,
                });
            }

            run_start = run_end;
        }
    }

    tables
}

/// Find X positions where column gaps occur between runs in a line.
///
/// A column gap is a horizontal space wider than [`COLUMN_GAP`] between
/// one run's right edge and the next run's left edge; the boundary sits
/// at the midpoint of the gap.
fn find_column_boundaries(line: &DecodedLine) -> Vec<f32> {
    let mut boundaries = Vec::new();
    for pair in line.runs.windows(2) {
        let gap = pair[1].bbox.x0 - pair[0].bbox.x1;
        if gap > COLUMN_GAP {
            boundaries.push(pair[0].bbox.x1 + gap / 2.0);
        }
    }
    boundaries
}

/// Check if two sets of column boundaries are aligned within tolerance.
fn boundaries_align(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .all(|(ax, bx)| (ax - bx).abs() < tolerance)
}

/// Assign each run of a line to the column segment its left edge falls in.
fn split_at_boundaries(line: &DecodedLine, boundaries: &[f32]) -> Vec<String> {
    let mut cells = vec![String::new(); boundaries.len() + 1];

    for run in &line.runs {
        let col = boundaries
            .iter()
            .position(|&b| run.bbox.x0 < b)
            .unwrap_or(boundaries.len());
        if !cells[col].is_empty() {
            cells[col].push(' ');
        }
        cells[col].push_str(run.text.trim());
    }

    cells.iter().map(|s| s.trim().to_string()).collect()
}
