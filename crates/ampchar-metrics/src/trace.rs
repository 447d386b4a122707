//! Typed representation of simulator output tables.
//!
//! The simulator writes space- or comma-delimited tables with one header
//! row. Column layout is disambiguated purely by column count: a frequency
//! trace has 3 columns (frequency + real/imaginary of one output) or 6
//! columns (the selected differential signal occupying columns 4-5); time
//! and sweep traces record each signal with its own copy of the scale
//! column, so their width also varies with the recorded-signal count.

use std::path::Path;

use num_complex::Complex64;

use crate::error::{Error, Result};

/// A rectangular numeric table parsed from a simulator output file.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Vec<f64>>,
}

impl Table {
    /// Parse a table from text, skipping one header row.
    ///
    /// Fields may be separated by whitespace or commas. Blank lines are
    /// ignored. All data rows must have the same width.
    pub fn parse(text: &str) -> Result<Table> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (idx, line) in text.lines().skip(1).enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut row = Vec::new();
            for field in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if field.is_empty() {
                    continue;
                }
                let value = field.parse::<f64>().map_err(|e| Error::Parse {
                    row: idx + 1,
                    detail: format!("{field:?}: {e}"),
                })?;
                row.push(value);
            }
            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(Error::Ragged {
                        row: idx + 1,
                        found: row.len(),
                        expected: first.len(),
                    });
                }
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(Error::EmptyTable);
        }
        Ok(Table { rows })
    }

    /// Read and parse a table from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Table> {
        let text = std::fs::read_to_string(path)?;
        Table::parse(&text)
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// All values of one column, top to bottom.
    ///
    /// Fails with a layout error if the column does not exist.
    pub fn column(&self, idx: usize) -> Result<Vec<f64>> {
        if idx >= self.num_columns() {
            return Err(Error::Layout {
                found: self.num_columns(),
                expected: "a layout with more recorded signals",
            });
        }
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }
}

/// A time-domain or DC-sweep trace: one scale column plus real signals.
#[derive(Debug, Clone)]
pub struct TimeTrace {
    table: Table,
}

impl TimeTrace {
    /// Wrap a parsed table as a time trace.
    pub fn new(table: Table) -> TimeTrace {
        TimeTrace { table }
    }

    /// Parse a time trace from text, skipping one header row.
    pub fn parse(text: &str) -> Result<TimeTrace> {
        Ok(TimeTrace::new(Table::parse(text)?))
    }

    /// Read and parse a time trace from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<TimeTrace> {
        Ok(TimeTrace::new(Table::from_path(path)?))
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.table.num_columns()
    }

    /// The independent variable (time, or the swept voltage).
    pub fn scale(&self) -> Result<Vec<f64>> {
        self.table.column(0)
    }

    /// The first recorded output signal.
    pub fn output(&self) -> Result<Vec<f64>> {
        self.require_columns(2, "2 or more (scale + output)")?;
        self.table.column(1)
    }

    /// The second recorded signal (column 4 of a 4-column layout: the swept
    /// input of an output-swing trace, or the supply current of an ICMR or
    /// transient trace).
    pub fn second_signal(&self) -> Result<Vec<f64>> {
        self.require_columns(4, "4 or 6 (each signal carries its own scale column)")?;
        self.table.column(3)
    }

    /// The monitored input node of a transient trace (column 6).
    pub fn monitored_input(&self) -> Result<Vec<f64>> {
        self.require_columns(6, "6 (output, supply current, and input)")?;
        self.table.column(5)
    }

    /// Fail unless the trace has at least `needed` columns.
    pub fn require_columns(&self, needed: usize, expected: &'static str) -> Result<()> {
        if self.num_columns() < needed {
            return Err(Error::Layout {
                found: self.num_columns(),
                expected,
            });
        }
        Ok(())
    }
}

/// A frequency-domain trace: strictly increasing frequencies with the
/// selected complex output signal.
#[derive(Debug, Clone)]
pub struct FrequencyTrace {
    frequency: Vec<f64>,
    signal: Vec<Complex64>,
}

impl FrequencyTrace {
    /// Extract the frequency axis and the selected signal from a table.
    ///
    /// A 3-column table carries one output node (real/imaginary in columns
    /// 2-3); a 6-column table carries two, with the selected signal in
    /// columns 5-6. Any other width is a layout error.
    pub fn from_table(table: &Table) -> Result<FrequencyTrace> {
        let (re_idx, im_idx) = match table.num_columns() {
            3 => (1, 2),
            6 => (4, 5),
            found => {
                return Err(Error::Layout {
                    found,
                    expected: "3 (one output node) or 6 (two output nodes)",
                })
            }
        };
        let frequency = table.column(0)?;
        let re = table.column(re_idx)?;
        let im = table.column(im_idx)?;
        let signal = re
            .into_iter()
            .zip(im)
            .map(|(re, im)| Complex64::new(re, im))
            .collect();
        Ok(FrequencyTrace { frequency, signal })
    }

    /// Parse a frequency trace from text, skipping one header row.
    pub fn parse(text: &str) -> Result<FrequencyTrace> {
        FrequencyTrace::from_table(&Table::parse(text)?)
    }

    /// Read and parse a frequency trace from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<FrequencyTrace> {
        FrequencyTrace::from_table(&Table::from_path(path)?)
    }

    /// Build a trace directly from samples. Intended for tests and callers
    /// that already hold parsed data.
    pub fn from_samples(frequency: Vec<f64>, signal: Vec<Complex64>) -> FrequencyTrace {
        FrequencyTrace { frequency, signal }
    }

    /// Number of frequency samples.
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Whether the trace has no samples.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// The frequency axis.
    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    /// The selected complex signal.
    pub fn signal(&self) -> &[Complex64] {
        &self.signal
    }

    /// Magnitude of the selected signal in dB at every sample.
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.signal.iter().map(|c| 20.0 * c.norm().log10()).collect()
    }

    /// Phase of the selected signal in degrees at every sample (wrapped).
    pub fn phase_deg(&self) -> Vec<f64> {
        self.signal.iter().map(|c| c.arg().to_degrees()).collect()
    }
}
