use chrono::NaiveDate;

use super::error::PricebookError;
use super::types::{DebtorTrans, FiscalYear, TransactionType};

/// Sequential document reference generator.
///
/// Generates references in the format `{number}/{year label}`,
/// e.g. "001/2025", "002/2025", or "014/2024/2025" for a fiscal year that
/// spans two calendar years. Numbers restart at 1 in every fiscal year and
/// are tracked separately per transaction type.
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    label: String,
    begin: NaiveDate,
    next_number: u64,
    zero_pad: usize,
}

impl ReferenceSequence {
    /// Create a sequence for `fiscal_year` starting at 1.
    pub fn new(fiscal_year: &FiscalYear) -> Self {
        Self::starting_at(fiscal_year, 1)
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(fiscal_year: &FiscalYear, next_number: u64) -> Self {
        Self {
            label: fiscal_year.year_label(),
            begin: fiscal_year.begin,
            next_number,
            zero_pad: 3,
        }
    }

    /// Seed from the documents already issued for `trans_type` in `fiscal_year`.
    pub fn from_existing(
        trans_type: TransactionType,
        fiscal_year: &FiscalYear,
        existing: &[DebtorTrans],
    ) -> Self {
        let label = fiscal_year.year_label();
        let last = highest_number(trans_type, &label, existing).unwrap_or(0);
        Self::starting_at(fiscal_year, last.saturating_add(1))
    }

    /// Set zero-padding width (default: 3, so "001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Issue the next reference.
    pub fn next_reference(&mut self) -> String {
        let reference = self.peek();
        self.next_number = self.next_number.saturating_add(1);
        reference
    }

    /// Preview the next reference without consuming it.
    pub fn peek(&self) -> String {
        format!(
            "{:0>width$}/{}",
            self.next_number,
            self.label,
            width = self.zero_pad
        )
    }

    /// Year label of the sequence ("2025" or "2024/2025").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the next number that will be issued (without formatting).
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Move to a later fiscal year, resetting the counter to 1.
    pub fn advance_fiscal_year(&mut self, fiscal_year: &FiscalYear) -> Result<(), PricebookError> {
        if fiscal_year.begin <= self.begin {
            return Err(PricebookError::Numbering(format!(
                "fiscal year starting {} must start after {}",
                fiscal_year.begin, self.begin
            )));
        }
        self.label = fiscal_year.year_label();
        self.begin = fiscal_year.begin;
        self.next_number = 1;
        Ok(())
    }
}

/// Next reference for `trans_type` in `fiscal_year`, given the documents
/// already issued. Starts at `001/{label}` when none match.
pub fn next_reference(
    trans_type: TransactionType,
    fiscal_year: &FiscalYear,
    existing: &[DebtorTrans],
) -> String {
    ReferenceSequence::from_existing(trans_type, fiscal_year, existing).peek()
}

/// Next reference for a document dated `date`.
///
/// # Errors
///
/// [`PricebookError::NoFiscalYear`] when no open fiscal year contains `date`.
pub fn reference_for_date(
    trans_type: TransactionType,
    date: NaiveDate,
    fiscal_years: &[FiscalYear],
    existing: &[DebtorTrans],
) -> Result<String, PricebookError> {
    let fy = resolve_fiscal_year(date, fiscal_years).ok_or(PricebookError::NoFiscalYear(date))?;
    Ok(next_reference(trans_type, fy, existing))
}

/// The open fiscal year containing `date`.
pub fn resolve_fiscal_year(date: NaiveDate, fiscal_years: &[FiscalYear]) -> Option<&FiscalYear> {
    fiscal_years.iter().find(|fy| !fy.closed && fy.contains(date))
}

/// Numeric part of `reference` when it is issued under `label`.
///
/// `parse_reference("007/2025", "2025") == Some(7)`; references under other
/// labels or with a non-numeric prefix give `None`.
pub fn parse_reference(reference: &str, label: &str) -> Option<u64> {
    let prefix = reference.trim().strip_suffix(label)?.strip_suffix('/')?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

fn highest_number(trans_type: TransactionType, label: &str, existing: &[DebtorTrans]) -> Option<u64> {
    existing
        .iter()
        .filter(|d| d.trans_type == trans_type)
        .filter_map(|d| parse_reference(&d.reference, label))
        .max()
}
