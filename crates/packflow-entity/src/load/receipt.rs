//! Receipt planning and discrepancy detection.
//!
//! At receipt confirmation the caller may supply counts for any subset of
//! the load's lines; the plan resolves every dispatched line to a concrete
//! set of received/damaged/missing quantities before anything is written.

use packflow_core::{AppError, AppResult};
use uuid::Uuid;

use super::line::{LoadPackagingLine, ReceiptLineInput};

/// Resolved receipt quantities for one packaging line.
#[derive(Debug, Clone)]
pub struct PlannedReceiptLine {
    /// The line being received.
    pub line_id: Uuid,
    /// The line's packaging type.
    pub packaging_type_id: Uuid,
    /// Units originally dispatched.
    pub quantity_dispatched: i32,
    /// Units counted in.
    pub quantity_received: i32,
    /// Units received damaged.
    pub quantity_damaged: i32,
    /// Units unaccounted for.
    pub quantity_missing: i32,
    /// Line notes supplied at receipt.
    pub notes: Option<String>,
}

impl PlannedReceiptLine {
    /// Whether this line's counts disagree with what was dispatched.
    pub fn has_discrepancy(&self) -> bool {
        self.quantity_received != self.quantity_dispatched
            || self.quantity_damaged > 0
            || self.quantity_missing > 0
    }
}

/// The full resolved plan for a receipt confirmation.
#[derive(Debug, Clone)]
pub struct ReceiptPlan {
    /// One resolved entry per dispatched line.
    pub lines: Vec<PlannedReceiptLine>,
    /// True iff any line has a discrepancy.
    pub has_discrepancy: bool,
}

impl ReceiptPlan {
    /// Resolve caller-supplied counts against the load's dispatched lines.
    ///
    /// Lines omitted by the caller default to fully received as dispatched.
    /// Received/damaged/missing exceeding the dispatched quantity is
    /// accepted and surfaces as a discrepancy — physical counts can
    /// legitimately disagree with the ledger until reconciled.
    pub fn build(
        dispatched: &[LoadPackagingLine],
        supplied: &[ReceiptLineInput],
    ) -> AppResult<Self> {
        for input in supplied {
            if input.quantity_received < 0
                || input.quantity_damaged < 0
                || input.quantity_missing < 0
            {
                return Err(AppError::validation(
                    "Receipt quantities must not be negative",
                ));
            }
            if !dispatched
                .iter()
                .any(|line| line.packaging_type_id == input.packaging_type_id)
            {
                return Err(AppError::validation(format!(
                    "Packaging type {} is not on this load",
                    input.packaging_type_id
                )));
            }
        }

        let lines: Vec<PlannedReceiptLine> = dispatched
            .iter()
            .map(|line| {
                let input = supplied
                    .iter()
                    .find(|input| input.packaging_type_id == line.packaging_type_id);
                match input {
                    Some(input) => PlannedReceiptLine {
                        line_id: line.id,
                        packaging_type_id: line.packaging_type_id,
                        quantity_dispatched: line.quantity_dispatched,
                        quantity_received: input.quantity_received,
                        quantity_damaged: input.quantity_damaged,
                        quantity_missing: input.quantity_missing,
                        notes: input.notes.clone(),
                    },
                    None => PlannedReceiptLine {
                        line_id: line.id,
                        packaging_type_id: line.packaging_type_id,
                        quantity_dispatched: line.quantity_dispatched,
                        quantity_received: line.quantity_dispatched,
                        quantity_damaged: 0,
                        quantity_missing: 0,
                        notes: None,
                    },
                }
            })
            .collect();

        let has_discrepancy = lines.iter().any(PlannedReceiptLine::has_discrepancy);

        Ok(Self {
            lines,
            has_discrepancy,
        })
    }

    /// Total units counted in across all lines.
    pub fn total_received(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| line.quantity_received as i64)
            .sum()
    }
}
