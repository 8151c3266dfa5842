//! Stock receipts: books entering (inward) or leaving (outward) the collection
//!
//! The SPA builds the list of lines over several steps and posts it in one
//! request. Lines are checked and merged here before they reach the backend.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Upper bound for a single line
pub const MAX_LINE_QUANTITY: i32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Inward,
    Outward,
}

impl ReceiptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptKind::Inward => "inward",
            ReceiptKind::Outward => "outward",
        }
    }
}

impl std::fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReceiptLine {
    pub book_id: i64,
    pub quantity: i32,
    pub note: Option<String>,
}

/// Receipt as submitted by the SPA
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReceiptDraft {
    /// Supplier for inward receipts, destination for outward ones
    #[validate(length(max = 120, message = "Counterparty must be at most 120 characters"))]
    pub counterparty: Option<String>,
    #[validate(length(max = 500, message = "Remark must be at most 500 characters"))]
    pub remark: Option<String>,
    #[validate(length(min = 1, message = "A receipt needs at least one line"))]
    pub lines: Vec<ReceiptLine>,
}

/// Checked receipt forwarded to the backend
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Receipt {
    pub kind: ReceiptKind,
    pub counterparty: Option<String>,
    pub remark: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceiptConfirmation {
    pub receipt_id: i64,
    pub kind: ReceiptKind,
    pub total_quantity: i64,
    pub created_at: DateTime<Utc>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ReceiptDraft {
    /// Validate the draft and merge lines that target the same book.
    ///
    /// Merged lines keep the position of their first occurrence; distinct
    /// notes are joined with "; ".
    pub fn into_receipt(self, kind: ReceiptKind) -> AppResult<Receipt> {
        self.validate()?;

        let counterparty = non_blank(self.counterparty);
        if kind == ReceiptKind::Outward && counterparty.is_none() {
            return Err(AppError::Validation(
                "Outward receipts need a destination".to_string(),
            ));
        }

        let mut merged: IndexMap<i64, ReceiptLine> = IndexMap::new();
        for line in self.lines {
            if line.book_id <= 0 {
                return Err(AppError::Validation(format!("Invalid book id {}", line.book_id)));
            }
            if line.quantity <= 0 || line.quantity > MAX_LINE_QUANTITY {
                return Err(AppError::Validation(format!(
                    "Quantity for book {} must be between 1 and {}",
                    line.book_id, MAX_LINE_QUANTITY
                )));
            }

            let note = non_blank(line.note);
            match merged.get_mut(&line.book_id) {
                Some(existing) => {
                    existing.quantity += line.quantity;
                    if existing.quantity > MAX_LINE_QUANTITY {
                        return Err(AppError::Validation(format!(
                            "Total quantity for book {} exceeds {}",
                            line.book_id, MAX_LINE_QUANTITY
                        )));
                    }
                    existing.note = match (existing.note.take(), note) {
                        (Some(a), Some(b)) if a != b => Some(format!("{}; {}", a, b)),
                        (a, b) => a.or(b),
                    };
                }
                None => {
                    merged.insert(
                        line.book_id,
                        ReceiptLine {
                            book_id: line.book_id,
                            quantity: line.quantity,
                            note,
                        },
                    );
                }
            }
        }

        let lines: Vec<ReceiptLine> = merged.into_values().collect();
        let total_quantity = lines.iter().map(|l| l.quantity as i64).sum();

        Ok(Receipt {
            kind,
            counterparty,
            remark: non_blank(self.remark),
            lines,
            total_quantity,
        })
    }
}
