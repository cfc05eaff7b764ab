//! Field types and their keyword / pattern / policy table.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rules::patterns::{
    AMOUNT_PATTERN, DUE_DATE_PATTERN, INVOICE_NUMBER_PATTERN, OCR_REFERENCE_PATTERN,
    RECEIVER_PATTERN,
};

/// Invoice fields extracted from a payment slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Bankgiro / postgiro number of the payee.
    Receiver,
    /// OCR payment reference.
    Ocr,
    /// Due date.
    DueDate,
    /// Invoice number.
    InvoiceNumber,
    /// Amount to pay.
    Payment,
}

impl FieldType {
    /// All field types, in extraction order.
    pub const ALL: [FieldType; 5] = [
        FieldType::Receiver,
        FieldType::Ocr,
        FieldType::DueDate,
        FieldType::InvoiceNumber,
        FieldType::Payment,
    ];

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Receiver => "Receiver",
            FieldType::Ocr => "OCR",
            FieldType::DueDate => "Due Date",
            FieldType::InvoiceNumber => "Invoice Number",
            FieldType::Payment => "Amount",
        }
    }

    /// Extraction rules for this field.
    pub fn spec(&self) -> &'static FieldSpec {
        &FIELD_SPECS[*self as usize]
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What part of a validated candidate is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Keep the candidate text unmodified.
    WholeText,
    /// Keep only the text matched by the pattern.
    MatchedSubstring,
}

/// Keywords, value pattern and policy of one field.
#[derive(Debug)]
pub struct FieldSpec {
    pub field_type: FieldType,
    /// Lower-case keywords; OCR often drops diacritics, so both spellings are listed.
    pub keywords: &'static [&'static str],
    pub pattern: &'static Regex,
    pub policy: ExtractionPolicy,
}

pub const RECEIVER_KEYWORDS: &[&str] = &["bankgiro", "postgiro", "mottagare", "bg", "pg"];
pub const OCR_KEYWORDS: &[&str] = &["ocr"];
pub const DUE_DATE_KEYWORDS: &[&str] = &["forfallo", "förfallo", "betalningsdag", "tillhanda"];
pub const INVOICE_NUMBER_KEYWORDS: &[&str] = &["fakturanummer", "fakturanr"];
pub const PAYMENT_KEYWORDS: &[&str] = &["att betala", "belopp att betala", "totalt", "belopp"];

lazy_static! {
    // Indexed by `FieldType as usize`.
    static ref FIELD_SPECS: [FieldSpec; 5] = [
        FieldSpec {
            field_type: FieldType::Receiver,
            keywords: RECEIVER_KEYWORDS,
            pattern: &*RECEIVER_PATTERN,
            policy: ExtractionPolicy::WholeText,
        },
        FieldSpec {
            field_type: FieldType::Ocr,
            keywords: OCR_KEYWORDS,
            pattern: &*OCR_REFERENCE_PATTERN,
            policy: ExtractionPolicy::WholeText,
        },
        FieldSpec {
            field_type: FieldType::DueDate,
            keywords: DUE_DATE_KEYWORDS,
            pattern: &*DUE_DATE_PATTERN,
            policy: ExtractionPolicy::WholeText,
        },
        FieldSpec {
            field_type: FieldType::InvoiceNumber,
            keywords: INVOICE_NUMBER_KEYWORDS,
            pattern: &*INVOICE_NUMBER_PATTERN,
            policy: ExtractionPolicy::WholeText,
        },
        FieldSpec {
            field_type: FieldType::Payment,
            keywords: PAYMENT_KEYWORDS,
            pattern: &*AMOUNT_PATTERN,
            policy: ExtractionPolicy::MatchedSubstring,
        },
    ];
}
