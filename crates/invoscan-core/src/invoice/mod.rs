//! Invoice field extraction module.

mod extract;
mod fields;
mod result;
pub mod rules;
mod scanner;

pub use extract::{extract_field, extract_fields};
pub use fields::{
    ExtractionPolicy, FieldSpec, FieldType, DUE_DATE_KEYWORDS, INVOICE_NUMBER_KEYWORDS,
    OCR_KEYWORDS, PAYMENT_KEYWORDS, RECEIVER_KEYWORDS,
};
pub use result::{ExtractionResult, ValidatedObservation};
pub use scanner::{InvoiceScanner, ScanEvent};
