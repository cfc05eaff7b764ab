//! Value patterns for Swedish payment slip fields.
//!
//! Whole-text fields anchor on the start of the candidate text so numeric
//! noise in the middle of a sentence does not validate.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Bankgiro / postgiro number, e.g. 5402-2501
    pub static ref RECEIVER_PATTERN: Regex = Regex::new(
        r"^[0-9,-]{8,}"
    ).unwrap();

    // OCR payment reference
    pub static ref OCR_REFERENCE_PATTERN: Regex = Regex::new(
        r"^[0-9]{8,}"
    ).unwrap();

    // ISO date, YYYY-MM-DD
    pub static ref DUE_DATE_PATTERN: Regex = Regex::new(
        r"^[12]\d{3}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])"
    ).unwrap();

    pub static ref INVOICE_NUMBER_PATTERN: Regex = Regex::new(
        r"^[0-9]{1,15}"
    ).unwrap();

    // Amount with grouping and decimal separators (1 250,00 or 1.250,00),
    // bounded by digits so surrounding words and spaces are dropped.
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\d(?:[\d,. ]*\d)?"
    ).unwrap();
}
