//! Core library for Swedish invoice scanning.
//!
//! This crate provides:
//! - A normalized model of OCR text observations (candidates + bounding boxes)
//! - Keyword anchoring, spatial neighbor search and regex validation of payment fields
//!   (bankgiro/postgiro receiver, OCR reference, due date, invoice number, amount)
//! - A scanner that drives an OCR collaborator and assembles the extracted fields
//! - OCR adapters: `pure-onnx-ocr` (native) and recorded observation sets

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;

pub use error::{InvoscanError, RecognizerError, Result, ScanError};
pub use invoice::{
    extract_fields, ExtractionPolicy, ExtractionResult, FieldSpec, FieldType, InvoiceScanner,
    ScanEvent, ValidatedObservation,
};
pub use models::config::{ExtractionConfig, InvoscanConfig, KeywordMatch};
pub use ocr::{
    BoundingBox, Candidate, Point, PrecomputedRecognizer, RecognitionLevel, RecognitionRequest,
    TextObservation, TextRecognizer,
};

#[cfg(feature = "native")]
pub use ocr::PureOcrRecognizer;
