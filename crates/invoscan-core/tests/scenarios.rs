//! End-to-end extraction over realistic payment slip layouts.

use image::DynamicImage;
use pretty_assertions::assert_eq;

use invoscan_core::{
    extract_fields, BoundingBox, Candidate, ExtractionConfig, FieldType, InvoiceScanner,
    PrecomputedRecognizer, TextObservation,
};

fn obs(text: &str, x: f32, y: f32, width: f32) -> TextObservation {
    TextObservation::with_text(text, BoundingBox::from_rect(x, y, width, 0.015))
}

/// A Swedish invoice footer as recognized by OCR.
fn invoice_page() -> Vec<TextObservation> {
    vec![
        obs("Faktura", 0.08, 0.92, 0.15),
        obs("Fakturanummer", 0.60, 0.85, 0.15),
        obs("100234", 0.80, 0.85, 0.08),
        obs("Förfallodag", 0.60, 0.82, 0.12),
        obs("2019-10-06", 0.80, 0.82, 0.12),
        obs("Att betala", 0.60, 0.40, 0.10),
        obs("1 250,00 kr", 0.80, 0.40, 0.12),
        obs("Bankgiro", 0.08, 0.20, 0.10),
        obs("5402-2501", 0.08, 0.17, 0.11),
        obs("OCR", 0.40, 0.20, 0.05),
        obs("4711000012345", 0.40, 0.17, 0.16),
    ]
}

#[test]
fn test_full_invoice_page() {
    let result = extract_fields(&invoice_page(), &ExtractionConfig::default());

    assert_eq!(result.texts(FieldType::Receiver), vec!["5402-2501"]);
    assert_eq!(result.texts(FieldType::Ocr), vec!["4711000012345"]);
    assert_eq!(result.texts(FieldType::DueDate), vec!["2019-10-06"]);
    assert_eq!(result.texts(FieldType::InvoiceNumber), vec!["100234"]);
    assert_eq!(result.texts(FieldType::Payment), vec!["1 250,00"]);
}

#[test]
fn test_bankgiro_right_neighbor() {
    let observations = vec![
        obs("Bankgiro:", 0.10, 0.50, 0.10),
        obs("5402-2501", 0.25, 0.50, 0.12),
    ];

    let result = extract_fields(&observations, &ExtractionConfig::default());
    assert_eq!(result.texts(FieldType::Receiver), vec!["5402-2501"]);
}

#[test]
fn test_ocr_below_neighbor() {
    let observations = vec![
        obs("OCR", 0.30, 0.50, 0.05),
        obs("12345678", 0.305, 0.47, 0.12),
    ];

    let result = extract_fields(&observations, &ExtractionConfig::default());
    assert_eq!(result.texts(FieldType::Ocr), vec!["12345678"]);
}

#[test]
fn test_totalt_keeps_amount_only() {
    let observations = vec![
        obs("Totalt", 0.10, 0.30, 0.08),
        obs("Belopp att betala 1 250,00 kr", 0.20, 0.30, 0.40),
    ];

    let result = extract_fields(&observations, &ExtractionConfig::default());
    let payments = result.get(FieldType::Payment);

    assert_eq!(result.texts(FieldType::Payment), vec!["1 250,00"]);
    assert_eq!(payments[0].source_index, 1);
    assert_eq!(
        payments[0].source.top_text(),
        Some("Belopp att betala 1 250,00 kr")
    );
}

#[test]
fn test_anchor_without_matching_neighbor() {
    let observations = vec![
        obs("OCR", 0.10, 0.50, 0.05),
        obs("se baksidan", 0.20, 0.50, 0.15),
        obs("ref 1234", 0.10, 0.46, 0.15),
    ];

    let result = extract_fields(&observations, &ExtractionConfig::default());
    assert!(result.get(FieldType::Ocr).is_empty());
}

#[test]
fn test_empty_candidates_never_anchor_or_match() {
    let blank = TextObservation::new(Vec::new(), BoundingBox::from_rect(0.25, 0.50, 0.10, 0.015));
    let observations = vec![obs("OCR", 0.10, 0.50, 0.05), blank.clone(), blank];

    let result = extract_fields(&observations, &ExtractionConfig::default());
    assert!(result.is_empty());
}

#[test]
fn test_values_come_from_top_candidate() {
    let observations = vec![
        obs("Fakturanr", 0.10, 0.50, 0.10),
        TextObservation::new(
            vec![Candidate::new("A-17", 0.8), Candidate::new("417", 0.6)],
            BoundingBox::from_rect(0.25, 0.50, 0.05, 0.015),
        ),
    ];

    let result = extract_fields(&observations, &ExtractionConfig::default());
    assert!(result.get(FieldType::InvoiceNumber).is_empty());
}

#[test]
fn test_payment_text_is_substring_of_source() {
    let result = extract_fields(&invoice_page(), &ExtractionConfig::default());

    for value in result.get(FieldType::Payment) {
        let source = value.source.top_text().unwrap();
        assert!(source.contains(&value.text));
    }
    for field in [
        FieldType::Receiver,
        FieldType::Ocr,
        FieldType::DueDate,
        FieldType::InvoiceNumber,
    ] {
        for value in result.get(field) {
            assert_eq!(Some(value.text.as_str()), value.source.top_text());
            assert_eq!(value.field_type, field);
        }
    }
}

#[test]
fn test_extraction_is_idempotent() {
    let page = invoice_page();
    let config = ExtractionConfig::default();

    assert_eq!(extract_fields(&page, &config), extract_fields(&page, &config));
}

#[test]
fn test_tighter_tolerance_drops_misaligned_values() {
    let observations = vec![
        obs("OCR", 0.30, 0.50, 0.05),
        obs("12345678", 0.305, 0.47, 0.12),
    ];

    let config = ExtractionConfig::default().with_alignment_tolerance(0.001);
    let result = extract_fields(&observations, &config);
    assert!(result.get(FieldType::Ocr).is_empty());
}

#[test]
fn test_scanner_with_recorded_observations() {
    let scanner = InvoiceScanner::new(PrecomputedRecognizer::new(invoice_page()));
    let image = DynamicImage::new_luma8(32, 32);

    let first = scanner.extract(&image).unwrap();
    let second = scanner.extract(&image).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    assert_eq!(
        first.to_string(),
        "Receiver: 5402-2501\n\
         OCR: 4711000012345\n\
         Due Date: 2019-10-06\n\
         Invoice Number: 100234\n\
         Amount: 1 250,00"
    );
}
