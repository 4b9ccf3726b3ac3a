//! Barcode payload decoding: cleaning, GS1-128 parsing and the PDF417 fallback,
//! plus the scanner event stream that feeds payloads into inspection.

mod domain;
pub mod events;
mod gs1;
mod normalizer;
mod pdf417;

pub use domain::{ExtractedFields, Extraction, ExtractionSource, RawScan};
pub use events::{ConnectionStatus, PumpSummary, ScanEventPump, ScannerEvent};

use tracing::debug;

/// Stateless extractor turning a decoded payload into shipment identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarcodeFieldExtractor;

impl BarcodeFieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Run GS1-128 parsing, then the PDF417 search if no tracking number was found.
    ///
    /// A PDF417 hit replaces whatever GS1 produced; a PDF417 miss keeps the GS1
    /// fields. Never fails: a total miss comes back with every field absent.
    pub fn extract(&self, raw: &str) -> Extraction {
        let clean = normalizer::clean_payload(raw);

        let mut extraction = match gs1::parse_gs1_128(&clean) {
            Some(fields) => Extraction {
                fields,
                source: ExtractionSource::Gs1_128,
            },
            None => Extraction {
                fields: ExtractedFields::default(),
                source: ExtractionSource::None,
            },
        };

        if extraction.fields.tracking_number.is_none() {
            if let Some(fields) = pdf417::parse_pdf417(&clean) {
                extraction = Extraction {
                    fields,
                    source: ExtractionSource::Pdf417,
                };
            }
        }

        debug!(
            source = extraction.source.label(),
            tracking = extraction.fields.tracking_number.is_some(),
            ani = extraction.fields.ani.is_some(),
            "barcode payload extracted"
        );

        extraction
    }
}

/// Extract shipment fields from a raw decoded payload.
pub fn extract_fields(raw_payload: &str) -> ExtractedFields {
    BarcodeFieldExtractor::new().extract(raw_payload).fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gs1_tracking_number_is_returned_verbatim() {
        let extraction = BarcodeFieldExtractor::new().extract("(00)ABC123456789");
        assert_eq!(extraction.source, ExtractionSource::Gs1_128);
        assert_eq!(
            extraction.fields.tracking_number.as_deref(),
            Some("ABC123456789")
        );
    }

    #[test]
    fn all_digit_sscc_falls_through_to_pdf417() {
        // "0010" is taken as the AI, so GS1 finds nothing and the digit search runs.
        let extraction = BarcodeFieldExtractor::new().extract("00100000000000000001");
        assert_eq!(extraction.source, ExtractionSource::Pdf417);
        assert_eq!(
            extraction.fields,
            ExtractedFields {
                tracking_number: Some("001000000000".to_string()),
                ani: Some("0010000000".to_string()),
                adi: None,
                rsi: None,
            }
        );
    }

    #[test]
    fn short_ups_lookalike_only_yields_an_account_number() {
        // 1Z followed by 15 characters: one short of the UPS format.
        let fields = extract_fields("1Z999AA1234567890");
        assert_eq!(fields.tracking_number, None);
        assert_eq!(fields.ani.as_deref(), Some("1234567890"));
    }

    #[test]
    fn ups_tracking_number_found_by_fallback() {
        let fields = extract_fields("1z999aa10123456784");
        assert_eq!(fields.tracking_number.as_deref(), Some("1Z999AA10123456784"));
        assert_eq!(fields.ani.as_deref(), Some("1012345678"));
    }

    #[test]
    fn gs1_result_wins_over_pdf417_lookalikes() {
        // The tracking value also contains a 12 digit run that PDF417 would grab.
        let extraction = BarcodeFieldExtractor::new().extract("00X123456789012");
        assert_eq!(extraction.source, ExtractionSource::Gs1_128);
        assert_eq!(
            extraction.fields.tracking_number.as_deref(),
            Some("X123456789012")
        );
        assert_eq!(extraction.fields.ani, None);
    }

    #[test]
    fn pdf417_hit_replaces_partial_gs1_fields() {
        let payload = "411MAINSTREETXXXXXXX1234567890123";
        let extraction = BarcodeFieldExtractor::new().extract(payload);
        assert_eq!(extraction.source, ExtractionSource::Pdf417);
        assert_eq!(
            extraction.fields.tracking_number.as_deref(),
            Some("123456789012")
        );
        assert_eq!(extraction.fields.rsi, None);
    }

    #[test]
    fn partial_gs1_fields_survive_a_pdf417_miss() {
        let extraction = BarcodeFieldExtractor::new().extract("411 ELM ST");
        assert_eq!(extraction.source, ExtractionSource::Gs1_128);
        assert_eq!(extraction.fields.rsi.as_deref(), Some("ELMST"));
        assert_eq!(extraction.fields.tracking_number, None);
    }

    #[test]
    fn extraction_depends_only_on_the_cleaned_payload() {
        let a = extract_fields("(420) acct-77 | 411 main st");
        let b = extract_fields("420ACCT77411MAINST");
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_scan_is_a_miss_not_an_error() {
        let extraction = BarcodeFieldExtractor::new().extract("  hello?! ");
        assert_eq!(extraction.source, ExtractionSource::None);
        assert!(extraction.fields.is_miss());
    }
}
