use super::domain::ExtractedFields;

const MAX_AI_DIGITS: usize = 4;
const TRACKING_VALUE_MAX: usize = 18;
const DEFAULT_VALUE_MAX: usize = 20;

/// The GS1 application identifiers a shipping label is mined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApplicationIdentifier {
    /// `00`
    TrackingNumber,
    /// `420`
    AccountNumber,
    /// `410`
    Address,
    /// `411`
    Street,
}

impl ApplicationIdentifier {
    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            "00" => Some(Self::TrackingNumber),
            "420" => Some(Self::AccountNumber),
            "410" => Some(Self::Address),
            "411" => Some(Self::Street),
            _ => None,
        }
    }

    fn value_cap(identifier: Option<Self>) -> usize {
        match identifier {
            Some(Self::TrackingNumber) => TRACKING_VALUE_MAX,
            _ => DEFAULT_VALUE_MAX,
        }
    }
}

/// Walk a cleaned payload as `(AI, value)` pairs.
///
/// The AI is the run of up to four digits at the cursor, so a value that starts
/// with a digit is absorbed into the identifier. Returns `None` when none of the
/// recognized identifiers carried a value.
pub(crate) fn parse_gs1_128(clean: &str) -> Option<ExtractedFields> {
    let bytes = clean.as_bytes();
    let mut fields = ExtractedFields::default();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let ai_end = scan_identifier(bytes, cursor);
        if ai_end == cursor {
            break;
        }

        let identifier = ApplicationIdentifier::from_code(&clean[cursor..ai_end]);
        let value_end = scan_value(bytes, ai_end, ApplicationIdentifier::value_cap(identifier));

        if value_end > ai_end {
            let value = clean[ai_end..value_end].to_string();
            match identifier {
                Some(ApplicationIdentifier::TrackingNumber) => fields.tracking_number = Some(value),
                Some(ApplicationIdentifier::AccountNumber) => fields.ani = Some(value),
                Some(ApplicationIdentifier::Address) => fields.adi = Some(value),
                Some(ApplicationIdentifier::Street) => fields.rsi = Some(value),
                None => {}
            }
        }

        cursor = value_end;
    }

    if fields.is_miss() {
        None
    } else {
        Some(fields)
    }
}

fn scan_identifier(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .take(MAX_AI_DIGITS)
        .take_while(|byte| byte.is_ascii_digit())
        .count()
        + start
}

fn scan_value(bytes: &[u8], start: usize, cap: usize) -> usize {
    bytes[start..]
        .iter()
        .take(cap)
        .take_while(|byte| byte.is_ascii_alphanumeric())
        .count()
        + start
}
