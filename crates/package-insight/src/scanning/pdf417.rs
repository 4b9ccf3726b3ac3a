use super::domain::ExtractedFields;
use regex::Regex;
use std::sync::OnceLock;

/// Carrier tracking formats tried against a PDF417 payload, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackingPattern {
    TwelveDigit,
    EighteenDigit,
    Ups,
    /// Three space-separated groups of four digits. Never matches in practice:
    /// the payload is searched after cleaning, which removes all whitespace.
    GroupedDigits,
}

impl TrackingPattern {
    pub(crate) const PRIORITY: [TrackingPattern; 4] = [
        TrackingPattern::TwelveDigit,
        TrackingPattern::EighteenDigit,
        TrackingPattern::Ups,
        TrackingPattern::GroupedDigits,
    ];

    fn source(&self) -> &'static str {
        match self {
            TrackingPattern::TwelveDigit => r"\d{12}",
            TrackingPattern::EighteenDigit => r"\d{18}",
            TrackingPattern::Ups => r"1Z[0-9A-Z]{16}",
            TrackingPattern::GroupedDigits => r"[0-9]{4}\s[0-9]{4}\s[0-9]{4}",
        }
    }
}

const ACCOUNT_PATTERN: &str = r"\d{9,10}";

struct Pdf417Patterns {
    tracking: Vec<(TrackingPattern, Regex)>,
    account: Regex,
}

fn patterns() -> &'static Pdf417Patterns {
    static PATTERNS: OnceLock<Pdf417Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Pdf417Patterns {
        tracking: TrackingPattern::PRIORITY
            .iter()
            .map(|pattern| {
                let regex = Regex::new(pattern.source()).expect("tracking pattern is valid");
                (*pattern, regex)
            })
            .collect(),
        account: Regex::new(ACCOUNT_PATTERN).expect("account pattern is valid"),
    })
}

/// First tracking format that occurs anywhere in the payload, with the matched text.
pub(crate) fn match_tracking(clean: &str) -> Option<(TrackingPattern, String)> {
    patterns()
        .tracking
        .iter()
        .find_map(|(pattern, regex)| regex.find(clean).map(|m| (*pattern, m.as_str().to_string())))
}

/// Best-effort pattern search used when structured GS1 parsing found no tracking number.
///
/// Only tracking number and account number are ever produced.
pub(crate) fn parse_pdf417(clean: &str) -> Option<ExtractedFields> {
    let tracking_number = match_tracking(clean).map(|(_, value)| value);
    let ani = patterns()
        .account
        .find(clean)
        .map(|m| m.as_str().to_string());

    if tracking_number.is_none() && ani.is_none() {
        return None;
    }

    Some(ExtractedFields {
        tracking_number,
        ani,
        adi: None,
        rsi: None,
    })
}
