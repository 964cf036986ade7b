//! Symbology recognition for text-described frames.
//!
//! Pure functions — no IO. A frame line such as `4006381333931 96385074`
//! is split into candidate codes, and only the candidates that fit one of
//! the requested symbologies are kept, in order.

use fridge_app::ports::{CodeReport, Symbology};

/// Longest CODE-128 payload a handheld scan realistically produces.
const CODE128_MAX_LEN: usize = 48;

/// Whether `code` is a well-formed value of `symbology`.
#[must_use]
pub fn matches(symbology: Symbology, code: &str) -> bool {
    match symbology {
        Symbology::Ean13 => is_ean(code, 13),
        Symbology::Ean8 => is_ean(code, 8),
        Symbology::Code128 => {
            !code.is_empty()
                && code.len() <= CODE128_MAX_LEN
                && code.bytes().all(|b| b.is_ascii_graphic())
        }
    }
}

/// Digits only, the right length, and a valid GS1 mod-10 check digit.
fn is_ean(code: &str, len: usize) -> bool {
    if code.len() != len || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();
    let (body, check) = digits.split_at(len - 1);
    // Weights alternate 3,1,3,… starting from the digit next to the check digit.
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check[0]
}

/// Split a frame line into the codes a camera restricted to `symbologies`
/// would report.
#[must_use]
pub fn recognize(line: &str, symbologies: &[Symbology]) -> CodeReport {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|candidate| !candidate.is_empty())
        .filter(|candidate| symbologies.iter().any(|s| matches(*s, candidate)))
        .map(str::to_owned)
        .collect()
}
