//! Resource quantity parsing
//!
//! Converts quantity strings (`500m`, `2Gi`, `1.5k`, `1e3`) to plain numbers in
//! the resource's base unit.

const BINARY_UNITS: [(&str, f64); 6] = [
    ("Ei", 1_152_921_504_606_846_976.0),
    ("Pi", 1_125_899_906_842_624.0),
    ("Ti", 1_099_511_627_776.0),
    ("Gi", 1_073_741_824.0),
    ("Mi", 1_048_576.0),
    ("Ki", 1_024.0),
];

const DECIMAL_UNITS: [(&str, f64); 8] = [
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("K", 1e3),
    ("k", 1e3),
    ("m", 1e-3),
];

/// Convert a quantity string to its base value
///
/// Returns `None` for empty or unparsable input.
pub fn convert_to_base_value(value: &str) -> Option<f64> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(plain) = parse_number(raw) {
        return Some(plain);
    }

    BINARY_UNITS
        .iter()
        .chain(DECIMAL_UNITS.iter())
        .find_map(|(suffix, multiplier)| {
            raw.strip_suffix(suffix)
                .and_then(parse_number)
                .map(|n| n * multiplier)
        })
        .filter(|n| n.is_finite())
}

fn parse_number(raw: &str) -> Option<f64> {
    // Rejects "inf"/"NaN" spellings f64 parsing would accept
    if !raw.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-' || c == '+') {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}
