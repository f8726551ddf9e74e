//! Hex colour helpers.

/// Shorten a 6-digit hex colour to its 3-digit form when every channel
/// repeats its digit (`#aabbcc` → `#abc`).
///
/// Six-digit colours are always returned lower-cased with a leading `#`.
/// Anything that is not a 6-digit hex colour is returned unchanged.
///
/// ```
/// use popup_demo_core::short_hex;
///
/// assert_eq!(short_hex("#aabbcc"), "#abc");
/// assert_eq!(short_hex("#A1B2C3"), "#a1b2c3");
/// assert_eq!(short_hex("teal"), "teal");
/// ```
#[must_use]
pub fn short_hex(hex: &str) -> String {
    let lowered = hex.to_lowercase();
    let digits = lowered.replacen('#', "", 1);
    let bytes = digits.as_bytes();

    let [r1, r2, g1, g2, b1, b2] = bytes else {
        return hex.to_string();
    };
    if !bytes.iter().all(u8::is_ascii_hexdigit) {
        return hex.to_string();
    }

    if r1 == r2 && g1 == g2 && b1 == b2 {
        format!("#{}{}{}", char::from(*r1), char::from(*g1), char::from(*b1))
    } else {
        format!("#{digits}")
    }
}

/// Compare two colours after shortening both.
#[must_use]
pub fn same_color(a: &str, b: &str) -> bool {
    short_hex(a) == short_hex(b)
}
