//! Utility functions.

/// Parse an address in decimal or `0x`-prefixed hexadecimal.
///
/// Used as a clap value parser for the `--entry` and `--load-addr`
/// overrides.
pub fn parse_addr(s: &str) -> Result<u64, String> {
    let s = s.trim().to_ascii_lowercase();
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address `{s}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::parse_addr;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_addr("4096"), Ok(4096));
        assert_eq!(parse_addr("0x1000"), Ok(0x1000));
        assert_eq!(parse_addr(" 0X8000000 "), Ok(0x800_0000));
        assert!(parse_addr("g").is_err());
        assert!(parse_addr("0x").is_err());
    }
}
