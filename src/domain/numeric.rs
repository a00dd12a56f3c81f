//! C-style unsigned integer parsing
//!
//! Mirrors `strtoul(s, NULL, 0)`: optional leading ASCII whitespace and sign, base
//! auto-detection (`0x` hex, leading `0` octal, otherwise decimal), parsing
//! stops at the first invalid digit. Overflow saturates at `u64::MAX`.

/// Result of a lenient parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub value: u64,
    /// True when the whole input was consumed as a number
    pub complete: bool,
}

pub fn parse_unsigned(input: &str) -> Parsed {
    // C isspace: space, \t \n \v \f \r
    let s = input.trim_start_matches(|c: char| matches!(c, ' ' | '\t'..='\r'));
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
    {
        if rest.chars().next().is_some_and(|c| c.is_ascii_hexdigit()) {
            (16, rest)
        } else {
            // "0x" without hex digits parses as the leading zero
            return Parsed {
                value: 0,
                complete: false,
            };
        }
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    };

    let mut value: u64 = 0;
    let mut overflow = false;
    let mut consumed = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        consumed += 1;
        match value
            .checked_mul(radix as u64)
            .and_then(|v| v.checked_add(d as u64))
        {
            Some(v) => value = v,
            None => overflow = true,
        }
    }

    let any_digits = consumed > 0 || radix == 8;
    let complete = any_digits && consumed == digits.chars().count();

    let value = if overflow {
        u64::MAX
    } else if negative {
        value.wrapping_neg()
    } else {
        value
    };

    Parsed { value, complete }
}
