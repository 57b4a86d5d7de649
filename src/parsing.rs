//! # Parsing
//! Squares, pieces, castling rights and position strings are all parsable from raw
//! strings using the standard Rust [`FromStr`](std::str::FromStr) trait.
//!
//! On top of that, these types implement the [`PartialFromStr`] trait. This
//! trait implements *parser combinators*.
//!
//! Unlike [`FromStr`](std::str::FromStr), the `Ok` variant returned by
//! [`PartialFromStr`] contains two values:
//! - The parsed value
//! - A suffix of the input that was not part of the parsed value.
//!
//! A string like "d4rest" would return `Ok((d4, "rest"))` when parsed as a square.
//!
//! Using this parsing scheme allows the combination of parsers over a large input
//! string more easily. For example, the string "e2e4" can be parsed into two
//! squares by successive calls to `partial_from_str`.

pub trait PartialFromStr: Sized {
    type Err;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err>;
}

/// Consumes exactly one `expected` character at the start of the input.
pub(crate) fn parse_char(src: &str, expected: char) -> Result<&str, ()> {
    match src.strip_prefix(expected) {
        Some(rest) => Ok(rest),
        None => Err(()),
    }
}

/// Parses a u16 value.
pub(crate) fn parse_u16(src: &str) -> Result<(u16, &str), ()> {
    let digits = src.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(());
    }
    let value = src[..digits].parse().map_err(|_| ())?;
    Ok((value, &src[digits..]))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_char_consumes_one() {
        assert_eq!(parse_char("/rest", '/'), Ok("rest"));
        assert_eq!(parse_char("rest", '/'), Err(()));
        assert_eq!(parse_char("", ' '), Err(()));
    }

    #[test]
    fn parse_u16_stops_at_non_digit() {
        assert_eq!(parse_u16("42 1"), Ok((42, " 1")));
        assert_eq!(parse_u16("x"), Err(()));
        assert_eq!(parse_u16("70000"), Err(()));
    }
}
