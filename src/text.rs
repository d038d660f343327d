//! Character-counted padding and elision helpers.
//!
//! All lengths here are in `char`s, which is what the fixed-width grid
//! counts.

use crate::error::FormatError;

/// Horizontal ellipsis, used to mark elided text.
pub const ELLIPSIS: char = '\u{2026}';

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` characters of `s`.
pub fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The last `n` characters of `s`.
pub fn last_chars(s: &str, n: usize) -> &str {
    let len = char_len(s);
    if n >= len {
        return s;
    }
    match s.char_indices().nth(len - n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

/// Characters `start..end` of `s`, clamped to its length.
pub fn slice_chars(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn check_pos(pos: f64) -> Result<(), FormatError> {
    if (0.0..=1.0).contains(&pos) {
        Ok(())
    } else {
        Err(FormatError::InvalidConfig(format!("bad position: {}", pos)))
    }
}

/// Pads `s` with `pad` to at least `length` characters.
///
/// `pos` splits the padding between the ends: 0 puts it all on the left,
/// 1 all on the right.
pub fn pad(s: &str, length: usize, pad: char, pos: f64) -> String {
    let len = char_len(s);
    if len >= length {
        return s.to_string();
    }
    let add = length - len;
    let right = (pos.clamp(0.0, 1.0) * add as f64).round() as usize;
    let left = add - right;

    let mut out = String::with_capacity(s.len() + add);
    out.extend(std::iter::repeat(pad).take(left));
    out.push_str(s);
    out.extend(std::iter::repeat(pad).take(right));
    out
}

/// Elides characters so that `s` fits in `length` characters.
///
/// `pos` places the ellipsis: 0 at the start, 1 at the end. Fails if
/// `length` is shorter than the ellipsis itself.
pub fn elide(s: &str, length: usize, ellipsis: &str, pos: f64) -> Result<String, FormatError> {
    let ellipsis_len = char_len(ellipsis);
    if length < ellipsis_len {
        return Err(FormatError::InvalidConfig(format!(
            "length {} less than ellipsis length {}",
            length, ellipsis_len
        )));
    }
    check_pos(pos)?;

    Ok(elide_unchecked(s, length, ellipsis, pos))
}

/// [`elide`] without validation; `length` must be at least the ellipsis
/// length and `pos` within `[0, 1]`.
pub(crate) fn elide_unchecked(s: &str, length: usize, ellipsis: &str, pos: f64) -> String {
    if char_len(s) <= length {
        return s.to_string();
    }

    let keep = length.saturating_sub(char_len(ellipsis));
    let left = ((pos * keep as f64).round() as usize).min(keep);
    let right = keep - left;

    let mut out = String::with_capacity(s.len());
    out.push_str(take_chars(s, left));
    out.push_str(ellipsis);
    if right > 0 {
        out.push_str(last_chars(s, right));
    }
    out
}

/// Elides, then pads, so the result is exactly `length` characters.
pub fn palide(
    s: &str,
    length: usize,
    ellipsis: &str,
    pad_char: char,
    pad_pos: f64,
    elide_pos: f64,
) -> Result<String, FormatError> {
    let elided = elide(s, length, ellipsis, elide_pos)?;
    Ok(pad(&elided, length, pad_char, pad_pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELL: &str = "\u{2026}";

    #[test]
    fn test_pad_right_and_left() {
        assert_eq!(pad("abc", 6, ' ', 1.0), "abc   ");
        assert_eq!(pad("abc", 6, ' ', 0.0), "   abc");
        assert_eq!(pad("abc", 7, '-', 0.5), "--abc--");
        assert_eq!(pad("abcdef", 3, ' ', 1.0), "abcdef");
    }

    #[test]
    fn test_elide_positions() {
        assert_eq!(elide("Hello, world!", 10, ELL, 1.0).unwrap(), "Hello, wo…");
        assert_eq!(elide("Hello, world!", 10, ELL, 0.0).unwrap(), "…o, world!");
        assert_eq!(elide("abcdefghij", 5, ELL, 0.5).unwrap(), "ab…ij");
        assert_eq!(elide("short", 10, ELL, 0.5).unwrap(), "short");
    }

    #[test]
    fn test_elide_too_short_for_ellipsis() {
        assert!(elide("abc", 0, ELL, 1.0).is_err());
        assert!(elide("abc", 2, "...", 1.0).is_err());
    }

    #[test]
    fn test_elide_bad_position() {
        assert!(elide("abcdef", 3, ELL, 1.5).is_err());
    }

    #[test]
    fn test_palide_exact_length() {
        for len in 1..12 {
            let s = palide("column name", len, ELL, ' ', 1.0, 0.7).unwrap();
            assert_eq!(char_len(&s), len.max(1));
        }
    }

    #[test]
    fn test_char_slicing_multibyte() {
        let s = "a…b│c";
        assert_eq!(take_chars(s, 2), "a…");
        assert_eq!(last_chars(s, 2), "│c");
        assert_eq!(slice_chars(s, 1, 4), "…b│");
        assert_eq!(slice_chars(s, 3, 10), "│c");
    }
}
