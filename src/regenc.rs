// regenc.rs - UTF-8 character access and character-type predicates.
//
// Subjects are `&str`, so every position the executor sees is a valid
// UTF-8 char boundary and decoding never has to recover from bad input.

use crate::unicode_data::{CR_DIGIT, CR_SPACE, CR_WORD};

pub const NEWLINE_CODE: char = '\n';

/// Character types reachable through `\w`, `\d` and `\s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CType {
    Word,
    Digit,
    Space,
}

/// Byte length of the UTF-8 sequence introduced by lead byte `b`.
#[inline]
pub fn mbc_enc_len(b: u8) -> usize {
    if b < 0x80 {
        1
    } else if b < 0xE0 {
        2
    } else if b < 0xF0 {
        3
    } else {
        4
    }
}

/// Decode the character starting at byte offset `s`.
/// Returns the character and the offset just past it, or `None` at the end.
#[inline]
pub fn next_char(text: &[u8], s: usize) -> Option<(char, usize)> {
    let b = *text.get(s)?;
    let len = mbc_enc_len(b);
    let code = match len {
        1 => b as u32,
        2 => ((b as u32 & 0x1F) << 6) | (text[s + 1] as u32 & 0x3F),
        3 => {
            ((b as u32 & 0x0F) << 12)
                | ((text[s + 1] as u32 & 0x3F) << 6)
                | (text[s + 2] as u32 & 0x3F)
        }
        _ => {
            ((b as u32 & 0x07) << 18)
                | ((text[s + 1] as u32 & 0x3F) << 12)
                | ((text[s + 2] as u32 & 0x3F) << 6)
                | (text[s + 3] as u32 & 0x3F)
        }
    };
    Some((char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER), s + len))
}

/// Start of the character that ends right before byte offset `s`.
#[inline]
pub fn prev_char_head(text: &[u8], s: usize) -> Option<usize> {
    if s == 0 {
        return None;
    }
    let mut p = s - 1;
    while p > 0 && (text[p] & 0xC0) == 0x80 {
        p -= 1;
    }
    Some(p)
}

/// The character that ends right before byte offset `s`.
#[inline]
pub fn prev_char(text: &[u8], s: usize) -> Option<char> {
    let p = prev_char_head(text, s)?;
    next_char(text, p).map(|(c, _)| c)
}

/// Binary search over a flat list of inclusive `(from, to)` pairs.
pub fn is_in_code_range(ranges: &[u32], code: u32) -> bool {
    let n = ranges.len() / 2;
    let mut low = 0usize;
    let mut high = n;
    while low < high {
        let mid = (low + high) / 2;
        if code > ranges[mid * 2 + 1] {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    low < n && code >= ranges[low * 2]
}

pub fn is_code_ctype(c: char, ctype: CType) -> bool {
    if c.is_ascii() {
        return match ctype {
            CType::Word => c == '_' || c.is_ascii_alphanumeric(),
            CType::Digit => c.is_ascii_digit(),
            CType::Space => matches!(c, '\t'..='\r' | '\x1c'..=' '),
        };
    }
    let ranges = match ctype {
        CType::Word => CR_WORD,
        CType::Digit => CR_DIGIT,
        CType::Space => CR_SPACE,
    };
    is_in_code_range(ranges, c as u32)
}

#[inline]
pub fn is_word_char(c: char) -> bool {
    is_code_ctype(c, CType::Word)
}

/// Simple one-to-one lowercase mapping. `İ` maps to `i`.
#[inline]
pub fn to_lower_simple(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Case fold used for case-insensitive comparison. Two characters match
/// when their folds are equal, which makes `s`, `S` and `ſ` one class,
/// and likewise `i`, `I`, `ı` and `İ`.
#[inline]
pub fn case_fold(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    to_lower_simple(to_upper_simple(c))
}

/// Simple one-to-one uppercase mapping, used by case-insensitive classes.
#[inline]
pub fn to_upper_simple(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

pub fn is_word_boundary(text: &[u8], s: usize) -> bool {
    let before = prev_char(text, s).map_or(false, is_word_char);
    let after = next_char(text, s).map_or(false, |(c, _)| is_word_char(c));
    before != after
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_multibyte() {
        let text = "aé€😀".as_bytes();
        assert_eq!(next_char(text, 0), Some(('a', 1)));
        assert_eq!(next_char(text, 1), Some(('é', 3)));
        assert_eq!(next_char(text, 3), Some(('€', 6)));
        assert_eq!(next_char(text, 6), Some(('😀', 10)));
        assert_eq!(next_char(text, 10), None);
    }

    #[test]
    fn step_back_over_multibyte() {
        let text = "aé€".as_bytes();
        assert_eq!(prev_char_head(text, 6), Some(3));
        assert_eq!(prev_char(text, 3), Some('é'));
        assert_eq!(prev_char(text, 1), Some('a'));
        assert_eq!(prev_char(text, 0), None);
    }

    #[test]
    fn ctypes() {
        assert!(is_code_ctype('_', CType::Word));
        assert!(is_code_ctype('ß', CType::Word));
        assert!(!is_code_ctype('-', CType::Word));
        assert!(!is_code_ctype('\u{0903}', CType::Word));
        assert!(is_code_ctype('7', CType::Digit));
        assert!(is_code_ctype('٣', CType::Digit));
        assert!(!is_code_ctype('²', CType::Digit));
        assert!(!is_code_ctype('½', CType::Digit));
        assert!(!is_code_ctype('Ⅷ', CType::Digit));
        assert!(is_code_ctype('\t', CType::Space));
        assert!(is_code_ctype('\x1c', CType::Space));
        assert!(is_code_ctype('\u{3000}', CType::Space));
        assert!(!is_code_ctype('\u{200b}', CType::Space));
        assert!(!is_code_ctype('x', CType::Space));
    }

    #[test]
    fn folding() {
        assert_eq!(case_fold('A'), 'a');
        assert_eq!(case_fold('Ä'), 'ä');
        assert_eq!(case_fold('ſ'), 's');
        assert_eq!(case_fold('ı'), 'i');
        assert_eq!(case_fold('İ'), 'i');
        assert_eq!(case_fold('ß'), 'ß');
        assert_eq!(case_fold('ẞ'), 'ß');
        assert_eq!(case_fold('ς'), 'σ');
        assert_eq!(to_upper_simple('a'), 'A');
    }

    #[test]
    fn word_boundaries() {
        let text = b"hi there";
        assert!(is_word_boundary(text, 0));
        assert!(!is_word_boundary(text, 1));
        assert!(is_word_boundary(text, 2));
        assert!(is_word_boundary(text, 3));
        assert!(is_word_boundary(text, 8));
        assert!(!is_word_boundary(b"", 0));
    }

    #[test]
    fn code_range_search() {
        let ranges = [0x10, 0x20, 0x40, 0x40, 0x100, 0x1ff];
        assert!(is_in_code_range(&ranges, 0x10));
        assert!(is_in_code_range(&ranges, 0x20));
        assert!(!is_in_code_range(&ranges, 0x21));
        assert!(is_in_code_range(&ranges, 0x40));
        assert!(!is_in_code_range(&ranges, 0x41));
        assert!(is_in_code_range(&ranges, 0x1ff));
        assert!(!is_in_code_range(&ranges, 0x200));
        assert!(!is_in_code_range(&ranges, 0x0f));
        assert!(!is_in_code_range(&[], 0x0f));
    }
}
