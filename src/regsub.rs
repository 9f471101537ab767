// regsub.rs - Replacement templates: parsing and expansion.
//
// A template is parsed once per substitution call, so group references
// are validated before any text is replaced.

use tracing::trace;

use crate::error::RegexError;
use crate::regdef::{Region, ERR_INVALID_CODE_POINT_VALUE, ERR_INVALID_ESCAPE};
use crate::regint::{NameTable, RegexType};

/// One piece of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplatePiece {
    Literal(String),
    /// Text of a capture group; group 0 is the whole match.
    Group(usize),
}

/// A parsed replacement template.
///
/// `\1`..`\99`, `\g<n>` and `\g<name>` insert group text. `\\`, `\n`, `\t`,
/// `\r`, `\f`, `\v`, `\a`, `\b`, `\0oo` and three-digit octal `\ooo` are
/// escapes. A backslash before any other ASCII letter is an error; before
/// anything else it is kept as written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<TemplatePiece>,
}

fn push_group(pieces: &mut Vec<TemplatePiece>, lit: &mut String, num: usize) {
    if !lit.is_empty() {
        pieces.push(TemplatePiece::Literal(std::mem::take(lit)));
    }
    pieces.push(TemplatePiece::Group(num));
}

fn invalid_reference(group: impl Into<String>, offset: usize) -> RegexError {
    RegexError::InvalidGroupReference {
        group: group.into(),
        offset,
    }
}

fn resolve_group_ref(
    name: &str,
    offset: usize,
    num_mem: usize,
    names: &NameTable,
) -> Result<usize, RegexError> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
        return match name.parse::<usize>() {
            Ok(num) if num <= num_mem => Ok(num),
            _ => Err(invalid_reference(name, offset)),
        };
    }
    names
        .lookup(name)
        .ok_or_else(|| invalid_reference(name, offset))
}

impl Template {
    /// Parse `template` against the groups `reg` defines.
    pub fn parse(template: &str, reg: &RegexType) -> Result<Template, RegexError> {
        Self::parse_with(template, reg.num_mem, &reg.name_table)
    }

    /// Parse `template` for a pattern with `num_mem` capture groups named
    /// by `names`.
    pub fn parse_with(
        template: &str,
        num_mem: usize,
        names: &NameTable,
    ) -> Result<Template, RegexError> {
        let chars: Vec<char> = template.chars().collect();
        let mut pieces = Vec::new();
        let mut lit = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if c != '\\' {
                lit.push(c);
                continue;
            }
            let at = i - 1;
            let Some(&e) = chars.get(i) else {
                lit.push('\\');
                break;
            };
            i += 1;

            match e {
                '1'..='9' => {
                    let octal: Option<Vec<u32>> = [Some(&e), chars.get(i), chars.get(i + 1)]
                        .into_iter()
                        .map(|c| c.and_then(|c| c.to_digit(8)))
                        .collect();
                    if let Some(digits) = octal {
                        let code = digits.into_iter().fold(0u32, |acc, d| acc * 8 + d);
                        if code > 0o377 {
                            let text: String = chars[at..i + 2].iter().collect();
                            return Err(RegexError::syntax(
                                ERR_INVALID_CODE_POINT_VALUE,
                                at,
                                Some(&text),
                            ));
                        }
                        lit.push(char::from_u32(code).unwrap_or('\0'));
                        i += 2;
                        continue;
                    }
                    let mut num = e as usize - '0' as usize;
                    if let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
                        num = num * 10 + d as usize;
                        i += 1;
                    }
                    if num > num_mem {
                        return Err(invalid_reference(num.to_string(), at));
                    }
                    push_group(&mut pieces, &mut lit, num);
                }
                'g' if chars.get(i) == Some(&'<') => {
                    let name_start = i + 1;
                    let Some(len) = chars[name_start..].iter().position(|&c| c == '>') else {
                        let rest: String = chars[name_start..].iter().collect();
                        return Err(invalid_reference(rest, at));
                    };
                    let name: String = chars[name_start..name_start + len].iter().collect();
                    let num = resolve_group_ref(&name, at, num_mem, names)?;
                    push_group(&mut pieces, &mut lit, num);
                    i = name_start + len + 1;
                }
                '0' => {
                    let mut code = 0u32;
                    for _ in 0..2 {
                        match chars.get(i).and_then(|c| c.to_digit(8)) {
                            Some(d) => {
                                code = code * 8 + d;
                                i += 1;
                            }
                            None => break,
                        }
                    }
                    lit.push(char::from_u32(code).unwrap_or('\0'));
                }
                'n' => lit.push('\n'),
                't' => lit.push('\t'),
                'r' => lit.push('\r'),
                'f' => lit.push('\x0c'),
                'v' => lit.push('\x0b'),
                'a' => lit.push('\x07'),
                'b' => lit.push('\x08'),
                '\\' => lit.push('\\'),
                other if other.is_ascii_alphabetic() => {
                    let text = format!("\\{}", other);
                    return Err(RegexError::syntax(ERR_INVALID_ESCAPE, at, Some(&text)));
                }
                other => {
                    lit.push('\\');
                    lit.push(other);
                }
            }
        }
        if !lit.is_empty() {
            pieces.push(TemplatePiece::Literal(lit));
        }

        trace!("template {:?} parsed into {} pieces", template, pieces.len());
        Ok(Template { pieces })
    }

    /// Append the expansion for one match of `text` to `dst`. Groups that
    /// did not participate expand to nothing.
    pub fn expand(&self, text: &str, region: &Region, dst: &mut String) {
        for piece in &self.pieces {
            match piece {
                TemplatePiece::Literal(s) => dst.push_str(s),
                TemplatePiece::Group(num) => {
                    if let Some((beg, end)) = region.pos(*num) {
                        dst.push_str(&text[beg..end]);
                    }
                }
            }
        }
    }

    pub fn pieces(&self) -> &[TemplatePiece] {
        &self.pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regcomp::compile;
    use crate::regdef::RegexOptions;

    fn reg(pattern: &str) -> RegexType {
        compile(pattern, RegexOptions::empty()).unwrap()
    }

    #[test]
    fn parse_numbered_and_named_groups() {
        let reg = reg(r"(?P<user>\w+)@(\w+)");
        let t = Template::parse(r"\2:\g<user>:\g<0>", &reg).unwrap();
        assert_eq!(
            t.pieces(),
            &[
                TemplatePiece::Group(2),
                TemplatePiece::Literal(":".to_string()),
                TemplatePiece::Group(1),
                TemplatePiece::Literal(":".to_string()),
                TemplatePiece::Group(0),
            ]
        );
    }

    #[test]
    fn parse_escapes() {
        let reg = reg("a");
        let t = Template::parse(r"x\ty\\z\.\0\b", &reg).unwrap();
        assert_eq!(
            t.pieces(),
            &[TemplatePiece::Literal("x\ty\\z\\.\0\x08".to_string())]
        );
    }

    #[test]
    fn two_digit_group_reference() {
        let reg = reg("(a)(b)(c)(d)(e)(f)(g)(h)(i)(j)(k)");
        let t = Template::parse(r"\11", &reg).unwrap();
        assert_eq!(t.pieces(), &[TemplatePiece::Group(11)]);
    }

    #[test]
    fn three_octal_digits_are_an_escape() {
        let reg = reg("(a)(b)(c)(d)(e)(f)(g)(h)(i)(j)");
        let t = Template::parse(r"\100\1000\101x\10", &reg).unwrap();
        assert_eq!(
            t.pieces(),
            &[
                TemplatePiece::Literal("@@0Ax".to_string()),
                TemplatePiece::Group(10),
            ]
        );
        match Template::parse(r"\400", &reg) {
            Err(RegexError::Syntax { code, offset, .. }) => {
                assert_eq!(code, ERR_INVALID_CODE_POINT_VALUE);
                assert_eq!(offset, 0);
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_letter_escapes_rejected() {
        let reg = reg("a");
        match Template::parse(r"ok\q", &reg) {
            Err(RegexError::Syntax { code, offset, message }) => {
                assert_eq!(code, ERR_INVALID_ESCAPE);
                assert_eq!(offset, 2);
                assert_eq!(message, r"invalid escape <\q>");
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
        assert!(Template::parse(r"\Q", &reg).is_err());
        assert!(Template::parse(r"\d", &reg).is_err());
        assert!(Template::parse(r"\-\é", &reg).is_ok());
    }

    #[test]
    fn undefined_groups_rejected() {
        let reg = reg("(a)");
        match Template::parse(r"ok \2", &reg) {
            Err(RegexError::InvalidGroupReference { group, offset }) => {
                assert_eq!(group, "2");
                assert_eq!(offset, 3);
            }
            other => panic!("expected InvalidGroupReference, got {:?}", other),
        }
        assert!(Template::parse(r"\g<name>", &reg).is_err());
        assert!(Template::parse(r"\g<5>", &reg).is_err());
        assert!(Template::parse(r"\g<1", &reg).is_err());
    }

    #[test]
    fn expand_skips_unset_groups() {
        let reg = reg("(a)|(b)");
        let t = Template::parse(r"[\1|\2]", &reg).unwrap();
        let mut region = Region::new();
        region.resize(3);
        region.beg[0] = 0;
        region.end[0] = 1;
        region.beg[2] = 0;
        region.end[2] = 1;
        let mut out = String::new();
        t.expand("b", &region, &mut out);
        assert_eq!(out, "[|b]");
    }
}
