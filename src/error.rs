// error.rs - Idiomatic Rust error types for Ferrule.
//
// The parser and compiler report plain i32 codes; they are grouped here
// into semantic variants while preserving the original code.

use std::fmt;

use crate::regdef::*;
use crate::regerror::{error_code_to_format, error_code_to_str};

/// A capture group named either by number or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupId {
    Index(usize),
    Name(String),
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Index(i) => write!(f, "{}", i),
            GroupId::Name(name) => f.write_str(name),
        }
    }
}

/// Error type for regex compilation, match-result access and substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// Syntax error in the pattern, or a bad escape in a replacement
    /// template. `offset` is the char index where parsing stopped.
    Syntax {
        code: i32,
        message: String,
        offset: usize,
    },
    /// Pattern nesting exceeds the parser depth limit.
    ParseDepthLimitOver,
    /// A match result was asked for a group the pattern does not define.
    GroupNotFound(GroupId),
    /// A replacement template references a group the pattern does not define.
    InvalidGroupReference { group: String, offset: usize },
    /// Internal engine bug (should not occur in correct usage).
    InternalBug { code: i32, message: String },
    /// Other error not covered by specific variants.
    Other(i32),
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Syntax {
                message, offset, ..
            } => write!(f, "syntax error at position {}: {}", offset, message),
            RegexError::ParseDepthLimitOver => write!(f, "parse depth limit over"),
            RegexError::GroupNotFound(group) => write!(f, "no such group: {}", group),
            RegexError::InvalidGroupReference { group, offset } => write!(
                f,
                "invalid group reference {} at position {}",
                group, offset
            ),
            RegexError::InternalBug { message, .. } => write!(f, "internal error: {}", message),
            RegexError::Other(code) => write!(f, "error code {}", code),
        }
    }
}

impl std::error::Error for RegexError {}

impl From<i32> for RegexError {
    fn from(code: i32) -> Self {
        match code {
            ERR_PARSE_DEPTH_LIMIT_OVER => RegexError::ParseDepthLimitOver,

            ERR_PARSER_BUG => RegexError::InternalBug {
                code,
                message: error_code_to_format(code).to_string(),
            },

            c if is_pattern_error(c) => RegexError::Syntax {
                code: c,
                message: error_code_to_str(c, None),
                offset: 0,
            },

            _ => RegexError::Other(code),
        }
    }
}

impl RegexError {
    /// Build a syntax error with its position and message parameter.
    pub(crate) fn syntax(code: i32, offset: usize, param: Option<&str>) -> Self {
        if !is_pattern_error(code) {
            return RegexError::from(code);
        }
        RegexError::Syntax {
            code,
            message: error_code_to_str(code, param),
            offset,
        }
    }

    /// Returns the numeric error code.
    pub fn code(&self) -> i32 {
        match self {
            RegexError::Syntax { code, .. } => *code,
            RegexError::ParseDepthLimitOver => ERR_PARSE_DEPTH_LIMIT_OVER,
            RegexError::GroupNotFound(_) => ERR_GROUP_NOT_FOUND,
            RegexError::InvalidGroupReference { .. } => ERR_INVALID_GROUP_REFERENCE,
            RegexError::InternalBug { code, .. } => *code,
            RegexError::Other(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_syntax_error() {
        let err = RegexError::from(ERR_PREMATURE_END_OF_CHAR_CLASS);
        assert!(matches!(err, RegexError::Syntax { .. }));
        assert_eq!(err.code(), ERR_PREMATURE_END_OF_CHAR_CLASS);
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn syntax_with_param_and_offset() {
        let err = RegexError::syntax(ERR_UNDEFINED_NAME_REFERENCE, 7, Some("year"));
        assert_eq!(
            err.to_string(),
            "syntax error at position 7: undefined name <year> reference"
        );
    }

    #[test]
    fn from_depth_limit() {
        let err = RegexError::from(ERR_PARSE_DEPTH_LIMIT_OVER);
        assert_eq!(err, RegexError::ParseDepthLimitOver);
        assert_eq!(err.code(), ERR_PARSE_DEPTH_LIMIT_OVER);
    }

    #[test]
    fn from_internal_bug() {
        let err = RegexError::from(ERR_PARSER_BUG);
        assert!(matches!(err, RegexError::InternalBug { .. }));
    }

    #[test]
    fn from_unknown_code() {
        let err = RegexError::from(-9999);
        assert!(matches!(err, RegexError::Other(-9999)));
    }

    #[test]
    fn group_errors_display() {
        let err = RegexError::GroupNotFound(GroupId::Index(3));
        assert_eq!(err.to_string(), "no such group: 3");
        assert_eq!(err.code(), ERR_GROUP_NOT_FOUND);

        let err = RegexError::InvalidGroupReference {
            group: "host".to_string(),
            offset: 4,
        };
        assert_eq!(err.to_string(), "invalid group reference host at position 4");
        assert_eq!(err.code(), ERR_INVALID_GROUP_REFERENCE);
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(RegexError::ParseDepthLimitOver);
        assert_eq!(err.to_string(), "parse depth limit over");
    }
}
