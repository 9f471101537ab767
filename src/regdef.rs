// regdef.rs - Public types, option flags, error codes and limits.
//
// Shared vocabulary between the parser, compiler, executor and the
// idiomatic API layer.

use bitflags::bitflags;
use smallvec::SmallVec;

// === Config Parameters ===
pub const MAX_CAPTURE_NUM: usize = 32767;
pub const MAX_REPEAT_NUM: i32 = 100_000;
pub const DEFAULT_PARSE_DEPTH_LIMIT: u32 = 4096;

// === Option Flags ===
bitflags! {
    /// Compile-time options. Also settable inline with `(?imsx)`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexOptions: u32 {
        /// `i`: letters match regardless of case.
        const IGNORECASE = 1 << 0;
        /// `x`: whitespace and `#` comments in the pattern are ignored.
        const EXTEND = 1 << 1;
        /// `s`: `.` also matches `\n`.
        const DOTALL = 1 << 2;
        /// `m`: `^` and `$` match at every line boundary.
        const MULTILINE = 1 << 3;
    }
}

bitflags! {
    /// Search-time options, consumed by [`crate::regexec::search`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SearchOptions: u32 {
        /// Only try a match at the start position.
        const ANCHORED = 1 << 0;
        /// A match must end at the end of the subject.
        const MATCH_WHOLE_STRING = 1 << 1;
        /// Reject a zero-length match at the start position.
        const NOT_EMPTY_AT_START = 1 << 2;
    }
}

impl RegexOptions {
    /// Map an inline flag letter to its option bit.
    pub fn from_flag_char(c: char) -> Option<RegexOptions> {
        match c {
            'i' => Some(RegexOptions::IGNORECASE),
            'x' => Some(RegexOptions::EXTEND),
            's' => Some(RegexOptions::DOTALL),
            'm' => Some(RegexOptions::MULTILINE),
            _ => None,
        }
    }
}

// === Error Codes ===
// internal error
pub const ERR_PARSER_BUG: i32 = -11;
pub const ERR_PARSE_DEPTH_LIMIT_OVER: i32 = -16;
// syntax error
pub const ERR_PREMATURE_END_OF_CHAR_CLASS: i32 = -104;
pub const ERR_END_PATTERN_AT_ESCAPE: i32 = -105;
pub const ERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE: i32 = -110;
pub const ERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE: i32 = -111;
pub const ERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED: i32 = -113;
pub const ERR_TARGET_OF_REPEAT_OPERATOR_INVALID: i32 = -114;
pub const ERR_NESTED_REPEAT_OPERATOR: i32 = -115;
pub const ERR_UNMATCHED_CLOSE_PARENTHESIS: i32 = -116;
pub const ERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS: i32 = -117;
pub const ERR_END_PATTERN_IN_GROUP: i32 = -118;
pub const ERR_UNDEFINED_GROUP_OPTION: i32 = -119;
pub const ERR_INVALID_ESCAPE: i32 = -120;
pub const ERR_INVALID_LOOK_BEHIND_PATTERN: i32 = -122;
pub const ERR_GLOBAL_FLAGS_NOT_AT_START: i32 = -123;
pub const ERR_INVALID_INLINE_FLAGS: i32 = -124;
// values error (syntax error)
pub const ERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE: i32 = -201;
pub const ERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE: i32 = -202;
pub const ERR_EMPTY_RANGE_IN_CHAR_CLASS: i32 = -203;
pub const ERR_INVALID_BACKREF: i32 = -208;
pub const ERR_TOO_MANY_CAPTURES: i32 = -210;
pub const ERR_EMPTY_GROUP_NAME: i32 = -214;
pub const ERR_INVALID_GROUP_NAME: i32 = -215;
pub const ERR_INVALID_CHAR_IN_GROUP_NAME: i32 = -216;
pub const ERR_UNDEFINED_NAME_REFERENCE: i32 = -217;
pub const ERR_MULTIPLEX_DEFINED_NAME: i32 = -219;
pub const ERR_INVALID_CODE_POINT_VALUE: i32 = -400;
// match result access
pub const ERR_GROUP_NOT_FOUND: i32 = -500;
pub const ERR_INVALID_GROUP_REFERENCE: i32 = -501;

/// Pattern errors live in the -100..-499 range.
#[inline]
pub fn is_pattern_error(code: i32) -> bool {
    (-499..=-100).contains(&code)
}

// === Region ===

pub const REGION_NOTPOS: usize = usize::MAX;

/// Start/end byte offsets of the whole match (slot 0) and of every capture
/// group. A group that did not participate holds [`REGION_NOTPOS`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub num_regs: usize,
    pub beg: SmallVec<[usize; 8]>,
    pub end: SmallVec<[usize; 8]>,
}

impl Region {
    pub fn new() -> Self {
        Region::default()
    }

    pub fn resize(&mut self, n: usize) {
        self.beg.resize(n, REGION_NOTPOS);
        self.end.resize(n, REGION_NOTPOS);
        self.num_regs = n;
    }

    /// Offsets of slot `i`, or `None` if the group did not participate.
    pub fn pos(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.num_regs || self.beg[i] == REGION_NOTPOS {
            return None;
        }
        Some((self.beg[i], self.end[i]))
    }
}
