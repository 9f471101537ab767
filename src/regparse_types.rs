// regparse_types.rs - AST node types, token types and the parse environment.

use smallvec::SmallVec;

use crate::regdef::*;
use crate::regenc::{case_fold, to_upper_simple, CType};
use crate::regint::*;

// === Node Type Enum ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Empty,
    String,
    CClass,
    CType,
    AnyChar,
    Anchor,
    BackRef,
    Quant,
    Bag,
    List,
    Alt,
}

// === Anchor Type ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorType {
    BeginBuf,
    EndBuf,
    SemiEndBuf,
    BeginLine,
    EndLine,
    WordBoundary,
    NoWordBoundary,
    PrecRead,
    PrecReadNot,
    LookBehind,
    LookBehindNot,
}

// === AST Node ===

#[derive(Clone, Debug)]
pub enum Node {
    Empty,
    String(StrNode),
    CClass(CClassNode),
    CType(CtypeNode),
    AnyChar { multiline: bool },
    Anchor(AnchorNode),
    BackRef(BackRefNode),
    Quant(QuantNode),
    Bag(BagNode),
    List(Vec<Node>),
    Alt(Vec<Node>),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Empty => NodeType::Empty,
            Node::String(_) => NodeType::String,
            Node::CClass(_) => NodeType::CClass,
            Node::CType(_) => NodeType::CType,
            Node::AnyChar { .. } => NodeType::AnyChar,
            Node::Anchor(_) => NodeType::Anchor,
            Node::BackRef(_) => NodeType::BackRef,
            Node::Quant(_) => NodeType::Quant,
            Node::Bag(_) => NodeType::Bag,
            Node::List(_) => NodeType::List,
            Node::Alt(_) => NodeType::Alt,
        }
    }

    /// Minimum number of characters this node consumes.
    pub fn min_len(&self) -> usize {
        match self {
            Node::Empty | Node::Anchor(_) | Node::BackRef(_) => 0,
            Node::String(sn) => sn.s.chars().count(),
            Node::CClass(_) | Node::CType(_) | Node::AnyChar { .. } => 1,
            Node::Quant(qn) => (qn.lower.max(0) as usize).saturating_mul(qn.body.min_len()),
            Node::Bag(bag) => bag.body.min_len(),
            Node::List(items) => items.iter().map(Node::min_len).sum(),
            Node::Alt(alts) => alts.iter().map(Node::min_len).min().unwrap_or(0),
        }
    }

    /// Exact number of characters this node consumes, if it is fixed.
    pub fn char_len(&self) -> Option<usize> {
        match self {
            Node::Empty | Node::Anchor(_) => Some(0),
            Node::String(sn) => Some(sn.s.chars().count()),
            Node::CClass(_) | Node::CType(_) | Node::AnyChar { .. } => Some(1),
            Node::BackRef(_) => None,
            Node::Quant(qn) => {
                if qn.lower != qn.upper {
                    return None;
                }
                qn.body.char_len().map(|n| n * qn.lower as usize)
            }
            Node::Bag(bag) => bag.body.char_len(),
            Node::List(items) => items.iter().map(Node::char_len).sum(),
            Node::Alt(alts) => {
                let mut lens = alts.iter().map(Node::char_len);
                let first = lens.next()??;
                for len in lens {
                    if len? != first {
                        return None;
                    }
                }
                Some(first)
            }
        }
    }
}

// === Node Variants ===

#[derive(Clone, Debug)]
pub struct StrNode {
    pub s: String,
    pub ignorecase: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CClassNode {
    pub not: bool,
    pub ignorecase: bool,
    /// Code points below 256.
    pub bs: BitSet,
    /// Ranges at or above U+0100.
    pub ranges: SmallVec<[(char, char); 2]>,
    pub ctypes: SmallVec<[(CType, bool); 2]>,
}

const MBCODE_START: char = '\u{100}';

impl CClassNode {
    pub fn new(ignorecase: bool) -> Self {
        CClassNode {
            ignorecase,
            ..Default::default()
        }
    }

    pub fn is_not(&self) -> bool {
        self.not
    }

    pub fn add_code(&mut self, c: char) {
        self.add_range(c, c);
    }

    pub fn add_range(&mut self, from: char, to: char) {
        if (from as u32) < SINGLE_BYTE_SIZE as u32 {
            let sb_to = (to as u32).min(SINGLE_BYTE_SIZE as u32 - 1);
            bitset_set_range(&mut self.bs, from as usize, sb_to as usize);
        }
        if to >= MBCODE_START {
            self.ranges.push((from.max(MBCODE_START), to));
        }
    }

    pub fn add_ctype(&mut self, ctype: CType, not: bool) {
        self.ctypes.push((ctype, not));
    }

    fn contains(&self, c: char) -> bool {
        let code = c as u32;
        if code < SINGLE_BYTE_SIZE as u32 {
            if bitset_at(&self.bs, code as usize) {
                return true;
            }
        } else if self.ranges.iter().any(|&(from, to)| from <= c && c <= to) {
            return true;
        }
        self.ctypes
            .iter()
            .any(|&(ctype, not)| crate::regenc::is_code_ctype(c, ctype) != not)
    }

    /// Class membership with negation and case folding applied.
    pub fn is_code_in_cc(&self, c: char) -> bool {
        let mut found = self.contains(c);
        if !found && self.ignorecase {
            found = self.contains(case_fold(c)) || self.contains(to_upper_simple(c));
        }
        found != self.not
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CtypeNode {
    pub ctype: CType,
    pub not: bool,
}

#[derive(Clone, Debug)]
pub struct AnchorNode {
    pub anchor_type: AnchorType,
    pub body: Option<Box<Node>>,
    /// Width of a look-behind body, in characters.
    pub char_len: usize,
}

impl AnchorNode {
    pub fn new(anchor_type: AnchorType) -> Self {
        AnchorNode {
            anchor_type,
            body: None,
            char_len: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BackRefNode {
    pub regnum: usize,
    pub ignorecase: bool,
}

#[derive(Clone, Debug)]
pub struct QuantNode {
    pub body: Box<Node>,
    pub lower: i32,
    pub upper: i32,
    pub greedy: bool,
}

#[derive(Clone, Debug)]
pub struct BagNode {
    pub regnum: usize,
    pub body: Box<Node>,
}

// === Tokens ===

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenType {
    Eot,
    Char(char),
    AnyChar,
    CharType { ctype: CType, not: bool },
    Anchor(AnchorType),
    BackRef(usize),
    Repeat { lower: i32, upper: i32, greedy: bool },
    Alt,
    SubexpOpen,
    SubexpClose,
    CcOpen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CcTokenType {
    Char(char),
    CharType { ctype: CType, not: bool },
    Close,
}

#[derive(Clone, Debug)]
pub struct PToken {
    pub token_type: TokenType,
    /// Pattern position where the token started.
    pub backp: usize,
}

impl PToken {
    pub fn new() -> Self {
        PToken {
            token_type: TokenType::Eot,
            backp: 0,
        }
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self.token_type, TokenType::Repeat { .. })
    }
}

impl Default for PToken {
    fn default() -> Self {
        Self::new()
    }
}

// === Parse Environment ===

#[derive(Debug)]
pub struct ParseEnv {
    pub options: RegexOptions,
    pub num_mem: usize,
    /// `mem_closed[n]` is true once group `n` has been fully parsed.
    pub mem_closed: Vec<bool>,
    pub name_table: NameTable,
    pub parse_depth: u32,
    pub parse_depth_limit: u32,
    /// Nothing but comments and global flag groups has been parsed yet.
    pub at_pattern_start: bool,
    pub error_pos: usize,
    pub error_param: Option<String>,
}

impl ParseEnv {
    pub fn new(options: RegexOptions) -> Self {
        ParseEnv {
            options,
            num_mem: 0,
            mem_closed: vec![true],
            name_table: NameTable::default(),
            parse_depth: 0,
            parse_depth_limit: DEFAULT_PARSE_DEPTH_LIMIT,
            at_pattern_start: true,
            error_pos: 0,
            error_param: None,
        }
    }

    pub fn is_mem_closed(&self, regnum: usize) -> bool {
        self.mem_closed.get(regnum).copied().unwrap_or(false)
    }
}
