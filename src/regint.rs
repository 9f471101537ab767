// regint.rs - Internal definitions: bytecode, bitsets, compiled program.

use std::collections::HashMap;
use std::sync::Arc;

use memchr::memmem;

use crate::regdef::*;
use crate::regenc::CType;
use crate::regparse_types::CClassNode;

// === Config Constants ===
pub const INIT_MATCH_STACK_SIZE: usize = 160;

// === Internal Constants ===
pub const INFINITE_REPEAT: i32 = -1;

#[inline]
pub fn is_infinite_repeat(n: i32) -> bool {
    n == INFINITE_REPEAT
}

// === Bytecode Types ===
pub type RelAddrType = i32;
pub type MemNumType = usize;

/// Absolute target of a relative jump taken at `p`.
#[inline]
pub fn jump_target(p: usize, addr: RelAddrType) -> usize {
    (p as isize + addr as isize) as usize
}

// === BitSet (256 bits for Latin-1 character classes) ===
pub const BITS_PER_BYTE: usize = 8;
pub const SINGLE_BYTE_SIZE: usize = 1 << BITS_PER_BYTE;
pub const BITS_IN_ROOM: usize = 32;
pub const BITSET_REAL_SIZE: usize = SINGLE_BYTE_SIZE / BITS_IN_ROOM;
pub type Bits = u32;
pub type BitSet = [Bits; BITSET_REAL_SIZE];

#[inline]
pub fn bs_room(pos: usize) -> usize {
    pos >> 5
}

#[inline]
pub fn bs_bit(pos: usize) -> u32 {
    1u32 << (pos & 0x1f)
}

#[inline]
pub fn bitset_at(bs: &BitSet, pos: usize) -> bool {
    (bs[bs_room(pos)] & bs_bit(pos)) != 0
}

#[inline]
pub fn bitset_set_bit(bs: &mut BitSet, pos: usize) {
    bs[bs_room(pos)] |= bs_bit(pos);
}

pub fn bitset_set_range(bs: &mut BitSet, from: usize, to: usize) {
    for pos in from..=to {
        bitset_set_bit(bs, pos);
    }
}

// === Anchor Flags ===
pub const ANCR_BEGIN_BUF: i32 = 1 << 4;

// === Operation (Bytecode Instruction) ===
//
// Jump addresses are relative to the instruction that holds them.
#[derive(Clone, Debug)]
pub enum Operation {
    End,
    Str { s: Box<[u8]> },
    /// Case-folded characters, compared against folded subject chars.
    StrIc { s: Box<[char]> },
    CClass { cc: Box<CClassNode> },
    AnyChar,
    AnyCharMl,
    CType { ctype: CType, not: bool },
    WordBoundary,
    NoWordBoundary,
    BeginBuf,
    EndBuf,
    SemiEndBuf,
    BeginLine,
    EndLine,
    BackRef { mem: MemNumType },
    BackRefIc { mem: MemNumType },
    MemStart { mem: MemNumType },
    MemEnd { mem: MemNumType },
    Fail,
    Jump { addr: RelAddrType },
    Push { addr: RelAddrType },
    Repeat { id: usize, addr: RelAddrType },
    RepeatNg { id: usize, addr: RelAddrType },
    RepeatInc { id: usize },
    RepeatIncNg { id: usize },
    EmptyCheckStart { id: usize },
    /// Skips the following instruction when the iteration consumed nothing.
    EmptyCheckEnd { id: usize },
    Mark { id: usize, save_pos: bool },
    CutToMark { id: usize, restore_pos: bool },
    PopToMark { id: usize },
    StepBack { n: usize },
}

// === RepeatRange ===
#[derive(Clone, Debug)]
pub struct RepeatRange {
    pub lower: i32,
    pub upper: i32,
    /// Address of the first instruction of the repeated body.
    pub u_offset: usize,
}

// === Name Table ===
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    map: HashMap<String, MemNumType>,
    /// Group name by group number; slot 0 is the whole match.
    names: Vec<Option<String>>,
}

impl NameTable {
    pub fn add(&mut self, name: &str, regnum: MemNumType) -> Result<(), i32> {
        if self.map.contains_key(name) {
            return Err(ERR_MULTIPLEX_DEFINED_NAME);
        }
        self.map.insert(name.to_string(), regnum);
        if self.names.len() <= regnum {
            self.names.resize(regnum + 1, None);
        }
        self.names[regnum] = Some(name.to_string());
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<MemNumType> {
        self.map.get(name).copied()
    }

    pub fn name_of(&self, regnum: MemNumType) -> Option<&str> {
        self.names.get(regnum).and_then(|n| n.as_deref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// === regex_t ===
#[derive(Clone, Debug)]
pub struct RegexType {
    // bytecode
    pub ops: Vec<Operation>,

    // capture info
    pub num_mem: usize,
    pub num_repeat: usize,
    pub num_empty_check: usize,
    pub num_mark: usize,
    pub repeat_range: Vec<RepeatRange>,

    // metadata
    pub options: RegexOptions,
    pub name_table: Arc<NameTable>,
    pub pattern: String,

    // optimization
    pub anchor: i32,
    /// Finder for a literal every match starts with.
    pub exact_finder: Option<memmem::Finder<'static>>,
}

impl RegexType {
    pub fn new(pattern: &str, options: RegexOptions) -> Self {
        RegexType {
            ops: Vec::new(),
            num_mem: 0,
            num_repeat: 0,
            num_empty_check: 0,
            num_mark: 0,
            repeat_range: Vec::new(),
            options,
            name_table: Arc::new(NameTable::default()),
            pattern: pattern.to_string(),
            anchor: 0,
            exact_finder: None,
        }
    }
}

// === Option check helpers ===
#[inline]
pub fn opton_ignorecase(option: RegexOptions) -> bool {
    option.contains(RegexOptions::IGNORECASE)
}

#[inline]
pub fn opton_extend(option: RegexOptions) -> bool {
    option.contains(RegexOptions::EXTEND)
}

#[inline]
pub fn opton_dotall(option: RegexOptions) -> bool {
    option.contains(RegexOptions::DOTALL)
}

#[inline]
pub fn opton_multiline(option: RegexOptions) -> bool {
    option.contains(RegexOptions::MULTILINE)
}

// === Value helpers ===
#[inline]
pub fn digitval(c: char) -> u32 {
    c as u32 - '0' as u32
}

#[inline]
pub fn is_code_octal(c: char) -> bool {
    ('0'..='7').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitset_ranges() {
        let mut bs = BitSet::default();
        bitset_set_range(&mut bs, b'a' as usize, b'f' as usize);
        bitset_set_bit(&mut bs, 0xff);
        assert!(bitset_at(&bs, b'a' as usize));
        assert!(bitset_at(&bs, b'f' as usize));
        assert!(!bitset_at(&bs, b'g' as usize));
        assert!(bitset_at(&bs, 0xff));
    }

    #[test]
    fn relative_jumps() {
        assert_eq!(jump_target(5, 3), 8);
        assert_eq!(jump_target(5, -5), 0);
    }

    #[test]
    fn name_table_rejects_duplicates() {
        let mut table = NameTable::default();
        table.add("year", 1).unwrap();
        table.add("month", 3).unwrap();
        assert_eq!(table.add("year", 4), Err(ERR_MULTIPLEX_DEFINED_NAME));
        assert_eq!(table.lookup("month"), Some(3));
        assert_eq!(table.name_of(1), Some("year"));
        assert_eq!(table.name_of(2), None);
        assert_eq!(table.len(), 2);
    }
}
