// regexec.rs - VM executor: bytecode interpreter, match_at, search.
//
// Structure: stack types → stack operations → match_at (opcode dispatch) →
// search. Backtracking state lives on an explicit heap stack, so the
// interpreter never recurses.

use crate::regdef::*;
use crate::regenc::*;
use crate::regint::*;

// ============================================================================
// Stack Types
// ============================================================================

#[derive(Clone, Debug)]
enum StackEntry {
    /// Choice point: resume at `pcode` with the subject at `pstr`.
    Alt { pcode: usize, pstr: usize },
    /// Capture group start, with the group's previous offsets.
    MemStart {
        zid: usize,
        prev_start: usize,
        prev_end: usize,
    },
    /// Capture group end, with the group's previous offsets.
    MemEnd {
        zid: usize,
        prev_start: usize,
        prev_end: usize,
    },
    /// Current iteration count of a counted repeat.
    RepeatInc { zid: usize, count: i32 },
    EmptyCheckStart { zid: usize, pstr: usize },
    /// Look-around checkpoint.
    Mark { zid: usize, pos: Option<usize> },
    /// Dead entry, skipped during pops.
    Void,
}

// Sentinel pcode of the bottom ALT entry
const FINISH_PCODE: usize = usize::MAX;

// ============================================================================
// MatchArg - runtime match state
// ============================================================================

/// State shared by every `match_at` call of one search. The capture
/// slots and the backtracking stack are reset, not reallocated, between
/// start positions.
pub struct MatchArg {
    pub options: SearchOptions,
    pub region: Region,
    /// Search start position; `NOT_EMPTY_AT_START` applies here.
    pub start: usize,
    mem_start: Vec<usize>,
    mem_end: Vec<usize>,
    stack: Vec<StackEntry>,
}

impl MatchArg {
    pub fn new(options: SearchOptions, start: usize) -> Self {
        MatchArg {
            options,
            region: Region::new(),
            start,
            mem_start: Vec::new(),
            mem_end: Vec::new(),
            stack: Vec::with_capacity(INIT_MATCH_STACK_SIZE),
        }
    }
}

// ============================================================================
// Stack operations
// ============================================================================

/// Pop entries until a choice point, restoring captures on the way.
fn stack_pop(
    stack: &mut Vec<StackEntry>,
    mem_start: &mut [usize],
    mem_end: &mut [usize],
) -> Option<(usize, usize)> {
    loop {
        match stack.pop()? {
            StackEntry::Alt { pcode, pstr } => return Some((pcode, pstr)),
            StackEntry::MemStart {
                zid,
                prev_start,
                prev_end,
            }
            | StackEntry::MemEnd {
                zid,
                prev_start,
                prev_end,
            } => {
                mem_start[zid] = prev_start;
                mem_end[zid] = prev_end;
            }
            _ => {}
        }
    }
}

/// Remove every entry down to and including the Mark `mark_id`.
fn stack_pop_to_mark(
    stack: &mut Vec<StackEntry>,
    mark_id: usize,
    mem_start: &mut [usize],
    mem_end: &mut [usize],
) -> Option<usize> {
    loop {
        match stack.pop()? {
            StackEntry::Mark { zid, pos } if zid == mark_id => return pos,
            StackEntry::MemStart {
                zid,
                prev_start,
                prev_end,
            }
            | StackEntry::MemEnd {
                zid,
                prev_start,
                prev_end,
            } => {
                mem_start[zid] = prev_start;
                mem_end[zid] = prev_end;
            }
            _ => {}
        }
    }
}

/// Void choice points above the Mark `mark_id` so a finished look-ahead
/// is never re-entered. Capture entries stay in place.
fn stack_void_to_mark(stack: &mut [StackEntry], mark_id: usize) -> Option<usize> {
    for entry in stack.iter_mut().rev() {
        match entry {
            StackEntry::Mark { zid, pos } if *zid == mark_id => {
                let saved_pos = *pos;
                *entry = StackEntry::Void;
                return saved_pos;
            }
            StackEntry::Alt { .. } | StackEntry::EmptyCheckStart { .. } => {
                *entry = StackEntry::Void;
            }
            _ => {}
        }
    }
    None
}

fn stack_get_repeat_count(stack: &[StackEntry], zid: usize) -> i32 {
    for entry in stack.iter().rev() {
        if let StackEntry::RepeatInc { zid: id, count } = entry {
            if *id == zid {
                return *count;
            }
        }
    }
    0
}

/// True when the subject position has not moved since the matching
/// EmptyCheckStart.
fn stack_empty_check(stack: &[StackEntry], zid: usize, s: usize) -> bool {
    for entry in stack.iter().rev() {
        if let StackEntry::EmptyCheckStart { zid: id, pstr } = entry {
            if *id == zid {
                return *pstr == s;
            }
        }
    }
    false
}

// ============================================================================
// Character helpers
// ============================================================================

/// Compare `text[ms..me]` against the subject at `s`, ignoring case.
/// Returns the end of the compared subject text.
fn string_cmp_ic(text: &[u8], ms: usize, me: usize, s: usize) -> Option<usize> {
    let mut a = ms;
    let mut b = s;
    while a < me {
        let (ca, na) = next_char(text, a)?;
        let (cb, nb) = next_char(text, b)?;
        if case_fold(ca) != case_fold(cb) {
            return None;
        }
        a = na;
        b = nb;
    }
    Some(b)
}

fn step_back(text: &[u8], s: usize, n: usize) -> Option<usize> {
    let mut q = s;
    for _ in 0..n {
        q = prev_char_head(text, q)?;
    }
    Some(q)
}

// ============================================================================
// match_at - bytecode interpreter
// ============================================================================

/// Try to match at `sstart`. On success, fills `msa.region` and returns
/// the match end.
pub fn match_at(reg: &RegexType, text: &[u8], sstart: usize, msa: &mut MatchArg) -> Option<usize> {
    let end = text.len();
    let ops = &reg.ops;
    let num_mem = reg.num_mem;

    let MatchArg {
        options,
        region,
        start,
        mem_start,
        mem_end,
        stack,
    } = msa;
    mem_start.clear();
    mem_start.resize(num_mem + 1, REGION_NOTPOS);
    mem_end.clear();
    mem_end.resize(num_mem + 1, REGION_NOTPOS);
    stack.clear();
    stack.push(StackEntry::Alt {
        pcode: FINISH_PCODE,
        pstr: sstart,
    });

    let mut p: usize = 0;
    let mut s: usize = sstart;

    loop {
        match &ops[p] {
            Operation::End => {
                let whole_ok = !options.contains(SearchOptions::MATCH_WHOLE_STRING) || s == end;
                let empty_ok = !(options.contains(SearchOptions::NOT_EMPTY_AT_START)
                    && s == sstart
                    && sstart == *start);
                if whole_ok && empty_ok {
                    region.resize(num_mem + 1);
                    region.beg[0] = sstart;
                    region.end[0] = s;
                    for i in 1..=num_mem {
                        if mem_start[i] != REGION_NOTPOS && mem_end[i] != REGION_NOTPOS {
                            region.beg[i] = mem_start[i];
                            region.end[i] = mem_end[i];
                        } else {
                            region.beg[i] = REGION_NOTPOS;
                            region.end[i] = REGION_NOTPOS;
                        }
                    }
                    return Some(s);
                }
            }

            Operation::Str { s: bytes } => {
                if text[s..].starts_with(bytes) {
                    s += bytes.len();
                    p += 1;
                    continue;
                }
            }

            Operation::StrIc { s: folded } => {
                let mut q = s;
                let ok = folded.iter().all(|&fc| match next_char(text, q) {
                    Some((c, nq)) if case_fold(c) == fc => {
                        q = nq;
                        true
                    }
                    _ => false,
                });
                if ok {
                    s = q;
                    p += 1;
                    continue;
                }
            }

            Operation::CClass { cc } => {
                if let Some((c, ns)) = next_char(text, s) {
                    if cc.is_code_in_cc(c) {
                        s = ns;
                        p += 1;
                        continue;
                    }
                }
            }

            Operation::AnyChar => {
                if let Some((c, ns)) = next_char(text, s) {
                    if c != NEWLINE_CODE {
                        s = ns;
                        p += 1;
                        continue;
                    }
                }
            }

            Operation::AnyCharMl => {
                if let Some((_, ns)) = next_char(text, s) {
                    s = ns;
                    p += 1;
                    continue;
                }
            }

            Operation::CType { ctype, not } => {
                if let Some((c, ns)) = next_char(text, s) {
                    if is_code_ctype(c, *ctype) != *not {
                        s = ns;
                        p += 1;
                        continue;
                    }
                }
            }

            Operation::WordBoundary => {
                if is_word_boundary(text, s) {
                    p += 1;
                    continue;
                }
            }

            Operation::NoWordBoundary => {
                if !is_word_boundary(text, s) {
                    p += 1;
                    continue;
                }
            }

            Operation::BeginBuf => {
                if s == 0 {
                    p += 1;
                    continue;
                }
            }

            Operation::EndBuf => {
                if s == end {
                    p += 1;
                    continue;
                }
            }

            Operation::SemiEndBuf => {
                if s == end || (s + 1 == end && text[s] == b'\n') {
                    p += 1;
                    continue;
                }
            }

            Operation::BeginLine => {
                if s == 0 || text[s - 1] == b'\n' {
                    p += 1;
                    continue;
                }
            }

            Operation::EndLine => {
                if s == end || text[s] == b'\n' {
                    p += 1;
                    continue;
                }
            }

            Operation::BackRef { mem } => {
                let (ms, me) = (mem_start[*mem], mem_end[*mem]);
                if ms != REGION_NOTPOS && me != REGION_NOTPOS && ms <= me {
                    let sub = &text[ms..me];
                    if text[s..].starts_with(sub) {
                        s += sub.len();
                        p += 1;
                        continue;
                    }
                }
            }

            Operation::BackRefIc { mem } => {
                let (ms, me) = (mem_start[*mem], mem_end[*mem]);
                if ms != REGION_NOTPOS && me != REGION_NOTPOS && ms <= me {
                    if let Some(ns) = string_cmp_ic(text, ms, me, s) {
                        s = ns;
                        p += 1;
                        continue;
                    }
                }
            }

            Operation::MemStart { mem } => {
                stack.push(StackEntry::MemStart {
                    zid: *mem,
                    prev_start: mem_start[*mem],
                    prev_end: mem_end[*mem],
                });
                mem_start[*mem] = s;
                p += 1;
                continue;
            }

            Operation::MemEnd { mem } => {
                stack.push(StackEntry::MemEnd {
                    zid: *mem,
                    prev_start: mem_start[*mem],
                    prev_end: mem_end[*mem],
                });
                mem_end[*mem] = s;
                p += 1;
                continue;
            }

            Operation::Fail => {}

            Operation::Jump { addr } => {
                p = jump_target(p, *addr);
                continue;
            }

            Operation::Push { addr } => {
                stack.push(StackEntry::Alt {
                    pcode: jump_target(p, *addr),
                    pstr: s,
                });
                p += 1;
                continue;
            }

            Operation::Repeat { id, addr } => {
                stack.push(StackEntry::RepeatInc { zid: *id, count: 0 });
                if reg.repeat_range[*id].lower == 0 {
                    stack.push(StackEntry::Alt {
                        pcode: jump_target(p, *addr),
                        pstr: s,
                    });
                }
                p += 1;
                continue;
            }

            Operation::RepeatNg { id, addr } => {
                stack.push(StackEntry::RepeatInc { zid: *id, count: 0 });
                if reg.repeat_range[*id].lower == 0 {
                    stack.push(StackEntry::Alt { pcode: p + 1, pstr: s });
                    p = jump_target(p, *addr);
                } else {
                    p += 1;
                }
                continue;
            }

            Operation::RepeatInc { id } => {
                let count = stack_get_repeat_count(stack, *id) + 1;
                stack.push(StackEntry::RepeatInc { zid: *id, count });
                let range = &reg.repeat_range[*id];
                if !is_infinite_repeat(range.upper) && count >= range.upper {
                    p += 1;
                } else if count >= range.lower {
                    stack.push(StackEntry::Alt { pcode: p + 1, pstr: s });
                    p = range.u_offset;
                } else {
                    p = range.u_offset;
                }
                continue;
            }

            Operation::RepeatIncNg { id } => {
                let count = stack_get_repeat_count(stack, *id) + 1;
                stack.push(StackEntry::RepeatInc { zid: *id, count });
                let range = &reg.repeat_range[*id];
                if !is_infinite_repeat(range.upper) && count >= range.upper {
                    p += 1;
                } else if count >= range.lower {
                    stack.push(StackEntry::Alt {
                        pcode: range.u_offset,
                        pstr: s,
                    });
                    p += 1;
                } else {
                    p = range.u_offset;
                }
                continue;
            }

            Operation::EmptyCheckStart { id } => {
                stack.push(StackEntry::EmptyCheckStart { zid: *id, pstr: s });
                p += 1;
                continue;
            }

            Operation::EmptyCheckEnd { id } => {
                // an empty iteration leaves the loop by skipping its back edge
                p += if stack_empty_check(stack, *id, s) { 2 } else { 1 };
                continue;
            }

            Operation::Mark { id, save_pos } => {
                stack.push(StackEntry::Mark {
                    zid: *id,
                    pos: save_pos.then_some(s),
                });
                p += 1;
                continue;
            }

            Operation::CutToMark { id, restore_pos } => {
                let pos = stack_void_to_mark(stack, *id);
                if *restore_pos {
                    if let Some(pos) = pos {
                        s = pos;
                    }
                }
                p += 1;
                continue;
            }

            Operation::PopToMark { id } => {
                stack_pop_to_mark(stack, *id, mem_start, mem_end);
                p += 1;
                continue;
            }

            Operation::StepBack { n } => {
                if let Some(q) = step_back(text, s, *n) {
                    s = q;
                    p += 1;
                    continue;
                }
            }
        }

        // fail: resume at the most recent choice point
        match stack_pop(stack, mem_start, mem_end) {
            Some((pcode, pstr)) if pcode != FINISH_PCODE => {
                p = pcode;
                s = pstr;
            }
            _ => return None,
        }
    }
}

// ============================================================================
// search
// ============================================================================

/// Find the leftmost match starting at or after byte offset `start`.
pub fn search(reg: &RegexType, text: &[u8], start: usize, options: SearchOptions) -> Option<Region> {
    let end = text.len();
    if start > end {
        return None;
    }
    let mut msa = MatchArg::new(options, start);

    if options.contains(SearchOptions::ANCHORED) {
        match_at(reg, text, start, &mut msa)?;
        return Some(msa.region);
    }

    if reg.anchor & ANCR_BEGIN_BUF != 0 {
        if start != 0 {
            return None;
        }
        match_at(reg, text, 0, &mut msa)?;
        return Some(msa.region);
    }

    let mut s = start;
    if let Some(finder) = &reg.exact_finder {
        while s <= end {
            let pos = s + finder.find(&text[s..])?;
            if match_at(reg, text, pos, &mut msa).is_some() {
                return Some(msa.region);
            }
            s = pos + mbc_enc_len(text[pos]);
        }
        return None;
    }

    loop {
        if match_at(reg, text, s, &mut msa).is_some() {
            return Some(msa.region);
        }
        if s >= end {
            return None;
        }
        s += mbc_enc_len(text[s]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regcomp::compile;

    fn search_str(pattern: &str, text: &str) -> Option<(usize, usize)> {
        let reg = compile(pattern, RegexOptions::empty())
            .unwrap_or_else(|e| panic!("compile {:?} failed: {}", pattern, e));
        search(&reg, text.as_bytes(), 0, SearchOptions::empty()).and_then(|r| r.pos(0))
    }

    fn group(pattern: &str, text: &str, mem: usize) -> Option<(usize, usize)> {
        let reg = compile(pattern, RegexOptions::empty()).unwrap();
        search(&reg, text.as_bytes(), 0, SearchOptions::empty()).and_then(|r| r.pos(mem))
    }

    #[test]
    fn literal_search() {
        assert_eq!(search_str("iig", "called piiig"), Some((9, 12)));
        assert_eq!(search_str("igs", "called piiig"), None);
    }

    #[test]
    fn greedy_and_lazy_loops() {
        assert_eq!(search_str("a+", "baaab"), Some((1, 4)));
        assert_eq!(search_str("a+?", "baaab"), Some((1, 2)));
        assert_eq!(search_str("a*", "baaab"), Some((0, 0)));
        assert_eq!(search_str("<.*?>", "<b>x</b>"), Some((0, 3)));
        assert_eq!(search_str("<.*>", "<b>x</b>"), Some((0, 8)));
    }

    #[test]
    fn counted_repeats() {
        assert_eq!(search_str("a{2,3}", "aaaa"), Some((0, 3)));
        assert_eq!(search_str("a{2,3}?", "aaaa"), Some((0, 2)));
        assert_eq!(search_str("a{3}", "aa"), None);
        assert_eq!(search_str("(ab){2}", "abababx"), Some((0, 4)));
        assert_eq!(search_str("x(ab){0,2}?y", "xababy"), Some((0, 6)));
    }

    #[test]
    fn nested_empty_loops_terminate() {
        assert_eq!(search_str("(a*)*b", "aab"), Some((0, 3)));
        assert_eq!(search_str("(a*)+$", "aa"), Some((0, 2)));
        assert_eq!(search_str("(?:a?){3,}c", "ac"), Some((0, 2)));
        assert_eq!(search_str("(|a)*?b", "ab"), Some((0, 2)));
    }

    #[test]
    fn alternation_prefers_leftmost_branch() {
        assert_eq!(search_str("a|ab", "ab"), Some((0, 1)));
        assert_eq!(search_str("(a|ab)c", "abc"), Some((0, 3)));
    }

    #[test]
    fn captures_restored_on_backtrack() {
        assert_eq!(group("(a|ab)(c|bcd)", "abcd", 1), Some((0, 1)));
        assert_eq!(group("(a)|b", "b", 1), None);
        assert_eq!(group("(?:(a)|b)*", "ab", 1), Some((0, 1)));
    }

    #[test]
    fn backreferences() {
        assert_eq!(search_str(r"(\w+) \1", "hello hello world"), Some((0, 11)));
        assert_eq!(search_str(r"(a)?b\1", "b"), None);
        let reg = compile(r"(ab)\1", RegexOptions::IGNORECASE).unwrap();
        let r = search(&reg, b"abAB", 0, SearchOptions::empty()).unwrap();
        assert_eq!(r.pos(0), Some((0, 4)));
    }

    #[test]
    fn anchors() {
        assert_eq!(search_str("^b", "ab"), None);
        assert_eq!(search_str("a$", "a\n"), Some((0, 1)));
        assert_eq!(search_str(r"a\Z", "a\n"), None);
        assert_eq!(search_str(r"\bis\b", "this is"), Some((5, 7)));
        assert_eq!(search_str(r"\Bis", "this is"), Some((2, 4)));
        let reg = compile("^b$", RegexOptions::MULTILINE).unwrap();
        let r = search(&reg, b"a\nb\nc", 0, SearchOptions::empty()).unwrap();
        assert_eq!(r.pos(0), Some((2, 3)));
    }

    #[test]
    fn look_around() {
        assert_eq!(search_str("foo(?=bar)", "foobaz foobar"), Some((7, 10)));
        assert_eq!(search_str("foo(?!bar)", "foobar foobaz"), Some((7, 10)));
        assert_eq!(search_str("(?<=\\$)\\d+", "cost: $42"), Some((7, 9)));
        assert_eq!(search_str("(?<!\\$)\\b\\d+", "$42 17"), Some((4, 6)));
        assert_eq!(search_str("(?<=é)x", "éx"), Some((2, 3)));
        assert_eq!(group("(?=(a+))a", "aaa", 1), Some((0, 3)));
    }

    #[test]
    fn multibyte_subject() {
        assert_eq!(search_str("é+", "caféé!"), Some((3, 7)));
        assert_eq!(search_str(".", "€"), Some((0, 3)));
        assert_eq!(search_str("[à-ÿ]", "voilà"), Some((4, 6)));
    }

    #[test]
    fn search_options() {
        let reg = compile("a*", RegexOptions::empty()).unwrap();
        let r = search(&reg, b"baa", 1, SearchOptions::NOT_EMPTY_AT_START).unwrap();
        assert_eq!(r.pos(0), Some((1, 3)));
        let r = search(&reg, b"b", 0, SearchOptions::NOT_EMPTY_AT_START).unwrap();
        assert_eq!(r.pos(0), Some((1, 1)));

        let reg = compile("ab|abc", RegexOptions::empty()).unwrap();
        let r = search(&reg, b"abc", 0, SearchOptions::MATCH_WHOLE_STRING).unwrap();
        assert_eq!(r.pos(0), Some((0, 3)));
        assert!(search(&reg, b"xabc", 0, SearchOptions::ANCHORED).is_none());
    }

    #[test]
    fn deep_input_does_not_recurse() {
        let text = "a".repeat(100_000);
        assert_eq!(search_str("(a|b)*", &text), Some((0, 100_000)));
    }

    #[test]
    fn match_arg_reused_across_starts() {
        let reg = compile("(a)?b", RegexOptions::empty()).unwrap();
        let text = b"abb";
        let mut msa = MatchArg::new(SearchOptions::empty(), 0);
        assert_eq!(match_at(&reg, text, 0, &mut msa), Some(2));
        assert_eq!(msa.region.pos(1), Some((0, 1)));
        let cap = msa.stack.capacity();

        assert_eq!(match_at(&reg, text, 2, &mut msa), Some(3));
        assert_eq!(msa.region.pos(1), None);
        assert_eq!(match_at(&reg, text, 1, &mut msa), Some(2));
        assert_eq!(msa.stack.capacity(), cap);
        assert_eq!(msa.mem_start.len(), 2);
    }
}
