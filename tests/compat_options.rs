// compat_options.rs - Compile options passed to compile() and the
// search-time options accepted by search().

use ferrule::regcomp::compile;
use ferrule::regdef::*;
use ferrule::regexec::search;

fn x2_opt(options: RegexOptions, pattern: &str, input: &str, from: usize, to: usize) {
    let reg = compile(pattern, options)
        .unwrap_or_else(|e| panic!("compile failed for {:?}: {}", pattern, e));

    let region = search(&reg, input.as_bytes(), 0, SearchOptions::empty()).unwrap_or_else(|| {
        panic!(
            "x2: expected match for {:?} against {:?} with options {:?}",
            pattern, input, options
        )
    });

    assert_eq!(
        region.pos(0),
        Some((from, to)),
        "x2: wrong match for {:?} against {:?} with options {:?}",
        pattern,
        input,
        options
    );
}

fn n_opt(options: RegexOptions, pattern: &str, input: &str) {
    let reg = compile(pattern, options)
        .unwrap_or_else(|e| panic!("compile failed for {:?}: {}", pattern, e));

    let region = search(&reg, input.as_bytes(), 0, SearchOptions::empty());
    assert!(
        region.is_none(),
        "n: expected no match for {:?} against {:?} with options {:?}, got {:?}",
        pattern,
        input,
        options,
        region.and_then(|r| r.pos(0))
    );
}

fn x2_search(pattern: &str, input: &str, start: usize, options: SearchOptions) -> Option<(usize, usize)> {
    let reg = compile(pattern, RegexOptions::empty())
        .unwrap_or_else(|e| panic!("compile failed for {:?}: {}", pattern, e));
    search(&reg, input.as_bytes(), start, options).and_then(|r| r.pos(0))
}

const I: RegexOptions = RegexOptions::IGNORECASE;
const S: RegexOptions = RegexOptions::DOTALL;
const M: RegexOptions = RegexOptions::MULTILINE;
const X: RegexOptions = RegexOptions::EXTEND;

// === IGNORECASE ===

#[test]
fn ignorecase_literals() {
    x2_opt(I, "hello", "say HeLLo", 4, 9);
    x2_opt(I, "ß", "ß", 0, 2);
    x2_opt(I, "ÄÖ", "äö", 0, 4);
    n_opt(RegexOptions::empty(), "hello", "HELLO");
}

#[test]
fn ignorecase_classes() {
    x2_opt(I, "[a-c]+", "xABCd", 1, 4);
    x2_opt(I, "[^a]", "Ab", 1, 2);
    x2_opt(I, "[É]", "é", 0, 2);
}

#[test]
fn ignorecase_backref() {
    x2_opt(I, r"(\w+) \1", "Abc aBC", 0, 7);
    n_opt(RegexOptions::empty(), r"(\w+) \1", "Abc aBC");
}

#[test]
fn inline_flag_can_turn_ignorecase_off() {
    x2_opt(I, "a(?-i:b)", "Ab", 0, 2);
    n_opt(I, "a(?-i:b)", "AB");
    n_opt(I, "(?-i:a)b", "AB");
}

// === DOTALL ===

#[test]
fn dotall() {
    x2_opt(S, "a.c", "a\nc", 0, 3);
    n_opt(RegexOptions::empty(), "a.c", "a\nc");
    x2_opt(S, ".*", "ab\ncd", 0, 5);
    x2_opt(RegexOptions::empty(), ".*", "ab\ncd", 0, 2);
}

// === MULTILINE ===

#[test]
fn multiline_anchors() {
    x2_opt(M, "^cd", "ab\ncd", 3, 5);
    x2_opt(M, "ab$", "ab\ncd", 0, 2);
    x2_opt(M, r"^\w+$", "\n\nxyz\n", 2, 5);
    n_opt(RegexOptions::empty(), "ab$", "ab\ncd");
    // \A and \Z ignore MULTILINE
    n_opt(M, r"\Acd", "ab\ncd");
    n_opt(M, r"ab\Z", "ab\ncd");
}

#[test]
fn multiline_finds_each_line() {
    let reg = compile(r"^\w", M).unwrap();
    let text = b"a\nb\nc";
    let mut starts = Vec::new();
    let mut pos = 0;
    while let Some(region) = search(&reg, text, pos, SearchOptions::empty()) {
        let (beg, end) = region.pos(0).unwrap();
        starts.push(beg);
        pos = end;
    }
    assert_eq!(starts, vec![0, 2, 4]);
}

// === EXTEND ===

#[test]
fn extended_mode() {
    x2_opt(X, "a b c", "abc", 0, 3);
    x2_opt(X, "a # comment\n b", "ab", 0, 2);
    x2_opt(X, r"a\ b", "a b", 0, 3);
    x2_opt(X, "[ ]", " ", 0, 1);
    x2_opt(X, r"\d {2}", "x12", 1, 3);
}

#[test]
fn combined_options() {
    x2_opt(I | M, "^B$", "a\nb\nc", 2, 3);
    x2_opt(I | S | X, "a . c", "A\nC", 0, 3);
}

// === Search options ===

#[test]
fn search_start_offset() {
    assert_eq!(x2_search("a", "aba", 1, SearchOptions::empty()), Some((2, 3)));
    assert_eq!(x2_search("a", "aba", 3, SearchOptions::empty()), None);
    assert_eq!(x2_search("", "aba", 3, SearchOptions::empty()), Some((3, 3)));
    assert_eq!(x2_search("a", "aba", 4, SearchOptions::empty()), None);
    // ^ sees the whole subject, not the start offset
    assert_eq!(x2_search("^a", "aba", 1, SearchOptions::empty()), None);
    assert_eq!(x2_search(r"\ba", "a ba", 1, SearchOptions::empty()), None);
}

#[test]
fn search_anchored() {
    assert_eq!(x2_search("b", "ab", 0, SearchOptions::ANCHORED), None);
    assert_eq!(x2_search("b", "ab", 1, SearchOptions::ANCHORED), Some((1, 2)));
    assert_eq!(x2_search("a*", "baa", 0, SearchOptions::ANCHORED), Some((0, 0)));
}

#[test]
fn search_whole_string() {
    let whole = SearchOptions::ANCHORED | SearchOptions::MATCH_WHOLE_STRING;
    assert_eq!(x2_search("a|ab", "ab", 0, whole), Some((0, 2)));
    assert_eq!(x2_search("a+?", "aaa", 0, whole), Some((0, 3)));
    assert_eq!(x2_search("a", "ab", 0, whole), None);
    assert_eq!(x2_search("a$", "a\n", 0, whole), None);
}

#[test]
fn search_not_empty_at_start() {
    let ne = SearchOptions::NOT_EMPTY_AT_START;
    assert_eq!(x2_search("x*", "ab", 0, ne), Some((1, 1)));
    assert_eq!(x2_search("a*", "ab", 0, ne), Some((0, 1)));
    assert_eq!(x2_search("a??", "ab", 0, ne), Some((0, 1)));
    assert_eq!(x2_search("x*", "ab", 2, ne), None);
}
