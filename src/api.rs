// api.rs - Idiomatic Rust API for Ferrule.
//
// Wraps the internals (compile, search, Template) with Rust-native types:
// Regex, RegexBuilder, Match, Captures, FindIter, CaptureMatches, plus the
// one-shot functions find_first, find_all and substitute.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::Arc;

use crate::error::{GroupId, RegexError};
use crate::regcomp::compile;
use crate::regdef::{RegexOptions, Region, SearchOptions};
use crate::regexec::search;
use crate::regint::{NameTable, RegexType};
use crate::regsub::Template;

/// A compiled regular expression.
///
/// A `Regex` is immutable once built and can be shared across threads.
///
/// # Examples
///
/// ```
/// use ferrule::api::Regex;
///
/// let re = Regex::new(r"\d+").unwrap();
/// assert!(re.is_match("hello 42"));
///
/// let m = re.find("hello 42").unwrap();
/// assert_eq!(m.as_str(), "42");
/// assert_eq!(m.start(), 6);
/// assert_eq!(m.end(), 8);
/// ```
#[derive(Clone)]
pub struct Regex {
    inner: RegexType,
}

impl Regex {
    /// Compile a pattern with default options.
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        RegexBuilder::new(pattern).build()
    }

    /// Create a [`RegexBuilder`] for fine-grained control over compilation.
    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    /// The pattern this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.inner.pattern
    }

    /// The options the pattern was compiled with (not counting inline flags).
    pub fn options(&self) -> RegexOptions {
        self.inner.options
    }

    fn search_region(&self, text: &str, start: usize, options: SearchOptions) -> Option<Region> {
        if !text.is_char_boundary(start) {
            return None;
        }
        search(&self.inner, text.as_bytes(), start, options)
    }

    fn match_from<'t>(&self, text: &'t str, region: &Region) -> Option<Match<'t>> {
        let (start, end) = region.pos(0)?;
        Some(Match { text, start, end })
    }

    fn captures_from<'t>(&self, text: &'t str, region: Region) -> Captures<'t> {
        Captures {
            text,
            region,
            names: Arc::clone(&self.inner.name_table),
        }
    }

    /// Return the leftmost match in `text`, or `None` if no match.
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_at(text, 0)
    }

    /// Return the leftmost match starting at or after byte offset `start`.
    ///
    /// Anchors still see the whole of `text`, so `^` does not match at
    /// `start` unless `start` is 0. Returns `None` if `start` is not on a
    /// char boundary.
    pub fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<Match<'t>> {
        let region = self.search_region(text, start, SearchOptions::empty())?;
        self.match_from(text, &region)
    }

    /// Check whether `text` matches the pattern anywhere.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Match only at the beginning of `text`.
    pub fn match_start<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        let region = self.search_region(text, 0, SearchOptions::ANCHORED)?;
        Some(self.captures_from(text, region))
    }

    /// Match only if the whole of `text` matches.
    pub fn full_match<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        let region = self.search_region(
            text,
            0,
            SearchOptions::ANCHORED | SearchOptions::MATCH_WHOLE_STRING,
        )?;
        Some(self.captures_from(text, region))
    }

    /// Return the leftmost match with all capture groups, or `None`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        let region = self.search_region(text, 0, SearchOptions::empty())?;
        Some(self.captures_from(text, region))
    }

    /// Iterate over all non-overlapping matches in `text`.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindIter<'r, 't> {
        FindIter {
            regex: self,
            text,
            searcher: Searcher::default(),
        }
    }

    /// Iterate over the capture groups of all non-overlapping matches.
    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches {
            regex: self,
            text,
            searcher: Searcher::default(),
        }
    }

    /// Replace every match with the expansion of `template`.
    ///
    /// ```
    /// use ferrule::api::Regex;
    ///
    /// let re = Regex::new(r"([\w.-]+)@([\w.-]+)").unwrap();
    /// let out = re
    ///     .replace_all("alice@google.com, bob@abc.com", r"\1@example.com")
    ///     .unwrap();
    /// assert_eq!(out, "alice@example.com, bob@example.com");
    /// ```
    pub fn replace_all(&self, text: &str, template: &str) -> Result<String, RegexError> {
        self.replacen(text, 0, template)
    }

    /// Replace at most `limit` matches with the expansion of `template`.
    /// A `limit` of 0 replaces every match.
    pub fn replacen(&self, text: &str, limit: usize, template: &str) -> Result<String, RegexError> {
        let template = Template::parse(template, &self.inner)?;
        Ok(self.replace_impl(text, limit, |caps, dst| {
            template.expand(caps.text, &caps.region, dst)
        }))
    }

    /// Replace every match with the string `rep` returns for it.
    pub fn replace_all_with<F>(&self, text: &str, mut rep: F) -> String
    where
        F: FnMut(&Captures<'_>) -> String,
    {
        self.replace_impl(text, 0, |caps, dst| dst.push_str(&rep(caps)))
    }

    fn replace_impl<'t, F>(&self, text: &'t str, limit: usize, mut rep: F) -> String
    where
        F: FnMut(&Captures<'t>, &mut String),
    {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (n, caps) in self.captures_iter(text).enumerate() {
            if limit != 0 && n >= limit {
                break;
            }
            let Some((start, end)) = caps.region.pos(0) else {
                break;
            };
            out.push_str(&text[last..start]);
            rep(&caps, &mut out);
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }

    /// Return the number of capture groups in the pattern (excluding group 0).
    pub fn captures_len(&self) -> usize {
        self.inner.num_mem
    }

    /// Group names by group number. Slot 0 (the whole match) and unnamed
    /// groups are `None`.
    pub fn group_names(&self) -> Vec<Option<&str>> {
        (0..=self.inner.num_mem)
            .map(|i| self.inner.name_table.name_of(i))
            .collect()
    }

    /// Number of the group called `name`.
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.inner.name_table.lookup(name)
    }

    /// Access the underlying compiled program.
    pub fn as_raw(&self) -> &RegexType {
        &self.inner
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.inner.pattern).finish()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.pattern)
    }
}

impl std::str::FromStr for Regex {
    type Err = RegexError;

    fn from_str(pattern: &str) -> Result<Regex, RegexError> {
        Regex::new(pattern)
    }
}

// === RegexBuilder ===

/// Builder for compiling a [`Regex`] with custom options.
///
/// # Examples
///
/// ```
/// use ferrule::api::Regex;
///
/// let re = Regex::builder(r"hello world")
///     .case_insensitive(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match("Hello World"));
/// ```
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    options: RegexOptions,
}

impl RegexBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        RegexBuilder {
            pattern: pattern.to_string(),
            options: RegexOptions::empty(),
        }
    }

    fn flag(mut self, flag: RegexOptions, yes: bool) -> Self {
        self.options.set(flag, yes);
        self
    }

    /// Letters match regardless of case (`re.IGNORECASE`).
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.flag(RegexOptions::IGNORECASE, yes)
    }

    /// `.` also matches `\n` (`re.DOTALL`).
    pub fn dot_matches_newline(self, yes: bool) -> Self {
        self.flag(RegexOptions::DOTALL, yes)
    }

    /// `^` and `$` match at every line boundary (`re.MULTILINE`).
    pub fn multi_line(self, yes: bool) -> Self {
        self.flag(RegexOptions::MULTILINE, yes)
    }

    /// Whitespace and `#` comments in the pattern are ignored (`re.VERBOSE`).
    pub fn extended(self, yes: bool) -> Self {
        self.flag(RegexOptions::EXTEND, yes)
    }

    /// Add option flags to the current set.
    pub fn option(mut self, flag: RegexOptions) -> Self {
        self.options |= flag;
        self
    }

    /// Replace the whole option set.
    pub fn options(mut self, options: RegexOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile the pattern into a [`Regex`].
    pub fn build(&self) -> Result<Regex, RegexError> {
        let inner = compile(&self.pattern, self.options)?;
        Ok(Regex { inner })
    }
}

// === Match ===

/// A single match result referencing the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    /// Byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Byte range of the match.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched text.
    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    /// Returns the length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the match is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<'t> From<Match<'t>> for &'t str {
    fn from(m: Match<'t>) -> &'t str {
        m.as_str()
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match. Groups 1..N correspond to `(...)` in the
/// pattern, numbered by their opening parenthesis.
#[derive(Clone)]
pub struct Captures<'t> {
    text: &'t str,
    region: Region,
    names: Arc<NameTable>,
}

impl<'t> Captures<'t> {
    /// Get capture group `i`, or `None` if the group did not participate
    /// or does not exist.
    ///
    /// A group set inside a look-around may lie partly or wholly outside
    /// the span of group 0: `(?<=(a))b` on `"ab"` matches `1..2` with
    /// group 1 at `0..1`.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        let (start, end) = self.region.pos(i)?;
        Some(Match {
            text: self.text,
            start,
            end,
        })
    }

    /// Get the group called `name`, or `None`.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        self.get(self.names.lookup(name)?)
    }

    /// Text of group `i`; `Ok(None)` if it did not participate.
    pub fn group(&self, i: usize) -> Result<Option<&'t str>, RegexError> {
        if i >= self.len() {
            return Err(RegexError::GroupNotFound(GroupId::Index(i)));
        }
        Ok(self.get(i).map(|m| m.as_str()))
    }

    /// Text of the group called `name`; `Ok(None)` if it did not participate.
    pub fn group_by_name(&self, name: &str) -> Result<Option<&'t str>, RegexError> {
        let num = self
            .names
            .lookup(name)
            .ok_or_else(|| RegexError::GroupNotFound(GroupId::Name(name.to_string())))?;
        Ok(self.get(num).map(|m| m.as_str()))
    }

    /// Text of groups 1..N in order.
    pub fn groups(&self) -> Vec<Option<&'t str>> {
        (1..self.len())
            .map(|i| self.get(i).map(|m| m.as_str()))
            .collect()
    }

    /// Expand `template` against this match and append it to `dst`.
    pub fn expand(&self, template: &str, dst: &mut String) -> Result<(), RegexError> {
        let template = Template::parse_with(template, self.len() - 1, &self.names)?;
        template.expand(self.text, &self.region, dst);
        Ok(())
    }

    /// Number of capture groups (including group 0).
    pub fn len(&self) -> usize {
        self.region.num_regs
    }

    /// Returns `true` if there are no capture groups (never the case for a
    /// real match).
    pub fn is_empty(&self) -> bool {
        self.region.num_regs == 0
    }

    /// Iterate over all capture groups.
    pub fn iter(&self) -> CapturesIter<'_, 't> {
        CapturesIter {
            captures: self,
            index: 0,
        }
    }
}

impl fmt::Debug for Captures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.len() {
            list.entry(&self.get(i).map(|m| m.as_str()));
        }
        list.finish()
    }
}

// === CapturesIter ===

/// Iterator over capture groups in a [`Captures`].
pub struct CapturesIter<'c, 't> {
    captures: &'c Captures<'t>,
    index: usize,
}

impl<'c, 't> Iterator for CapturesIter<'c, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CapturesIter<'_, '_> {}

// === Searcher ===

// Position of an iteration over successive matches. After an empty match
// the next search starts at the same offset but may not match empty there.
#[derive(Clone, Copy, Debug, Default)]
struct Searcher {
    last_end: usize,
    last_empty: bool,
    done: bool,
}

impl Searcher {
    fn next_region(&mut self, reg: &RegexType, text: &str) -> Option<Region> {
        if self.done {
            return None;
        }
        let options = if self.last_empty {
            SearchOptions::NOT_EMPTY_AT_START
        } else {
            SearchOptions::empty()
        };
        let Some((region, start, end)) = search(reg, text.as_bytes(), self.last_end, options)
            .and_then(|r| r.pos(0).map(|(s, e)| (r, s, e)))
        else {
            self.done = true;
            return None;
        };
        self.last_empty = start == end;
        self.last_end = end;
        Some(region)
    }
}

// === FindIter ===

/// Iterator over all non-overlapping matches in a text.
pub struct FindIter<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    searcher: Searcher,
}

impl<'r, 't> FindIter<'r, 't> {
    /// Start over from the beginning of the text.
    pub fn restart(&mut self) {
        self.searcher = Searcher::default();
    }
}

impl<'r, 't> Iterator for FindIter<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        let region = self.searcher.next_region(&self.regex.inner, self.text)?;
        self.regex.match_from(self.text, &region)
    }
}

impl FusedIterator for FindIter<'_, '_> {}

// === CaptureMatches ===

/// Iterator over the [`Captures`] of all non-overlapping matches.
pub struct CaptureMatches<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    searcher: Searcher,
}

impl<'r, 't> CaptureMatches<'r, 't> {
    /// Start over from the beginning of the text.
    pub fn restart(&mut self) {
        self.searcher = Searcher::default();
    }
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Captures<'t>> {
        let region = self.searcher.next_region(&self.regex.inner, self.text)?;
        Some(self.regex.captures_from(self.text, region))
    }
}

impl FusedIterator for CaptureMatches<'_, '_> {}

// === One-shot functions ===

/// Compile `pattern` and return its leftmost match in `subject`.
///
/// ```
/// use ferrule::api::find_first;
///
/// let m = find_first(r"a+", "aaab").unwrap().unwrap();
/// assert_eq!(m.as_str(), "aaa");
/// assert!(find_first("zzz", "abc").unwrap().is_none());
/// ```
pub fn find_first<'t>(pattern: &str, subject: &'t str) -> Result<Option<Match<'t>>, RegexError> {
    Ok(Regex::new(pattern)?.find(subject))
}

/// Compile `pattern` and lazily enumerate its matches in `subject`.
///
/// ```
/// use ferrule::api::find_all;
///
/// let tags: Vec<&str> = find_all(r"<.*?>", "<b>x</b>")
///     .unwrap()
///     .map(|m| m.as_str())
///     .collect();
/// assert_eq!(tags, ["<b>", "</b>"]);
/// ```
pub fn find_all<'t>(pattern: &str, subject: &'t str) -> Result<FindAll<'t>, RegexError> {
    Ok(FindAll {
        regex: Regex::new(pattern)?,
        text: subject,
        searcher: Searcher::default(),
    })
}

/// Compile `pattern` and replace every match in `subject` with the
/// expansion of `template`.
pub fn substitute(pattern: &str, subject: &str, template: &str) -> Result<String, RegexError> {
    Regex::new(pattern)?.replace_all(subject, template)
}

/// Owning iterator returned by [`find_all`]. Cloning it, or calling
/// [`FindAll::restart`], replays the sequence from the beginning.
#[derive(Clone, Debug)]
pub struct FindAll<'t> {
    regex: Regex,
    text: &'t str,
    searcher: Searcher,
}

impl<'t> FindAll<'t> {
    /// Start over from the beginning of the text.
    pub fn restart(&mut self) {
        self.searcher = Searcher::default();
    }

    /// The compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl<'t> Iterator for FindAll<'t> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        let region = self.searcher.next_region(&self.regex.inner, self.text)?;
        self.regex.match_from(self.text, &region)
    }
}

impl FusedIterator for FindAll<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_new_and_find() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find("hello 42 world").unwrap();
        assert_eq!(m.as_str(), "42");
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 8);
        assert_eq!(m.range(), 6..8);
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn regex_no_match() {
        let re = Regex::new(r"\d+").unwrap();
        assert!(re.find("no digits here").is_none());
    }

    #[test]
    fn regex_is_match() {
        let re = Regex::new(r"hello").unwrap();
        assert!(re.is_match("say hello"));
        assert!(!re.is_match("say goodbye"));
    }

    #[test]
    fn regex_find_at() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find_at("12 34", 1).unwrap();
        assert_eq!(m.range(), 1..2);
        assert_eq!(re.find_at("12 34", 2).unwrap().as_str(), "34");
        assert!(re.find_at("12 34", 6).is_none());
        assert!(re.find_at("é1", 1).is_none());
    }

    #[test]
    fn regex_captures() {
        let re = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
        let caps = re.captures("date: 2026-02-14").unwrap();
        assert_eq!(caps.get(0).unwrap().as_str(), "2026-02-14");
        assert_eq!(caps.get(1).unwrap().as_str(), "2026");
        assert_eq!(caps.get(2).unwrap().as_str(), "02");
        assert_eq!(caps.get(3).unwrap().as_str(), "14");
        assert!(caps.get(4).is_none());
        assert_eq!(caps.len(), 4);
        assert_eq!(caps.groups(), vec![Some("2026"), Some("02"), Some("14")]);
    }

    #[test]
    fn regex_captures_len() {
        let re = Regex::new(r"(a)(b)(c)").unwrap();
        assert_eq!(re.captures_len(), 3);
        assert_eq!(re.as_str(), "(a)(b)(c)");
    }

    #[test]
    fn regex_find_iter() {
        let re = Regex::new(r"\d+").unwrap();
        let matches: Vec<&str> = re.find_iter("1 + 22 = 333").map(|m| m.as_str()).collect();
        assert_eq!(matches, vec!["1", "22", "333"]);
    }

    #[test]
    fn regex_builder_case_insensitive() {
        let re = Regex::builder(r"hello")
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(re.is_match("HELLO"));
        assert!(re.is_match("Hello"));
        assert_eq!(re.options(), RegexOptions::IGNORECASE);
    }

    #[test]
    fn regex_builder_toggles_flags() {
        let builder = Regex::builder("a.b")
            .dot_matches_newline(true)
            .multi_line(true)
            .multi_line(false);
        let re = builder.build().unwrap();
        assert_eq!(re.options(), RegexOptions::DOTALL);
        assert!(re.is_match("a\nb"));
    }

    #[test]
    fn regex_invalid_pattern() {
        let err = Regex::new(r"(unclosed").unwrap_err();
        assert!(matches!(err, RegexError::Syntax { .. }));
    }

    #[test]
    fn captures_iter() {
        let re = Regex::new(r"(a)(b)?").unwrap();
        let caps = re.captures("a").unwrap();
        let items: Vec<_> = caps.iter().collect();
        // group 0 = "a", group 1 = "a", group 2 = None (didn't participate)
        assert_eq!(items.len(), 3);
        assert!(items[0].is_some());
        assert!(items[1].is_some());
        assert!(items[2].is_none());
        assert_eq!(format!("{:?}", caps), r#"[Some("a"), Some("a"), None]"#);
    }

    #[test]
    fn named_captures() {
        let re = Regex::new(r"(?P<year>\d{4})-(?<month>\d{2})").unwrap();
        let caps = re.captures("2026-02").unwrap();
        assert_eq!(caps.name("year").unwrap().as_str(), "2026");
        assert_eq!(caps.name("month").unwrap().as_str(), "02");
        assert!(caps.name("day").is_none());
        assert_eq!(re.group_index("month"), Some(2));
        assert_eq!(re.group_names(), vec![None, Some("year"), Some("month")]);
    }

    #[test]
    fn group_access_errors() {
        let re = Regex::new(r"(?P<a>x)(y)?").unwrap();
        let caps = re.captures("x").unwrap();
        assert_eq!(caps.group(1).unwrap(), Some("x"));
        assert_eq!(caps.group(2).unwrap(), None);
        assert_eq!(
            caps.group(3),
            Err(RegexError::GroupNotFound(GroupId::Index(3)))
        );
        assert_eq!(caps.group_by_name("a").unwrap(), Some("x"));
        assert_eq!(
            caps.group_by_name("b"),
            Err(RegexError::GroupNotFound(GroupId::Name("b".to_string())))
        );
    }

    #[test]
    fn empty_match_find_iter() {
        let re = Regex::new(r"").unwrap();
        let matches: Vec<_> = re.find_iter("ab").collect();
        // Should yield empty matches at positions 0, 1, 2
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].start(), 0);
        assert_eq!(matches[1].start(), 1);
        assert_eq!(matches[2].start(), 2);
    }

    #[test]
    fn empty_match_after_nonempty() {
        let re = Regex::new(r"x*").unwrap();
        let ranges: Vec<_> = re.find_iter("abxd").map(|m| m.range()).collect();
        assert_eq!(ranges, vec![0..0, 1..1, 2..3, 3..3, 4..4]);
        assert_eq!(re.replace_all("abxd", "-").unwrap(), "-a-b--d-");
    }

    #[test]
    fn find_iter_restart_and_fuse() {
        let re = Regex::new(r"\w+").unwrap();
        let mut it = re.find_iter("one two");
        assert_eq!(it.next().unwrap().as_str(), "one");
        assert_eq!(it.next().unwrap().as_str(), "two");
        assert!(it.next().is_none());
        assert!(it.next().is_none());
        it.restart();
        assert_eq!(it.next().unwrap().as_str(), "one");
    }

    #[test]
    fn match_start_and_full_match() {
        let re = Regex::new(r"\d+").unwrap();
        assert!(re.match_start("x12").is_none());
        assert_eq!(re.match_start("12x").unwrap().get(0).unwrap().as_str(), "12");
        assert!(re.full_match("12x").is_none());
        assert!(re.full_match("123").is_some());
    }

    #[test]
    fn replace_variants() {
        let re = Regex::new(r"(\w+)=(\w+)").unwrap();
        assert_eq!(re.replacen("a=1 b=2", 1, r"\2=\1").unwrap(), "1=a b=2");
        assert_eq!(re.replace_all("a=1 b=2", r"\g<2>").unwrap(), "1 2");
        let out = re.replace_all_with("a=1 b=2", |caps| caps.get(1).unwrap().as_str().to_uppercase());
        assert_eq!(out, "A B");
        assert!(matches!(
            re.replace_all("nothing here", r"\3"),
            Err(RegexError::InvalidGroupReference { .. })
        ));
    }

    #[test]
    fn captures_expand() {
        let re = Regex::new(r"(?P<k>\w+):(\w+)").unwrap();
        let caps = re.captures("key:value").unwrap();
        let mut dst = String::from(">");
        caps.expand(r"\2 \g<k>", &mut dst).unwrap();
        assert_eq!(dst, ">value key");
        assert!(caps.expand(r"\9", &mut dst).is_err());
    }

    #[test]
    fn one_shot_functions() {
        assert_eq!(find_first("a+", "aaab").unwrap().unwrap().as_str(), "aaa");
        assert!(find_first("zzz", "abc").unwrap().is_none());
        assert!(find_first("(", "abc").is_err());

        let mut all = find_all(r"<.*?>", "<b>x</b>").unwrap();
        let replay = all.clone();
        let tags: Vec<&str> = all.by_ref().map(|m| m.as_str()).collect();
        assert_eq!(tags, vec!["<b>", "</b>"]);
        assert_eq!(replay.count(), 2);
        all.restart();
        assert_eq!(all.next().unwrap().as_str(), "<b>");

        assert_eq!(
            substitute(r"([\w.-]+)@([\w.-]+)", "alice@google.com, bob@abc.com", r"\1@example.com")
                .unwrap(),
            "alice@example.com, bob@example.com"
        );
    }

    #[test]
    fn regex_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Regex>();
    }
}
