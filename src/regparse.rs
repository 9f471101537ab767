// regparse.rs - Parser: converts pattern text into an AST (Node tree).
//
// Structure: number scanning → escape parsing → tokenizer → character
// classes → groups and options → expressions, branches, alternatives.
// Positions are char indices into the pattern.

use crate::regdef::*;
use crate::regenc::CType;
use crate::regint::*;
use crate::regparse_types::*;

// ============================================================================
// Number scanning
// ============================================================================

/// Decimal number at `p`, or `None` if no digit follows.
fn scan_number(p: &mut usize, pattern: &[char], maxval: i32) -> Result<Option<i32>, i32> {
    let mut num: Option<i32> = None;
    while let Some(&c) = pattern.get(*p) {
        if !c.is_ascii_digit() {
            break;
        }
        let val = digitval(c) as i32;
        let n = num.unwrap_or(0);
        if (maxval - val) / 10 < n {
            return Err(ERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE);
        }
        num = Some(n * 10 + val);
        *p += 1;
    }
    Ok(num)
}

/// Exactly `len` hex digits.
fn scan_hexadecimal_number(p: &mut usize, pattern: &[char], len: usize) -> Result<u32, i32> {
    let mut code: u32 = 0;
    for _ in 0..len {
        let Some(val) = pattern.get(*p).and_then(|c| c.to_digit(16)) else {
            return Err(ERR_INVALID_CODE_POINT_VALUE);
        };
        code = (code << 4) | val;
        *p += 1;
    }
    Ok(code)
}

/// Up to `maxlen` octal digits.
fn scan_octal_number(p: &mut usize, pattern: &[char], maxlen: usize) -> u32 {
    let mut code: u32 = 0;
    for _ in 0..maxlen {
        match pattern.get(*p) {
            Some(&c) if is_code_octal(c) => {
                code = code * 8 + digitval(c);
                *p += 1;
            }
            _ => break,
        }
    }
    code
}

fn code_to_char(code: u32) -> Result<char, i32> {
    char::from_u32(code).ok_or(ERR_INVALID_CODE_POINT_VALUE)
}

// ============================================================================
// Escapes
// ============================================================================

fn escape_ctype(c: char) -> Option<(CType, bool)> {
    match c {
        'w' => Some((CType::Word, false)),
        'W' => Some((CType::Word, true)),
        'd' => Some((CType::Digit, false)),
        'D' => Some((CType::Digit, true)),
        's' => Some((CType::Space, false)),
        'S' => Some((CType::Space, true)),
        _ => None,
    }
}

/// `\ooo`: a leading octal digit followed by two more.
fn is_octal3(c: char, p: usize, pattern: &[char]) -> bool {
    is_code_octal(c)
        && pattern.get(p).map_or(false, |&c| is_code_octal(c))
        && pattern.get(p + 1).map_or(false, |&c| is_code_octal(c))
}

fn fetch_octal3(c: char, p: &mut usize, pattern: &[char]) -> Result<char, i32> {
    let code = digitval(c) * 64 + scan_octal_number(p, pattern, 2);
    if code > 0o377 {
        return Err(ERR_INVALID_CODE_POINT_VALUE);
    }
    code_to_char(code)
}

/// Value of a character escape whose letter `c` was just consumed.
fn fetch_escaped_value(
    c: char,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<char, i32> {
    let code = match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\x0c',
        'v' => '\x0b',
        'a' => '\x07',
        '0' => return code_to_char(scan_octal_number(p, pattern, 2)),
        'x' => return code_to_char(scan_hexadecimal_number(p, pattern, 2)?),
        'u' => return code_to_char(scan_hexadecimal_number(p, pattern, 4)?),
        'U' => return code_to_char(scan_hexadecimal_number(p, pattern, 8)?),
        c if c.is_ascii_alphanumeric() => {
            env.error_param = Some(format!("\\{}", c));
            return Err(ERR_INVALID_ESCAPE);
        }
        c => c,
    };
    Ok(code)
}

fn fetch_escape_token(p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<TokenType, i32> {
    let Some(&c) = pattern.get(*p) else {
        return Err(ERR_END_PATTERN_AT_ESCAPE);
    };
    *p += 1;

    if let Some((ctype, not)) = escape_ctype(c) {
        return Ok(TokenType::CharType { ctype, not });
    }
    let token = match c {
        'b' => TokenType::Anchor(AnchorType::WordBoundary),
        'B' => TokenType::Anchor(AnchorType::NoWordBoundary),
        'A' => TokenType::Anchor(AnchorType::BeginBuf),
        'Z' => TokenType::Anchor(AnchorType::EndBuf),
        '1'..='9' => {
            if is_octal3(c, *p, pattern) {
                TokenType::Char(fetch_octal3(c, p, pattern)?)
            } else {
                let mut num = digitval(c) as usize;
                if let Some(&d) = pattern.get(*p) {
                    if d.is_ascii_digit() {
                        num = num * 10 + digitval(d) as usize;
                        *p += 1;
                    }
                }
                TokenType::BackRef(num)
            }
        }
        _ => TokenType::Char(fetch_escaped_value(c, p, pattern, env)?),
    };
    Ok(token)
}

// ============================================================================
// Tokenizer
// ============================================================================

/// A `?` after a quantifier makes it lazy.
fn greedy_check(p: &mut usize, pattern: &[char]) -> bool {
    if pattern.get(*p) == Some(&'?') {
        *p += 1;
        false
    } else {
        true
    }
}

fn repeat_token(lower: i32, upper: i32, p: &mut usize, pattern: &[char]) -> TokenType {
    TokenType::Repeat {
        lower,
        upper,
        greedy: greedy_check(p, pattern),
    }
}

/// Interval body after `{`. `Ok(None)` means the brace is a literal and
/// `p` is left untouched.
fn fetch_interval(p: &mut usize, pattern: &[char]) -> Result<Option<(i32, i32)>, i32> {
    let mut q = *p;
    let low = scan_number(&mut q, pattern, MAX_REPEAT_NUM)?;
    let (lower, upper) = match pattern.get(q) {
        Some('}') => match low {
            Some(n) => (n, n),
            None => return Ok(None),
        },
        Some(',') => {
            q += 1;
            let up = scan_number(&mut q, pattern, MAX_REPEAT_NUM)?;
            if pattern.get(q) != Some(&'}') {
                return Ok(None);
            }
            (low.unwrap_or(0), up.unwrap_or(INFINITE_REPEAT))
        }
        _ => return Ok(None),
    };
    if !is_infinite_repeat(upper) && lower > upper {
        *p = q;
        return Err(ERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE);
    }
    *p = q + 1;
    Ok(Some((lower, upper)))
}

fn fetch_token(tok: &mut PToken, p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<(), i32> {
    loop {
        tok.backp = *p;
        let Some(&c) = pattern.get(*p) else {
            tok.token_type = TokenType::Eot;
            return Ok(());
        };
        *p += 1;

        if opton_extend(env.options) {
            if c.is_whitespace() {
                continue;
            }
            if c == '#' {
                while let Some(&c) = pattern.get(*p) {
                    *p += 1;
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
        }

        tok.token_type = match c {
            '\\' => fetch_escape_token(p, pattern, env)?,
            '.' => TokenType::AnyChar,
            '*' => repeat_token(0, INFINITE_REPEAT, p, pattern),
            '+' => repeat_token(1, INFINITE_REPEAT, p, pattern),
            '?' => repeat_token(0, 1, p, pattern),
            '{' => match fetch_interval(p, pattern)? {
                Some((lower, upper)) => repeat_token(lower, upper, p, pattern),
                None => TokenType::Char('{'),
            },
            '|' => TokenType::Alt,
            '(' => TokenType::SubexpOpen,
            ')' => TokenType::SubexpClose,
            '[' => TokenType::CcOpen,
            '^' => TokenType::Anchor(if opton_multiline(env.options) {
                AnchorType::BeginLine
            } else {
                AnchorType::BeginBuf
            }),
            '$' => TokenType::Anchor(if opton_multiline(env.options) {
                AnchorType::EndLine
            } else {
                AnchorType::SemiEndBuf
            }),
            c => TokenType::Char(c),
        };
        return Ok(());
    }
}

// ============================================================================
// Character classes
// ============================================================================

fn fetch_token_cc(
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
    first: bool,
) -> Result<CcTokenType, i32> {
    let Some(&c) = pattern.get(*p) else {
        return Err(ERR_PREMATURE_END_OF_CHAR_CLASS);
    };
    *p += 1;

    match c {
        ']' if !first => Ok(CcTokenType::Close),
        '\\' => {
            let Some(&e) = pattern.get(*p) else {
                return Err(ERR_END_PATTERN_AT_ESCAPE);
            };
            *p += 1;
            if let Some((ctype, not)) = escape_ctype(e) {
                return Ok(CcTokenType::CharType { ctype, not });
            }
            let code = match e {
                'b' => '\x08',
                '1'..='7' => {
                    *p -= 1;
                    let code = scan_octal_number(p, pattern, 3);
                    if code > 0o377 {
                        return Err(ERR_INVALID_CODE_POINT_VALUE);
                    }
                    code_to_char(code)?
                }
                _ => fetch_escaped_value(e, p, pattern, env)?,
            };
            Ok(CcTokenType::Char(code))
        }
        c => Ok(CcTokenType::Char(c)),
    }
}

/// Character class body after `[`.
fn prs_cc(p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<Node, i32> {
    let mut cc = CClassNode::new(opton_ignorecase(env.options));
    if pattern.get(*p) == Some(&'^') {
        cc.not = true;
        *p += 1;
    }

    let mut first = true;
    loop {
        let item = fetch_token_cc(p, pattern, env, first)?;
        first = false;
        let range_follows = pattern.get(*p) == Some(&'-')
            && pattern.get(*p + 1).map_or(false, |&c| c != ']');

        match item {
            CcTokenType::Close => break,
            CcTokenType::CharType { ctype, not } => {
                if range_follows {
                    return Err(ERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE);
                }
                cc.add_ctype(ctype, not);
            }
            CcTokenType::Char(from) => {
                if !range_follows {
                    cc.add_code(from);
                    continue;
                }
                *p += 1;
                match fetch_token_cc(p, pattern, env, false)? {
                    CcTokenType::Char(to) => {
                        if to < from {
                            return Err(ERR_EMPTY_RANGE_IN_CHAR_CLASS);
                        }
                        cc.add_range(from, to);
                    }
                    CcTokenType::CharType { .. } => {
                        return Err(ERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE)
                    }
                    CcTokenType::Close => return Err(ERR_PARSER_BUG),
                }
            }
        }
    }
    Ok(Node::CClass(cc))
}

// ============================================================================
// Groups
// ============================================================================

enum GroupResult {
    Node(Node),
    /// Option setting or comment: nothing a quantifier could apply to.
    Nothing,
}

/// Parse up to the closing `)`, restoring options set inside the group.
fn prs_group_body(
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let prev = env.options;
    fetch_token(tok, p, pattern, env)?;
    let body = prs_alts(tok, true, p, pattern, env);
    env.options = prev;
    body
}

fn open_capture(env: &mut ParseEnv) -> Result<usize, i32> {
    if env.num_mem >= MAX_CAPTURE_NUM {
        return Err(ERR_TOO_MANY_CAPTURES);
    }
    env.num_mem += 1;
    env.mem_closed.push(false);
    Ok(env.num_mem)
}

fn prs_capture(
    regnum: usize,
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let body = prs_group_body(tok, p, pattern, env)?;
    env.mem_closed[regnum] = true;
    Ok(Node::Bag(BagNode {
        regnum,
        body: Box::new(body),
    }))
}

fn check_group_name(name: String, env: &mut ParseEnv) -> Result<String, i32> {
    let mut chars = name.chars();
    let valid_head = chars.next().map_or(false, |c| c == '_' || c.is_alphabetic());
    let code = if !valid_head {
        Some(ERR_INVALID_GROUP_NAME)
    } else if !chars.all(crate::regenc::is_word_char) {
        Some(ERR_INVALID_CHAR_IN_GROUP_NAME)
    } else {
        None
    };
    match code {
        Some(code) => {
            env.error_param = Some(name);
            Err(code)
        }
        None => Ok(name),
    }
}

/// Group name up to `end_code`, which is consumed.
fn fetch_name(p: &mut usize, pattern: &[char], end_code: char, env: &mut ParseEnv) -> Result<String, i32> {
    let start = *p;
    while let Some(&c) = pattern.get(*p) {
        *p += 1;
        if c == end_code {
            let name: String = pattern[start..*p - 1].iter().collect();
            if name.is_empty() {
                return Err(ERR_EMPTY_GROUP_NAME);
            }
            return check_group_name(name, env);
        }
    }
    env.error_param = Some(pattern[start..].iter().collect());
    Err(ERR_INVALID_GROUP_NAME)
}

fn prs_named_group(
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let name = fetch_name(p, pattern, '>', env)?;
    let regnum = open_capture(env)?;
    if let Err(code) = env.name_table.add(&name, regnum) {
        env.error_param = Some(name);
        return Err(code);
    }
    prs_capture(regnum, tok, p, pattern, env)
}

fn prs_named_backref(p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<Node, i32> {
    let name = fetch_name(p, pattern, ')', env)?;
    match env.name_table.lookup(&name) {
        Some(regnum) => new_backref(regnum, env),
        None => {
            env.error_param = Some(name);
            Err(ERR_UNDEFINED_NAME_REFERENCE)
        }
    }
}

fn prs_look_around(
    anchor_type: AnchorType,
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let body = prs_group_body(tok, p, pattern, env)?;
    let mut an = AnchorNode::new(anchor_type);
    if matches!(anchor_type, AnchorType::LookBehind | AnchorType::LookBehindNot) {
        an.char_len = body.char_len().ok_or(ERR_INVALID_LOOK_BEHIND_PATTERN)?;
    }
    an.body = Some(Box::new(body));
    Ok(Node::Anchor(an))
}

fn invalid_flags(open: usize, p: usize, pattern: &[char], env: &mut ParseEnv) -> i32 {
    env.error_param = Some(pattern[open..p].iter().collect());
    ERR_INVALID_INLINE_FLAGS
}

/// `(?imsx)` or `(?imsx-imsx:...)`; `p` is at the first flag letter.
///
/// A group without `:` sets global flags, so it is only accepted before
/// anything else in the pattern and may not turn flags off.
fn prs_options(
    at_start: bool,
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<GroupResult, i32> {
    let open = *p - 2;
    let mut on = RegexOptions::empty();
    let mut off = RegexOptions::empty();
    let mut neg = false;
    loop {
        let Some(&c) = pattern.get(*p) else {
            return Err(ERR_END_PATTERN_IN_GROUP);
        };
        *p += 1;
        match c {
            '-' if !neg => neg = true,
            ')' => {
                if neg {
                    return Err(invalid_flags(open, *p, pattern, env));
                }
                if !at_start {
                    return Err(ERR_GLOBAL_FLAGS_NOT_AT_START);
                }
                env.options |= on;
                env.at_pattern_start = true;
                return Ok(GroupResult::Nothing);
            }
            ':' => {
                if (neg && off.is_empty()) || on.intersects(off) {
                    return Err(invalid_flags(open, *p, pattern, env));
                }
                let prev = env.options;
                env.options = (prev | on).difference(off);
                let body = prs_group_body(tok, p, pattern, env);
                env.options = prev;
                return body.map(GroupResult::Node);
            }
            c => match RegexOptions::from_flag_char(c) {
                Some(flag) if neg => off.insert(flag),
                Some(flag) => on.insert(flag),
                None => return Err(ERR_UNDEFINED_GROUP_OPTION),
            },
        }
    }
}

/// Everything after an opening `(`.
fn prs_bag(tok: &mut PToken, p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<GroupResult, i32> {
    let at_start = std::mem::replace(&mut env.at_pattern_start, false);
    if pattern.get(*p) != Some(&'?') {
        let regnum = open_capture(env)?;
        return prs_capture(regnum, tok, p, pattern, env).map(GroupResult::Node);
    }
    *p += 1;

    let Some(&c) = pattern.get(*p) else {
        return Err(ERR_END_PATTERN_IN_GROUP);
    };
    *p += 1;

    let node = match c {
        ':' => prs_group_body(tok, p, pattern, env)?,
        '=' => prs_look_around(AnchorType::PrecRead, tok, p, pattern, env)?,
        '!' => prs_look_around(AnchorType::PrecReadNot, tok, p, pattern, env)?,
        '<' => match pattern.get(*p) {
            Some('=') => {
                *p += 1;
                prs_look_around(AnchorType::LookBehind, tok, p, pattern, env)?
            }
            Some('!') => {
                *p += 1;
                prs_look_around(AnchorType::LookBehindNot, tok, p, pattern, env)?
            }
            _ => prs_named_group(tok, p, pattern, env)?,
        },
        'P' => {
            let Some(&k) = pattern.get(*p) else {
                return Err(ERR_END_PATTERN_IN_GROUP);
            };
            *p += 1;
            match k {
                '<' => prs_named_group(tok, p, pattern, env)?,
                '=' => prs_named_backref(p, pattern, env)?,
                _ => return Err(ERR_UNDEFINED_GROUP_OPTION),
            }
        }
        '#' => {
            while let Some(&c) = pattern.get(*p) {
                *p += 1;
                if c == ')' {
                    env.at_pattern_start = at_start;
                    return Ok(GroupResult::Nothing);
                }
            }
            return Err(ERR_END_PATTERN_IN_GROUP);
        }
        '-' | 'i' | 'm' | 's' | 'x' => {
            *p -= 1;
            return prs_options(at_start, tok, p, pattern, env);
        }
        _ => return Err(ERR_UNDEFINED_GROUP_OPTION),
    };
    Ok(GroupResult::Node(node))
}

// ============================================================================
// Expressions
// ============================================================================

fn new_backref(regnum: usize, env: &mut ParseEnv) -> Result<Node, i32> {
    if regnum > env.num_mem || !env.is_mem_closed(regnum) {
        env.error_param = Some(regnum.to_string());
        return Err(ERR_INVALID_BACKREF);
    }
    Ok(Node::BackRef(BackRefNode {
        regnum,
        ignorecase: opton_ignorecase(env.options),
    }))
}

/// Apply the pending quantifier token, if any, to `target`.
fn check_quantifier(
    target: Node,
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let TokenType::Repeat { lower, upper, greedy } = tok.token_type else {
        return Ok(target);
    };
    if matches!(target, Node::Empty) {
        return Err(ERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
    }
    fetch_token(tok, p, pattern, env)?;
    if tok.is_repeat() {
        return Err(ERR_NESTED_REPEAT_OPERATOR);
    }
    Ok(Node::Quant(QuantNode {
        body: Box::new(target),
        lower,
        upper,
        greedy,
    }))
}

/// A run of literal characters. A quantifier after the run applies only
/// to its last character.
fn prs_string(
    first: char,
    tok: &mut PToken,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let ignorecase = opton_ignorecase(env.options);
    let mut s = String::new();
    s.push(first);
    let mut last_start = 0;
    loop {
        fetch_token(tok, p, pattern, env)?;
        match tok.token_type {
            TokenType::Char(c) => {
                last_start = s.len();
                s.push(c);
            }
            _ => break,
        }
    }

    if tok.is_repeat() && last_start > 0 {
        let last = s.split_off(last_start);
        let quant = check_quantifier(
            Node::String(StrNode { s: last, ignorecase }),
            tok,
            p,
            pattern,
            env,
        )?;
        return Ok(Node::List(vec![Node::String(StrNode { s, ignorecase }), quant]));
    }
    check_quantifier(Node::String(StrNode { s, ignorecase }), tok, p, pattern, env)
}

fn prs_exp(tok: &mut PToken, p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<Node, i32> {
    if tok.token_type != TokenType::SubexpOpen {
        env.at_pattern_start = false;
    }
    let node = match tok.token_type {
        TokenType::Eot | TokenType::Alt | TokenType::SubexpClose => return Ok(Node::Empty),
        TokenType::Char(c) => return prs_string(c, tok, p, pattern, env),
        TokenType::AnyChar => Node::AnyChar {
            multiline: opton_dotall(env.options),
        },
        TokenType::CharType { ctype, not } => Node::CType(CtypeNode { ctype, not }),
        TokenType::CcOpen => prs_cc(p, pattern, env)?,
        TokenType::Anchor(anchor_type) => {
            fetch_token(tok, p, pattern, env)?;
            if tok.is_repeat() {
                return Err(ERR_TARGET_OF_REPEAT_OPERATOR_INVALID);
            }
            return Ok(Node::Anchor(AnchorNode::new(anchor_type)));
        }
        TokenType::BackRef(regnum) => new_backref(regnum, env)?,
        TokenType::SubexpOpen => {
            env.parse_depth += 1;
            if env.parse_depth > env.parse_depth_limit {
                return Err(ERR_PARSE_DEPTH_LIMIT_OVER);
            }
            let r = prs_bag(tok, p, pattern, env)?;
            env.parse_depth -= 1;
            match r {
                GroupResult::Node(node) => node,
                GroupResult::Nothing => {
                    fetch_token(tok, p, pattern, env)?;
                    if tok.is_repeat() {
                        return Err(ERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
                    }
                    return Ok(Node::Empty);
                }
            }
        }
        TokenType::Repeat { .. } => return Err(ERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED),
    };
    fetch_token(tok, p, pattern, env)?;
    check_quantifier(node, tok, p, pattern, env)
}

fn prs_branch(tok: &mut PToken, p: &mut usize, pattern: &[char], env: &mut ParseEnv) -> Result<Node, i32> {
    let mut list = Vec::new();
    while !matches!(
        tok.token_type,
        TokenType::Eot | TokenType::Alt | TokenType::SubexpClose
    ) {
        match prs_exp(tok, p, pattern, env)? {
            Node::Empty => {}
            Node::List(items) => list.extend(items),
            node => list.push(node),
        }
    }
    Ok(match list.len() {
        0 => Node::Empty,
        1 => list.swap_remove(0),
        _ => Node::List(list),
    })
}

/// Alternatives up to the end of the pattern, or up to `)` when `in_group`.
fn prs_alts(
    tok: &mut PToken,
    in_group: bool,
    p: &mut usize,
    pattern: &[char],
    env: &mut ParseEnv,
) -> Result<Node, i32> {
    let mut alts = vec![prs_branch(tok, p, pattern, env)?];
    while tok.token_type == TokenType::Alt {
        env.at_pattern_start = false;
        fetch_token(tok, p, pattern, env)?;
        alts.push(prs_branch(tok, p, pattern, env)?);
    }

    match (tok.token_type, in_group) {
        (TokenType::SubexpClose, false) => return Err(ERR_UNMATCHED_CLOSE_PARENTHESIS),
        (TokenType::Eot, true) => return Err(ERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS),
        _ => {}
    }

    Ok(if alts.len() == 1 {
        alts.swap_remove(0)
    } else {
        Node::Alt(alts)
    })
}

/// Parse `pattern` into a tree. On error, `env.error_pos` holds the char
/// index where parsing stopped.
pub fn parse_tree(pattern: &str, env: &mut ParseEnv) -> Result<Node, i32> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut p = 0;
    let mut tok = PToken::new();
    let r = fetch_token(&mut tok, &mut p, &chars, env)
        .and_then(|_| prs_alts(&mut tok, false, &mut p, &chars, env));
    if r.is_err() {
        env.error_pos = p;
    }
    r
}
