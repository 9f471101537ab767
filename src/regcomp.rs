// regcomp.rs - Compiler: converts AST (Node trees) into bytecode (Operation arrays).
//
// Structure: operation management → string and class compilation →
// quantifier compilation → bag and anchor compilation → tree compilation →
// search optimization → entry point.

use std::sync::Arc;

use memchr::memmem;
use tracing::{debug, trace};

use crate::error::RegexError;
use crate::regdef::*;
use crate::regenc::case_fold;
use crate::regint::*;
use crate::regparse::parse_tree;
use crate::regparse_types::*;

// ============================================================================
// Operation management
// ============================================================================

fn add_op(reg: &mut RegexType, op: Operation) -> usize {
    reg.ops.push(op);
    reg.ops.len() - 1
}

fn ops_curr_offset(reg: &RegexType) -> usize {
    reg.ops.len()
}

fn rel_addr(from: usize, to: usize) -> RelAddrType {
    to as RelAddrType - from as RelAddrType
}

/// Point the jump held by the instruction at `at` to `to`.
fn patch_addr(reg: &mut RegexType, at: usize, to: usize) -> Result<(), i32> {
    let addr = rel_addr(at, to);
    match &mut reg.ops[at] {
        Operation::Jump { addr: a }
        | Operation::Push { addr: a }
        | Operation::Repeat { addr: a, .. }
        | Operation::RepeatNg { addr: a, .. } => {
            *a = addr;
            Ok(())
        }
        _ => Err(ERR_PARSER_BUG),
    }
}

// ============================================================================
// String / character class compilation
// ============================================================================

fn compile_string_node(sn: &StrNode, reg: &mut RegexType) {
    if sn.s.is_empty() {
        return;
    }
    if sn.ignorecase {
        let folded: Vec<char> = sn.s.chars().map(case_fold).collect();
        add_op(reg, Operation::StrIc { s: folded.into_boxed_slice() });
    } else {
        add_op(reg, Operation::Str { s: sn.s.as_bytes().into() });
    }
}

fn compile_cclass_node(cc: &CClassNode, reg: &mut RegexType) {
    add_op(reg, Operation::CClass { cc: Box::new(cc.clone()) });
}

// ============================================================================
// Quantifier compilation
// ============================================================================

fn entry_repeat_range(reg: &mut RegexType, lower: i32, upper: i32) -> usize {
    let id = reg.num_repeat;
    reg.num_repeat += 1;
    reg.repeat_range.push(RepeatRange {
        lower,
        upper,
        u_offset: 0,
    });
    id
}

/// Body of a loop, bracketed by an empty check when it may match nothing.
fn compile_quant_body_with_empty_check(
    body: &Node,
    reg: &mut RegexType,
    empty_check: bool,
) -> Result<(), i32> {
    if !empty_check {
        return compile_tree(body, reg);
    }
    let id = reg.num_empty_check;
    reg.num_empty_check += 1;
    add_op(reg, Operation::EmptyCheckStart { id });
    compile_tree(body, reg)?;
    add_op(reg, Operation::EmptyCheckEnd { id });
    Ok(())
}

fn compile_quantifier_node(qn: &QuantNode, reg: &mut RegexType) -> Result<(), i32> {
    let body = qn.body.as_ref();
    let empty_check = body.min_len() == 0;

    if qn.upper == 0 {
        return Ok(());
    }
    if qn.lower == 1 && qn.upper == 1 {
        return compile_tree(body, reg);
    }

    if is_infinite_repeat(qn.upper) && qn.lower <= 1 {
        if qn.greedy {
            //   [Jump → B]            (only for `+`)
            // A: Push → exit
            // B: body
            //    Jump → A
            let entry = if qn.lower == 1 {
                Some(add_op(reg, Operation::Jump { addr: 0 }))
            } else {
                None
            };
            let push = add_op(reg, Operation::Push { addr: 0 });
            if let Some(entry) = entry {
                patch_addr(reg, entry, push + 1)?;
            }
            compile_quant_body_with_empty_check(body, reg, empty_check)?;
            let back = add_op(reg, Operation::Jump { addr: 0 });
            patch_addr(reg, back, push)?;
            let exit = ops_curr_offset(reg);
            patch_addr(reg, push, exit)?;
        } else {
            //   [Jump → C]            (only for `*?`)
            // B: body
            // C: Push → B
            let entry = if qn.lower == 0 {
                Some(add_op(reg, Operation::Jump { addr: 0 }))
            } else {
                None
            };
            let body_start = ops_curr_offset(reg);
            compile_quant_body_with_empty_check(body, reg, empty_check)?;
            let push = add_op(reg, Operation::Push { addr: 0 });
            patch_addr(reg, push, body_start)?;
            if let Some(entry) = entry {
                patch_addr(reg, entry, push)?;
            }
        }
        return Ok(());
    }

    if qn.lower == 0 && qn.upper == 1 {
        if qn.greedy {
            let push = add_op(reg, Operation::Push { addr: 0 });
            compile_tree(body, reg)?;
            let exit = ops_curr_offset(reg);
            patch_addr(reg, push, exit)?;
        } else {
            let push = add_op(reg, Operation::Push { addr: 0 });
            let skip = add_op(reg, Operation::Jump { addr: 0 });
            patch_addr(reg, push, skip + 1)?;
            compile_tree(body, reg)?;
            let exit = ops_curr_offset(reg);
            patch_addr(reg, skip, exit)?;
        }
        return Ok(());
    }

    let id = entry_repeat_range(reg, qn.lower, qn.upper);
    let head = if qn.greedy {
        add_op(reg, Operation::Repeat { id, addr: 0 })
    } else {
        add_op(reg, Operation::RepeatNg { id, addr: 0 })
    };
    reg.repeat_range[id].u_offset = ops_curr_offset(reg);
    compile_quant_body_with_empty_check(body, reg, empty_check)?;
    if qn.greedy {
        add_op(reg, Operation::RepeatInc { id });
    } else {
        add_op(reg, Operation::RepeatIncNg { id });
    }
    let exit = ops_curr_offset(reg);
    patch_addr(reg, head, exit)
}

// ============================================================================
// Bag / anchor compilation
// ============================================================================

fn compile_bag_memory_node(bag: &BagNode, reg: &mut RegexType) -> Result<(), i32> {
    add_op(reg, Operation::MemStart { mem: bag.regnum });
    compile_tree(&bag.body, reg)?;
    add_op(reg, Operation::MemEnd { mem: bag.regnum });
    Ok(())
}

fn new_mark_id(reg: &mut RegexType) -> usize {
    let id = reg.num_mark;
    reg.num_mark += 1;
    id
}

fn compile_anchor_node(an: &AnchorNode, reg: &mut RegexType) -> Result<(), i32> {
    let body = match an.anchor_type {
        AnchorType::BeginBuf => {
            add_op(reg, Operation::BeginBuf);
            return Ok(());
        }
        AnchorType::EndBuf => {
            add_op(reg, Operation::EndBuf);
            return Ok(());
        }
        AnchorType::SemiEndBuf => {
            add_op(reg, Operation::SemiEndBuf);
            return Ok(());
        }
        AnchorType::BeginLine => {
            add_op(reg, Operation::BeginLine);
            return Ok(());
        }
        AnchorType::EndLine => {
            add_op(reg, Operation::EndLine);
            return Ok(());
        }
        AnchorType::WordBoundary => {
            add_op(reg, Operation::WordBoundary);
            return Ok(());
        }
        AnchorType::NoWordBoundary => {
            add_op(reg, Operation::NoWordBoundary);
            return Ok(());
        }
        _ => an.body.as_deref().ok_or(ERR_PARSER_BUG)?,
    };

    let behind = matches!(
        an.anchor_type,
        AnchorType::LookBehind | AnchorType::LookBehindNot
    );
    let id = new_mark_id(reg);

    match an.anchor_type {
        AnchorType::PrecRead | AnchorType::LookBehind => {
            add_op(reg, Operation::Mark { id, save_pos: true });
            if behind {
                add_op(reg, Operation::StepBack { n: an.char_len });
            }
            compile_tree(body, reg)?;
            add_op(reg, Operation::CutToMark { id, restore_pos: true });
        }
        _ => {
            // Mark; Push → after; [StepBack]; body; PopToMark; Fail; after:
            add_op(reg, Operation::Mark { id, save_pos: false });
            let push = add_op(reg, Operation::Push { addr: 0 });
            if behind {
                add_op(reg, Operation::StepBack { n: an.char_len });
            }
            compile_tree(body, reg)?;
            add_op(reg, Operation::PopToMark { id });
            add_op(reg, Operation::Fail);
            let after = ops_curr_offset(reg);
            patch_addr(reg, push, after)?;
        }
    }
    Ok(())
}

// ============================================================================
// Tree compilation
// ============================================================================

fn compile_alt_node(alts: &[Node], reg: &mut RegexType) -> Result<(), i32> {
    let mut jumps = Vec::with_capacity(alts.len());
    let last = alts.len().saturating_sub(1);
    for (i, branch) in alts.iter().enumerate() {
        if i < last {
            let push = add_op(reg, Operation::Push { addr: 0 });
            compile_tree(branch, reg)?;
            jumps.push(add_op(reg, Operation::Jump { addr: 0 }));
            let next = ops_curr_offset(reg);
            patch_addr(reg, push, next)?;
        } else {
            compile_tree(branch, reg)?;
        }
    }
    let end = ops_curr_offset(reg);
    for jump in jumps {
        patch_addr(reg, jump, end)?;
    }
    Ok(())
}

pub fn compile_tree(node: &Node, reg: &mut RegexType) -> Result<(), i32> {
    match node {
        Node::Empty => {}
        Node::String(sn) => compile_string_node(sn, reg),
        Node::CClass(cc) => compile_cclass_node(cc, reg),
        Node::CType(ct) => {
            add_op(
                reg,
                Operation::CType {
                    ctype: ct.ctype,
                    not: ct.not,
                },
            );
        }
        Node::AnyChar { multiline } => {
            add_op(
                reg,
                if *multiline {
                    Operation::AnyCharMl
                } else {
                    Operation::AnyChar
                },
            );
        }
        Node::Anchor(an) => compile_anchor_node(an, reg)?,
        Node::BackRef(br) => {
            add_op(
                reg,
                if br.ignorecase {
                    Operation::BackRefIc { mem: br.regnum }
                } else {
                    Operation::BackRef { mem: br.regnum }
                },
            );
        }
        Node::Quant(qn) => compile_quantifier_node(qn, reg)?,
        Node::Bag(bag) => compile_bag_memory_node(bag, reg)?,
        Node::List(items) => {
            for item in items {
                compile_tree(item, reg)?;
            }
        }
        Node::Alt(alts) => compile_alt_node(alts, reg)?,
    }
    Ok(())
}

// ============================================================================
// Search optimization
// ============================================================================

/// Case-sensitive literal every match must start with.
fn leading_exact(node: &Node) -> Option<&str> {
    match node {
        Node::String(sn) if !sn.ignorecase && !sn.s.is_empty() => Some(&sn.s),
        Node::List(items) => items.first().and_then(leading_exact),
        Node::Bag(bag) => leading_exact(&bag.body),
        Node::Quant(qn) if qn.lower >= 1 => leading_exact(&qn.body),
        _ => None,
    }
}

fn is_begin_buf_anchored(node: &Node) -> bool {
    match node {
        Node::Anchor(an) => an.anchor_type == AnchorType::BeginBuf,
        Node::List(items) => items.first().map_or(false, is_begin_buf_anchored),
        Node::Bag(bag) => is_begin_buf_anchored(&bag.body),
        Node::Alt(alts) => !alts.is_empty() && alts.iter().all(is_begin_buf_anchored),
        _ => false,
    }
}

fn set_optimize_info(root: &Node, reg: &mut RegexType) {
    if is_begin_buf_anchored(root) {
        reg.anchor |= ANCR_BEGIN_BUF;
    }
    if let Some(exact) = leading_exact(root) {
        reg.exact_finder = Some(memmem::Finder::new(exact.as_bytes()).into_owned());
    }
}

// ============================================================================
// Entry point
// ============================================================================

pub fn compile_from_tree(root: &Node, reg: &mut RegexType, env: ParseEnv) -> Result<(), i32> {
    reg.ops.clear();
    reg.num_mem = env.num_mem;
    reg.name_table = Arc::new(env.name_table);

    compile_tree(root, reg)?;
    add_op(reg, Operation::End);
    set_optimize_info(root, reg);

    trace!("bytecode for {:?}: {:?}", reg.pattern, reg.ops);
    Ok(())
}

/// Parse and compile `pattern` into an executable program.
pub fn compile(pattern: &str, options: RegexOptions) -> Result<RegexType, RegexError> {
    let mut env = ParseEnv::new(options);
    let root = match parse_tree(pattern, &mut env) {
        Ok(root) => root,
        Err(code) => {
            debug!("pattern {:?} rejected: code {} at {}", pattern, code, env.error_pos);
            return Err(RegexError::syntax(
                code,
                env.error_pos,
                env.error_param.as_deref(),
            ));
        }
    };

    let mut reg = RegexType::new(pattern, options);
    compile_from_tree(&root, &mut reg, env).map_err(RegexError::from)?;
    debug!(
        "compiled {:?}: {} ops, {} captures, {} repeats",
        pattern,
        reg.ops.len(),
        reg.num_mem,
        reg.num_repeat
    );
    Ok(reg)
}
