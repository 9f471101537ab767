//! # Ferrule
//!
//! A compact backtracking regex engine speaking the Python `re` dialect:
//! leftmost search, non-overlapping iteration, capture groups (numbered
//! and named), look-around, back-references and template substitution.
//! Literal prefixes are located with [`memchr`](https://crates.io/crates/memchr)
//! before the matcher runs.
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrule::prelude::*;
//!
//! let re = Regex::new(r"([\w.-]+)@([\w.-]+)").unwrap();
//! let caps = re.captures("purple alice-b@google.com monkey").unwrap();
//! assert_eq!(caps.get(0).unwrap().as_str(), "alice-b@google.com");
//! assert_eq!(caps.get(1).unwrap().as_str(), "alice-b");
//! assert_eq!(caps.get(2).unwrap().as_str(), "google.com");
//! ```
//!
//! One-shot helpers compile the pattern for a single call:
//!
//! ```rust
//! use ferrule::prelude::*;
//!
//! let out = substitute(
//!     r"([\w.-]+)@([\w.-]+)",
//!     "alice@google.com, bob@abc.com",
//!     r"\1@example.com",
//! )
//! .unwrap();
//! assert_eq!(out, "alice@example.com, bob@example.com");
//! ```
//!
//! For fine-grained control, use [`RegexBuilder`](api::RegexBuilder):
//!
//! ```rust
//! use ferrule::prelude::*;
//!
//! let re = Regex::builder(r"^hello$")
//!     .case_insensitive(true)
//!     .multi_line(true)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match("first\nHello\nlast"));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regparse`] | Tokenizer and recursive-descent parser |
//! | [`regparse_types`] | AST nodes, tokens, parse environment |
//! | [`regcomp`] | AST-to-bytecode compiler and search optimization |
//! | [`regexec`] | Backtracking VM and search driver |
//! | [`regint`] | Bytecode, bitsets, compiled program |
//! | [`regsub`] | Replacement templates |
//! | [`regenc`] | UTF-8 decoding and character types |
//! | [`unicode_data`] | Code point tables for `\w`, `\d` and `\s` |
//! | [`regdef`] | Options, limits, error codes, `Region` |
//! | [`regerror`] | Error messages |
//! | [`error`] | Public error type |
//! | [`api`] | `Regex`, `Captures` and friends |

pub mod api;
pub mod error;
pub mod prelude;
pub mod regcomp;
pub mod regdef;
pub mod regenc;
pub mod regerror;
pub mod regexec;
pub mod regint;
pub mod regparse;
pub mod regparse_types;
pub mod regsub;
pub mod unicode_data;
