// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use ferrule::prelude::*;
//!
//! let re = Regex::new(r"\d+").unwrap();
//! let m = re.find("answer: 42").unwrap();
//! assert_eq!(m.as_str(), "42");
//! ```

pub use crate::api::{
    find_all, find_first, substitute, CaptureMatches, Captures, CapturesIter, FindAll, FindIter,
    Match, Regex, RegexBuilder,
};
pub use crate::error::{GroupId, RegexError};
pub use crate::regdef::RegexOptions;
