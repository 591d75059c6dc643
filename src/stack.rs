//! Stack headroom for the recursive passes.
//!
//! Parsing, resolving and evaluating all recurse over the syntax tree.  The
//! nesting and call-depth limits keep that recursion bounded; `stacker` makes
//! sure the bounded amount fits whatever thread the interpreter runs on
//! (test threads get a much smaller stack than `main`).

/// Keep at least this much stack free before recursing further.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment when the current one runs low.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}
