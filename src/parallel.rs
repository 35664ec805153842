//! Parallel per-function analysis using Rayon
//!
//! Functions of one registry snapshot share no mutable state, so each one is
//! analysed as its own task on the global Rayon pool. Results come back in
//! input order.
//!
//! Enabled by the default `parallel` feature:
//! ```toml
//! graph_anafis = { version = "0.1", default-features = false } # sequential
//! ```

use crate::registry::FunctionEntry;
use rayon::prelude::*;

/// Apply `f` to every entry in parallel, preserving order
pub(crate) fn map_entries<T, F>(entries: &[FunctionEntry], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&FunctionEntry) -> T + Sync + Send,
{
    entries.par_iter().map(f).collect()
}
