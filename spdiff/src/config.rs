//! Settings of an inference session.

use crate::term::Key;

/// Source of the candidate rewrites that the merge search combines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffMode {
    /// every differing position of an example, including nested ones
    Simple,
    /// the replacements of a minimal edit script
    Minimal,
}

/// Which merged rewrites survive the subsumption filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keep {
    /// drop rewrites whose effect is strictly contained in the effect of another
    Maximal,
    /// drop rewrites whose effect strictly contains the effect of another
    Minimal,
}

/// Settings of an inference session.
///
/// ~~~
/// # use spdiff::{Config, Keep};
/// let config = Config {
///     keep: Keep::Minimal,
///     ..Config::default()
/// };
/// assert_eq!(config.budget, Some(100_000));
/// ~~~
#[derive(Clone, Debug)]
pub struct Config {
    /// maximal number of search steps, unbounded if `None`
    ///
    /// When the budget is exhausted, search returns what it found so far
    /// and marks its outcome as truncated.
    pub budget: Option<usize>,
    pub diffs: DiffMode,
    pub keep: Keep,
    /// rebind unbound right-hand side meta-variables after merging rewrites
    pub repair: bool,
    /// number of bits retained from composite keys
    pub key_bits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget: Some(100_000),
            diffs: DiffMode::Simple,
            keep: Keep::Maximal,
            repair: true,
            key_bits: Key::BITS,
        }
    }
}
