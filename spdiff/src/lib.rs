#![forbid(unsafe_code)]

//! Inference of rewrite rules from examples of changes.
//!
//! Given several examples of how some old term was changed to a new term,
//! this library infers rewrite rules that perform all of these changes.
//! For example, from the changes
//! `call(f, 42, 42)` to `call(f, 117, 42)` and
//! `call(f, 10, 10)` to `call(f, 117, 10)`,
//! it infers the rewrite rule `call(f, ?0, ?0) ⟶ call(f, 117, ?0)`,
//! where `?0` is a meta-variable.
//!
//! # Usage
//!
//! All terms are constructed in a [`Session`],
//! which shares structurally equal terms and
//! memoises the [edit distance](Session::edit_dist) between terms.
//! Every example yields a set of candidate rewrites, called diffs.
//! The search generalises one diff per example to a single rewrite,
//! by [anti-unification](Session::merge_rewrites),
//! and keeps the generalisations that are [safe](Session::is_safe) for every example.
//! A rewrite is safe for an example if applying it to the old term
//! brings us closer to the new term without any detour.
//!
//! ~~~
//! use spdiff::{Error, Example, Session};
//!
//! let sess = Session::new();
//! let ex1 = Example::new(sess.parse_term("f(g(1), 5)")?, sess.parse_term("f(h(1), 5)")?);
//! let ex2 = Example::new(sess.parse_term("k(g(2))")?, sess.parse_term("k(h(2))")?);
//! let outcome = sess.merge_diffs(&[ex1, ex2]);
//! let rw = sess.parse_rewrite("g(?0) --> h(?0)")?;
//! assert_eq!(outcome.rewrites, [rw.clone()]);
//!
//! // the inferred rewrite applies to new terms
//! let tm = sess.parse_term("m(g(3), g(4))")?;
//! assert_eq!(sess.apply(&rw, &tm), sess.parse_term("m(h(3), h(4))")?);
//! # Ok::<_, Error>(())
//! ~~~

#[macro_use]
extern crate log;

mod anti_unify;
mod common;
pub mod config;
mod diff;
mod dist;
pub mod error;
mod matching;
mod rewrite;
mod safety;
mod search;
mod session;
pub mod store;
mod subst;
pub mod term;

pub use anti_unify::Env;
pub use config::{Config, DiffMode, Keep};
pub use diff::Edit;
pub use error::Error;
pub use rewrite::Rewrite;
pub use search::{Example, Outcome, Stats};
pub use session::Session;
pub use store::Store;
pub use subst::Subst;
pub use term::{Atom, Key, Miller, Term};
