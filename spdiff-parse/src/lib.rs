//! Parser for the textual syntax of terms and rewrite rules.
//!
//! Terms are atoms (integers, floats, strings, booleans),
//! meta-variables such as `?0`, or tags applied to arguments,
//! such as `call(f, 42)` or the sequence `[](a, b)`.
//!
//! Example usage:
//!
//! ~~~
//! use spdiff_parse::{Error, Rule, Term};
//!
//! let tm = Term::parse(r#"call(f, 42, "42")"#)?;
//! assert_eq!(tm.to_string(), r#"call(f, 42, "42")"#);
//!
//! let rule = Rule::parse("call(f, ?0) --> call(g, ?0)")?;
//! assert_eq!(rule.lhs, Term::parse("call(f, ?0)")?);
//! # Ok::<_, Error>(())
//! ~~~

pub mod lex;
pub mod term;

pub use lex::Token;
pub use term::{Atom, Error, Rule, Term};

use logos::Logos;

pub fn lex(s: &str) -> impl Iterator<Item = Token<'_>> {
    Token::lexer(s).filter(|token| *token != Token::Space)
}
