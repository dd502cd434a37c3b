//! Parse trees for terms and rewrite rules.

use crate::Token;
use core::fmt::{self, Display};
use core::iter::Peekable;

/// Scalar leaf of a term.
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// Unshared term, as produced by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Atom(Atom),
    /// tag applied to (possibly zero) arguments
    Appl(String, Vec<Term>),
    /// meta-variable `?n`
    Meta(usize),
}

/// Rewrite rule `lhs --> rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub lhs: Term,
    pub rhs: Term,
}

#[derive(Debug, PartialEq)]
pub enum Error {
    ExpectedTerm,
    ExpectedCommaOrRPar,
    ExpectedLongArrow,
    InvalidToken,
    TrailingInput,
}

type Result<T> = core::result::Result<T, Error>;

impl Term {
    /// Parse a single term, failing if anything but whitespace follows it.
    ///
    /// ~~~
    /// # use spdiff_parse::{Atom, Error, Term};
    /// let tm = Term::parse("f(1, g)")?;
    /// let g = Term::Appl("g".into(), Vec::new());
    /// assert_eq!(tm, Term::Appl("f".into(), vec![Term::Atom(Atom::Int(1)), g]));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn parse(s: &str) -> Result<Self> {
        let mut iter = crate::lex(s).peekable();
        let tm = Self::parse_tokens(&mut iter)?;
        end(&mut iter)?;
        Ok(tm)
    }

    pub fn parse_tokens<'s, I>(iter: &mut Peekable<I>) -> Result<Self>
    where
        I: Iterator<Item = Token<'s>>,
    {
        match iter.next().ok_or(Error::ExpectedTerm)? {
            Token::Int(i) => Ok(Self::Atom(Atom::Int(i))),
            Token::Float(x) => Ok(Self::Atom(Atom::Float(x))),
            Token::Str(s) => Ok(Self::Atom(Atom::Str(unescape(s)))),
            Token::True => Ok(Self::Atom(Atom::Bool(true))),
            Token::False => Ok(Self::Atom(Atom::Bool(false))),
            Token::Meta(m) => Ok(Self::Meta(m)),
            Token::Ident(tag) => Self::parse_args(tag.into(), iter),
            Token::Nil => Self::parse_args("[]".into(), iter),
            Token::Error => Err(Error::InvalidToken),
            _ => Err(Error::ExpectedTerm),
        }
    }

    fn parse_args<'s, I>(tag: String, iter: &mut Peekable<I>) -> Result<Self>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let mut args = Vec::new();
        if iter.next_if_eq(&Token::LPar).is_some() && iter.next_if_eq(&Token::RPar).is_none() {
            loop {
                args.push(Self::parse_tokens(iter)?);
                match iter.next() {
                    Some(Token::Comma) => (),
                    Some(Token::RPar) => break,
                    _ => return Err(Error::ExpectedCommaOrRPar),
                }
            }
        }
        Ok(Self::Appl(tag, args))
    }
}

impl Rule {
    /// Parse a rewrite rule.
    ///
    /// ~~~
    /// # use spdiff_parse::{Error, Rule};
    /// let rule = Rule::parse("f(?0) --> g(?0, ?0)")?;
    /// assert_eq!(rule.to_string(), "f(?0) ⟶ g(?0, ?0)");
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn parse(s: &str) -> Result<Self> {
        let mut iter = crate::lex(s).peekable();
        let lhs = Term::parse_tokens(&mut iter)?;
        match iter.next() {
            Some(Token::LongArrow) => (),
            _ => return Err(Error::ExpectedLongArrow),
        }
        let rhs = Term::parse_tokens(&mut iter)?;
        end(&mut iter)?;
        Ok(Self { lhs, rhs })
    }
}

fn end<'s>(iter: &mut impl Iterator<Item = Token<'s>>) -> Result<()> {
    match iter.next() {
        None => Ok(()),
        Some(_) => Err(Error::TrailingInput),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}

/// Write a string literal such that parsing it yields the original string.
pub fn fmt_str(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

/// Write `tag` or `tag(a1, ..., an)`.
pub fn fmt_appl<Tm: Display>(tag: &str, args: &[Tm], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", tag)?;
    if let Some((head, tail)) = args.split_first() {
        write!(f, "({}", head)?;
        tail.iter().try_for_each(|a| write!(f, ", {}", a))?;
        write!(f, ")")?;
    }
    Ok(())
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => i.fmt(f),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Str(s) => fmt_str(s, f),
            Self::Bool(b) => b.fmt(f),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Atom(a) => a.fmt(f),
            Self::Appl(tag, args) => fmt_appl(tag, args, f),
            Self::Meta(m) => write!(f, "?{}", m),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs, self.rhs)
    }
}

#[test]
fn positive() -> Result<()> {
    Term::parse("f")?;
    Term::parse("f()")?;
    Term::parse("call(f, 42, \"42\", true, 1.5, ?7)")?;
    Term::parse("Program(body([](ExpressionStatement(x))))")?;
    Rule::parse("f(?0) ⟶ g")?;
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    assert_eq!(Term::parse(""), Err(ExpectedTerm));
    assert_eq!(Term::parse(")"), Err(ExpectedTerm));
    assert_eq!(Term::parse("f(1"), Err(ExpectedCommaOrRPar));
    assert_eq!(Term::parse("f(1 2)"), Err(ExpectedCommaOrRPar));
    assert_eq!(Term::parse("f g"), Err(TrailingInput));
    assert_eq!(Term::parse("#"), Err(InvalidToken));
    assert_eq!(Rule::parse("f g"), Err(ExpectedLongArrow));
}

#[test]
fn nullary() -> Result<()> {
    assert_eq!(Term::parse("f()")?, Term::parse("f")?);
    Ok(())
}

#[test]
fn display_parses_back() -> Result<()> {
    for s in [
        r#"call(f, 42, "4\"2", false, -1.0, ?3)"#,
        "[](a, [], b(1e20))",
        r#""line\nbreak""#,
    ] {
        let tm = Term::parse(s)?;
        assert_eq!(Term::parse(&tm.to_string())?, tm);
    }
    Ok(())
}
