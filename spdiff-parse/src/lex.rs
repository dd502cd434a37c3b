use core::fmt::{self, Display};
use logos::{Lexer, Logos};

#[derive(Logos, Debug, PartialEq)]
pub enum Token<'s> {
    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[token(",")]
    Comma,

    #[token("-->")]
    #[token("⟶")]
    LongArrow,

    #[token("[]")]
    Nil,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r"\?[0-9]+", meta)]
    Meta(usize),

    #[regex("-?[0-9]+", int)]
    Int(i64),

    #[regex(r"-?[0-9]+(\.[0-9]+([eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)", float)]
    Float(f64),

    #[regex(r#""([^"\\]|\\.)*""#, string)]
    Str(&'s str),

    #[regex("[a-zA-Z_$][a-zA-Z0-9_$']*")]
    Ident(&'s str),

    #[regex(r"[ \t\r\n\f]+")]
    #[regex(r"//[^\n]*")]
    Space,

    #[error]
    Error,
}

impl<'s> Display for Token<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::LPar => "(".fmt(f),
            Self::RPar => ")".fmt(f),
            Self::Comma => ",".fmt(f),
            Self::LongArrow => "-->".fmt(f),
            Self::Nil => "[]".fmt(f),
            Self::True => "true".fmt(f),
            Self::False => "false".fmt(f),
            Self::Meta(m) => write!(f, "?{}", m),
            Self::Int(i) => i.fmt(f),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Str(s) => write!(f, "\"{}\"", s),
            Self::Ident(s) => s.fmt(f),
            Self::Space => " ".fmt(f),
            Self::Error => Err(Default::default()),
        }
    }
}

fn meta<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<usize> {
    lex.slice()[1..].parse().ok()
}

fn int<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn float<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Strip the quotes, keeping escape sequences for the parser to resolve.
fn string<'s>(lex: &mut Lexer<'s, Token<'s>>) -> &'s str {
    let s = lex.slice();
    &s[1..s.len() - 1]
}

#[test]
fn tokens() {
    let toks: Vec<_> = crate::lex(r#"f(?3, -42, 1.5, "a\"b") --> []"#).collect();
    use Token::*;
    assert_eq!(
        toks,
        [
            Ident("f"),
            LPar,
            Meta(3),
            Comma,
            Int(-42),
            Comma,
            Float(1.5),
            Comma,
            Str(r#"a\"b"#),
            RPar,
            LongArrow,
            Nil
        ]
    );
}

#[test]
fn keywords_and_comments() {
    let toks: Vec<_> = crate::lex("true // ignored\nfalse truth").collect();
    use Token::*;
    assert_eq!(toks, [True, False, Ident("truth")]);
}
