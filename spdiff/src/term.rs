//! Terms with structural hash keys.

use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use fnv::FnvHasher;
use indexmap::IndexSet;
use spdiff_parse::term::{fmt_appl, fmt_str};
use std::rc::Rc;

/// Structural hash key.
pub type Key = u64;

/// Meta-variable.
///
/// A meta-variable is a hole in a pattern.
/// Like the pattern variables of a rewrite rule context,
/// it is bound at most once per match.
pub type Miller = usize;

/// Tag reserved for meta-variables.
pub const META: &str = "meta";

/// Largest meta-variable that may be given explicitly.
///
/// The meta-variables above it are left to fresh meta-variables.
pub const MAX_META: Miller = Miller::MAX / 2;

/// Opaque scalar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    Int(i64),
    /// bit pattern of a 64-bit float
    Float(u64),
    Str(Rc<str>),
    Bool(bool),
}

impl Atom {
    pub fn float(x: f64) -> Self {
        Self::Float(x.to_bits())
    }

    /// Hash an atom by its value and its kind,
    /// such that `42` and `"42"` obtain different keys.
    pub fn key(&self) -> Key {
        let mut h = FnvHasher::default();
        match self {
            Self::Int(i) => {
                h.write_u8(0);
                h.write_i64(*i)
            }
            Self::Float(x) => {
                h.write_u8(1);
                h.write_u64(*x)
            }
            Self::Str(s) => {
                h.write_u8(2);
                h.write(s.as_bytes())
            }
            Self::Bool(b) => {
                h.write_u8(3);
                h.write_u8(*b as u8)
            }
        }
        h.finish()
    }
}

pub(crate) fn tag_key(tag: &str) -> Key {
    let mut h = FnvHasher::default();
    h.write_u8(4);
    h.write(tag.as_bytes());
    h.finish()
}

/// Combine an accumulated key with the key of the next argument.
pub(crate) fn mix(acc: Key, key: Key) -> Key {
    (acc << 5).wrapping_sub(acc).wrapping_add(key)
}

fn meta_key(m: Miller) -> Key {
    mix(tag_key(META), Atom::Int(m as i64).key())
}

/// Composite term, i.e. a tag applied to arguments.
///
/// Composites are only constructed by the [`Store`](crate::Store),
/// which computes their key and size once.
#[derive(Debug)]
pub struct Comb {
    pub(crate) tag: Rc<str>,
    pub(crate) args: Vec<Term>,
    pub(crate) key: Key,
    pub(crate) size: usize,
    /// true if no meta-variable occurs in the composite
    pub(crate) ground: bool,
}

impl Comb {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Return true if both composites have the same tag and arity.
    pub fn comparable(&self, other: &Self) -> bool {
        self.tag == other.tag && self.args.len() == other.args.len()
    }
}

impl Drop for Comb {
    // dropping a deep term must not recurse once per level
    fn drop(&mut self) {
        let mut stack = core::mem::take(&mut self.args);
        while let Some(tm) = stack.pop() {
            if let Term::Comb(RTerm(rc)) = tm {
                if let Ok(mut comb) = Rc::try_unwrap(rc) {
                    stack.append(&mut comb.args)
                }
            }
        }
    }
}

/// Pointer to a shared composite.
#[derive(Clone, Debug)]
pub struct RTerm(Rc<Comb>);

impl RTerm {
    pub(crate) fn new(comb: Comb) -> Self {
        Self(Rc::new(comb))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl core::ops::Deref for RTerm {
    type Target = Comb;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Immutable term.
#[derive(Clone, Debug)]
pub enum Term {
    Atom(Atom),
    Comb(RTerm),
    Meta(Miller),
}

impl Term {
    pub fn int(i: i64) -> Self {
        Self::Atom(Atom::Int(i))
    }

    pub fn str(s: &str) -> Self {
        Self::Atom(Atom::Str(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        Self::Atom(Atom::Bool(b))
    }

    pub fn key(&self) -> Key {
        match self {
            Self::Atom(a) => a.key(),
            Self::Comb(c) => c.key,
            Self::Meta(m) => meta_key(*m),
        }
    }

    /// Number of nodes in the term.
    ///
    /// Atoms and meta-variables count as one node each.
    pub fn size(&self) -> usize {
        match self {
            Self::Comb(c) => c.size,
            Self::Atom(_) | Self::Meta(_) => 1,
        }
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Self::Meta(_))
    }

    /// Return true if no meta-variable occurs in the term.
    pub fn is_ground(&self) -> bool {
        match self {
            Self::Atom(_) => true,
            Self::Comb(c) => c.ground,
            Self::Meta(_) => false,
        }
    }

    pub fn meta_id(&self) -> Option<Miller> {
        match self {
            Self::Meta(m) => Some(*m),
            _ => None,
        }
    }

    pub fn get_comb(&self) -> Option<&Comb> {
        match self {
            Self::Comb(c) => Some(c),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.get_comb().map(Comb::tag)
    }

    /// Arguments of a composite, empty for leaves.
    pub fn args(&self) -> &[Term] {
        self.get_comb().map_or(&[][..], Comb::args)
    }

    /// Return both composites if they have the same tag and arity.
    pub fn comparable<'a>(&'a self, other: &'a Self) -> Option<(&'a RTerm, &'a RTerm)> {
        match (self, other) {
            (Self::Comb(c1), Self::Comb(c2)) if c1.comparable(c2) => Some((c1, c2)),
            _ => None,
        }
    }

    /// Compare the memory addresses of two terms (or the values of leaves).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Atom(a1), Self::Atom(a2)) => a1 == a2,
            (Self::Meta(m1), Self::Meta(m2)) => m1 == m2,
            (Self::Comb(c1), Self::Comb(c2)) => c1.ptr_eq(c2),
            _ => false,
        }
    }

    /// Distinct subterms in pre-order, starting with the term itself.
    pub fn subterms(&self) -> Vec<Term> {
        let mut seen: IndexSet<Term, fnv::FnvBuildHasher> = IndexSet::default();
        let mut stack = Vec::from([self]);
        while let Some(tm) = stack.pop() {
            if seen.insert(tm.clone()) {
                stack.extend(tm.args().iter().rev());
            }
        }
        seen.into_iter().collect()
    }

    /// Distinct meta-variables in pre-order.
    pub fn metas(&self) -> Vec<Miller> {
        let mut metas = Vec::new();
        let mut stack = Vec::from([self]);
        while let Some(tm) = stack.pop() {
            match tm {
                Self::Meta(m) if !metas.contains(m) => metas.push(*m),
                Self::Comb(c) => stack.extend(c.args.iter().rev()),
                _ => (),
            }
        }
        metas
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = Vec::from([(self, other)]);
        while let Some((t1, t2)) = pairs.pop() {
            match (t1, t2) {
                // the store shares equal terms, so this is usually decided by the pointers,
                // but keys may collide, and terms may stem from different stores
                (Self::Comb(c1), Self::Comb(c2)) if !c1.ptr_eq(c2) => {
                    if c1.key != c2.key || !c1.comparable(c2) {
                        return false;
                    }
                    pairs.extend(c1.args.iter().zip(&c2.args))
                }
                _ if !t1.ptr_eq(t2) => return false,
                _ => (),
            }
        }
        true
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.key())
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => i.fmt(f),
            Self::Float(x) => write!(f, "{:?}", f64::from_bits(*x)),
            Self::Str(s) => fmt_str(s, f),
            Self::Bool(b) => b.fmt(f),
        }
    }
}

impl Display for Comb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_appl(&self.tag, &self.args, f)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Atom(a) => a.fmt(f),
            Self::Comb(c) => c.fmt(f),
            Self::Meta(m) => write!(f, "?{}", m),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Session, Term};

    #[test]
    fn atom_kinds_differ() {
        assert_ne!(Term::int(42).key(), Term::str("42").key());
        assert_ne!(Term::int(1).key(), Term::bool(true).key());
        assert_ne!(Term::int(42), Term::str("42"));
    }

    #[test]
    fn sizes() -> Result<(), Error> {
        let sess = Session::new();
        assert_eq!(Term::int(1).size(), 1);
        assert_eq!(Term::Meta(0).size(), 1);
        assert_eq!(sess.parse_term("f")?.size(), 1);
        assert_eq!(sess.parse_term("f(1, g(?0), \"x\")")?.size(), 5);
        Ok(())
    }

    #[test]
    fn subterms_are_distinct_and_preordered() -> Result<(), Error> {
        let sess = Session::new();
        let tm = sess.parse_term("f(g(1), 2, g(1))")?;
        let subs: Vec<_> = tm.subterms().iter().map(|t| t.to_string()).collect();
        assert_eq!(subs, ["f(g(1), 2, g(1))", "g(1)", "1", "2"]);
        Ok(())
    }

    #[test]
    fn ground_terms() -> Result<(), Error> {
        let sess = Session::new();
        assert!(Term::int(1).is_ground());
        assert!(!Term::Meta(0).is_ground());
        assert!(sess.parse_term("f(1, g(x))")?.is_ground());
        assert!(!sess.parse_term("f(1, g(?0))")?.is_ground());
        Ok(())
    }

    #[test]
    fn equal_across_sessions() -> Result<(), Error> {
        let (s1, s2) = (Session::new(), Session::new());
        let (mut t1, mut t2, mut t3) = (Term::int(0), Term::int(0), Term::int(1));
        for _ in 0..10_000 {
            t1 = s1.intern("n", vec![t1])?;
            t2 = s2.intern("n", vec![t2])?;
            t3 = s2.intern("n", vec![t3])?;
        }
        assert!(!t1.ptr_eq(&t2));
        assert!(t1 == t2);
        assert!(t1 != t3);
        Ok(())
    }

    #[test]
    fn drop_deep_term() -> Result<(), Error> {
        let mut tm = Term::int(0);
        {
            let sess = Session::new();
            for _ in 0..100_000 {
                tm = sess.intern("n", vec![tm])?;
            }
        }
        // the store is gone, so the term is the only owner of its subterms
        assert_eq!(tm.size(), 100_001);
        drop(tm);
        Ok(())
    }

    #[test]
    fn metas_in_preorder() -> Result<(), Error> {
        let sess = Session::new();
        let tm = sess.parse_term("f(?3, g(?1, ?3), ?0)")?;
        assert_eq!(tm.metas(), [3, 1, 0]);
        Ok(())
    }

    #[test]
    fn display_parses_back() -> Result<(), Error> {
        let sess = Session::new();
        let s = r#"call(f, 42, "4\"2", false, -1.5, ?2, [](a, b))"#;
        let tm = sess.parse_term(s)?;
        assert_eq!(tm.to_string(), s);
        assert_eq!(sess.parse_term(&tm.to_string())?, tm);
        Ok(())
    }
}
