//! Inference sessions.

use crate::store::{Error as StoreError, Store};
use crate::term::{Atom, Miller, RTerm, Term, MAX_META, META};
use crate::{Config, Error, Rewrite};
use core::cell::{Cell, RefCell};
use fnv::FnvHashMap;
use std::rc::Rc;

/// Outcome of visiting a node in [`Session::transform`].
pub(crate) enum Visit<'a, T> {
    Done(Term),
    Descend(&'a RTerm, Vec<T>),
}

/// State of an inference session.
///
/// A session owns the table of shared terms,
/// the counter for fresh meta-variables, and
/// memoised edit distances.
/// Terms from different sessions compare correctly, but
/// are only shared within the session that constructed them.
pub struct Session {
    store: RefCell<Store>,
    next_meta: Cell<Miller>,
    pub(crate) dist: RefCell<FnvHashMap<(Term, Term), usize>>,
    pub config: Config,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            store: RefCell::new(Store::with_key_bits(config.key_bits)),
            next_meta: Cell::new(0),
            dist: Default::default(),
            config,
        }
    }

    /// Construct the term with the given tag and arguments.
    ///
    /// The tag `meta` is reserved for meta-variables:
    ///
    /// ~~~
    /// # use spdiff::{Error, Session, Term};
    /// let sess = Session::new();
    /// assert_eq!(sess.intern("meta", vec![Term::int(3)])?, Term::Meta(3));
    /// assert!(sess.intern("meta", vec![Term::str("x")]).is_err());
    /// assert!(sess.intern("meta", vec![Term::int(-1)]).is_err());
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn intern(&self, tag: &str, args: Vec<Term>) -> Result<Term, Error> {
        if tag == META {
            let m = match args.as_slice() {
                [Term::Atom(Atom::Int(m))] => Miller::try_from(*m).ok(),
                _ => None,
            };
            return self.meta(m.ok_or(StoreError::InvalidTerm)?);
        }
        Ok(self.comb(tag.into(), args))
    }

    pub(crate) fn comb(&self, tag: Rc<str>, args: Vec<Term>) -> Term {
        Term::Comb(self.store.borrow_mut().intern(tag, args))
    }

    /// Rebuild a composite with new arguments of the same number.
    ///
    /// If all arguments are unchanged, return the original composite.
    pub(crate) fn rebuild(&self, comb: &RTerm, args: Vec<Term>) -> Term {
        if comb.args.iter().zip(&args).all(|(a1, a2)| a1.ptr_eq(a2)) {
            Term::Comb(comb.clone())
        } else {
            self.comb(comb.tag.clone(), args)
        }
    }

    /// Rebuild a term bottom-up without recursion.
    ///
    /// Starting from `root`, `visit` either yields a finished term or
    /// a composite together with one item per argument of the composite.
    /// The items are visited from left to right, and
    /// the composite is rebuilt with the terms they yield.
    pub(crate) fn transform<'a, T>(&self, root: T, mut visit: impl FnMut(T) -> Visit<'a, T>) -> Term {
        enum Task<'a, T> {
            Enter(T),
            Leave(&'a RTerm),
        }
        let (top, args) = match visit(root) {
            Visit::Done(tm) => return tm,
            Visit::Descend(c, args) => (c, args),
        };
        let mut tasks: Vec<_> = args.into_iter().rev().map(Task::Enter).collect();
        let mut done: Vec<Term> = Vec::new();
        while let Some(task) = tasks.pop() {
            match task {
                Task::Enter(x) => match visit(x) {
                    Visit::Done(tm) => done.push(tm),
                    Visit::Descend(c, args) => {
                        tasks.push(Task::Leave(c));
                        tasks.extend(args.into_iter().rev().map(Task::Enter))
                    }
                },
                Task::Leave(c) => {
                    let args = done.split_off(done.len() - c.args.len());
                    done.push(self.rebuild(c, args))
                }
            }
        }
        self.rebuild(top, done)
    }

    /// Return a meta-variable that was not used before in this session.
    pub fn fresh_meta(&self) -> Term {
        Term::Meta(self.fresh_miller())
    }

    pub(crate) fn fresh_miller(&self) -> Miller {
        let m = self.next_meta.get();
        self.next_meta.set(m + 1);
        m
    }

    /// Return the meta-variable `m`, excluding it from future fresh meta-variables.
    ///
    /// Fails if `m` is greater than [`MAX_META`](crate::term::MAX_META).
    pub fn meta(&self, m: Miller) -> Result<Term, Error> {
        if m > MAX_META {
            return Err(StoreError::InvalidTerm.into());
        }
        self.reserve_metas(m + 1);
        Ok(Term::Meta(m))
    }

    /// Exclude the meta-variables below `n` from future fresh meta-variables.
    pub(crate) fn reserve_metas(&self, n: Miller) {
        if self.next_meta.get() < n {
            self.next_meta.set(n)
        }
    }

    /// Share a parsed term.
    pub fn share(&self, tm: spdiff_parse::Term) -> Result<Term, Error> {
        use spdiff_parse::Term as PTerm;
        match tm {
            PTerm::Atom(a) => Ok(Term::Atom(a.into())),
            PTerm::Meta(m) => self.meta(m),
            PTerm::Appl(tag, args) => {
                let args = args.into_iter().map(|a| self.share(a));
                self.intern(&tag, args.collect::<Result<_, _>>()?)
            }
        }
    }

    /// Parse and share a term.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let t1 = sess.parse_term("call(f, 42)")?;
    /// let t2 = sess.parse_term("call(f, 42)")?;
    /// assert!(t1.ptr_eq(&t2));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn parse_term(&self, s: &str) -> Result<Term, Error> {
        self.share(spdiff_parse::Term::parse(s)?)
    }

    /// Parse and share a rewrite `lhs --> rhs`.
    pub fn parse_rewrite(&self, s: &str) -> Result<Rewrite, Error> {
        let rule = spdiff_parse::Rule::parse(s)?;
        Ok(Rewrite::new(self.share(rule.lhs)?, self.share(rule.rhs)?))
    }

    /// Number of distinct composites constructed in this session.
    pub fn store_len(&self) -> usize {
        self.store.borrow().len()
    }

    /// Number of key collisions encountered in this session.
    pub fn collisions(&self) -> usize {
        self.store.borrow().collisions()
    }
}

impl From<spdiff_parse::Atom> for Atom {
    fn from(a: spdiff_parse::Atom) -> Self {
        use spdiff_parse::Atom as PAtom;
        match a {
            PAtom::Int(i) => Self::Int(i),
            PAtom::Float(x) => Self::float(x),
            PAtom::Str(s) => Self::Str(s.into()),
            PAtom::Bool(b) => Self::Bool(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Visit;
    use crate::store::Error as StoreError;
    use crate::term::{Miller, MAX_META};
    use crate::{Atom, Config, Error, Session, Term};

    #[test]
    fn fresh_metas_avoid_parsed_ones() -> Result<(), Error> {
        let sess = Session::new();
        let tm = sess.parse_term("f(?4)")?;
        assert_eq!(tm.metas(), [4]);
        assert_eq!(sess.fresh_meta(), Term::Meta(5));
        assert_eq!(sess.fresh_meta(), Term::Meta(6));
        Ok(())
    }

    #[test]
    fn sessions_are_independent() {
        let s1 = Session::new();
        let s2 = Session::new();
        s1.fresh_meta();
        s1.fresh_meta();
        assert_eq!(s2.fresh_meta(), Term::Meta(0));
    }

    #[test]
    fn invalid_meta() {
        let sess = Session::new();
        let err = Err(Error::Store(StoreError::InvalidTerm));
        assert_eq!(sess.parse_term("meta"), err);
        assert_eq!(sess.parse_term("meta(1, 2)"), err);
        assert_eq!(sess.parse_term("meta(-1)"), err);
        assert_eq!(sess.parse_term("meta(7)"), Ok(Term::Meta(7)));
    }

    #[test]
    fn meta_out_of_range() -> Result<(), Error> {
        let sess = Session::new();
        let err = Err(Error::Store(StoreError::InvalidTerm));
        assert_eq!(sess.parse_term(&format!("f(?{})", Miller::MAX)), err);
        assert_eq!(sess.parse_term(&format!("?{}", MAX_META + 1)), err);
        assert!(sess.parse_rewrite(&format!("f --> ?{}", Miller::MAX)).is_err());
        assert_eq!(sess.meta(Miller::MAX), err);
        // rejected meta-variables do not exhaust the fresh ones
        assert_eq!(sess.fresh_meta(), Term::Meta(0));

        assert_eq!(sess.parse_term(&format!("g(?{})", MAX_META))?.metas(), [MAX_META]);
        assert_eq!(sess.fresh_meta(), Term::Meta(MAX_META + 1));
        assert_eq!(sess.fresh_meta(), Term::Meta(MAX_META + 2));
        Ok(())
    }

    #[test]
    fn parse_error() {
        let sess = Session::new();
        let err = spdiff_parse::Error::ExpectedCommaOrRPar;
        assert_eq!(sess.parse_term("f(1"), Err(Error::Parse(err)));
    }

    #[test]
    fn transform_in_order() -> Result<(), Error> {
        let sess = Session::new();
        let tm = sess.parse_term("f(1, g(2, 3), 4)")?;
        let mut seen = Vec::new();
        let inc = sess.transform(&tm, |tm| match tm {
            Term::Comb(c) => Visit::Descend(c, c.args.iter().collect()),
            Term::Atom(Atom::Int(i)) => {
                seen.push(*i);
                Visit::Done(Term::int(i + 1))
            }
            _ => Visit::Done(tm.clone()),
        });
        assert_eq!(seen, [1, 2, 3, 4]);
        assert_eq!(inc, sess.parse_term("f(2, g(3, 4), 5)")?);
        Ok(())
    }

    #[test]
    fn sharing_despite_collisions() -> Result<(), Error> {
        let sess = Session::with_config(Config {
            key_bits: 2,
            ..Config::default()
        });
        let tms = ["f(1)", "f(2)", "g(1)", "f(1, 2)", "h(f(1), f(2))", "h(f(2), f(1))"];
        let tms: Vec<Term> = tms.iter().map(|s| sess.parse_term(s)).collect::<Result<_, _>>()?;
        assert!(sess.collisions() > 0);
        for (i, t1) in tms.iter().enumerate() {
            assert!(sess.parse_term(&t1.to_string())?.ptr_eq(t1));
            for (j, t2) in tms.iter().enumerate() {
                assert_eq!(i == j, t1 == t2);
            }
        }
        Ok(())
    }
}
