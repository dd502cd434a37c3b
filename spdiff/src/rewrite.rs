//! Rewrite rules and their application.

use crate::session::Visit;
use crate::term::{Miller, Term};
use crate::{Session, Subst};
use core::fmt::{self, Display};

/// Rewrite rule.
///
/// A rewrite is well-formed if every meta-variable of
/// its right-hand side also occurs in its left-hand side.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rewrite {
    /// pattern to match with
    pub lhs: Term,
    /// pattern to replace with
    pub rhs: Term,
}

impl Rewrite {
    pub fn new(lhs: Term, rhs: Term) -> Self {
        Self { lhs, rhs }
    }

    /// Meta-variables of the right-hand side that do not occur in the left-hand side.
    pub fn unbound(&self) -> Vec<Miller> {
        let lhs = self.lhs.metas();
        let mut rhs = self.rhs.metas();
        rhs.retain(|m| !lhs.contains(m));
        rhs
    }

    pub fn is_well_formed(&self) -> bool {
        self.unbound().is_empty()
    }
}

impl Display for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs, self.rhs)
    }
}

impl Session {
    /// Rewrite all outermost subterms matching the left-hand side.
    ///
    /// Subterms are visited in pre-order;
    /// once a subterm is rewritten, its own subterms are not visited.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let rw = sess.parse_rewrite("g(?0) --> h(?0)")?;
    /// let tm = sess.parse_term("f(g(g(1)), g(2))")?;
    /// assert_eq!(sess.apply(&rw, &tm).to_string(), "f(h(g(1)), h(2))");
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn apply(&self, rw: &Rewrite, tm: &Term) -> Term {
        self.transform(tm, |tm| {
            if let Some(sub) = self.matches(&rw.lhs, tm) {
                return Visit::Done(self.substitute(&rw.rhs, &sub));
            }
            match tm {
                Term::Comb(c) if !c.args.is_empty() => Visit::Descend(c, c.args.iter().collect()),
                _ => Visit::Done(tm.clone()),
            }
        })
    }

    /// Rename the meta-variables of a rewrite to `?0`, `?1`, ...
    /// in the order of their first occurrence.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let rw = sess.parse_rewrite("f(?7, ?3) --> g(?3, ?9)")?;
    /// assert_eq!(sess.normalize(&rw).to_string(), "f(?0, ?1) ⟶ g(?1, ?2)");
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn normalize(&self, rw: &Rewrite) -> Rewrite {
        let mut metas = rw.lhs.metas();
        for m in rw.rhs.metas() {
            if !metas.contains(&m) {
                metas.push(m)
            }
        }
        let sub = self.renaming(metas);
        Rewrite::new(self.substitute(&rw.lhs, &sub), self.substitute(&rw.rhs, &sub))
    }

    /// Rename the meta-variables of a pattern like [`Session::normalize`].
    pub(crate) fn normalize_term(&self, tm: &Term) -> Term {
        self.substitute(tm, &self.renaming(tm.metas()))
    }

    fn renaming(&self, metas: Vec<Miller>) -> Subst {
        self.reserve_metas(metas.len());
        let metas = metas.into_iter().enumerate();
        metas.map(|(i, m)| (m, Term::Meta(i))).collect()
    }
}
