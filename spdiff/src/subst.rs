//! Substitution of meta-variables.

use crate::session::Visit;
use crate::term::{Miller, Term};
use crate::Session;

/// Map from meta-variables to the terms bound to them.
pub type Subst = im::hashmap::HashMap<Miller, Term, fnv::FnvBuildHasher>;

impl Session {
    /// Replace bound meta-variables in a pattern by their bindings.
    ///
    /// Unbound meta-variables are left untouched.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session, Subst};
    /// let sess = Session::new();
    /// let pat = sess.parse_term("f(?0, ?1, ?0)")?;
    /// let mut sub = Subst::default();
    /// sub.insert(0, sess.parse_term("g(1)")?);
    /// let tm = sess.substitute(&pat, &sub);
    /// assert_eq!(tm, sess.parse_term("f(g(1), ?1, g(1))")?);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn substitute(&self, pat: &Term, sub: &Subst) -> Term {
        if sub.is_empty() {
            return pat.clone();
        }
        self.transform(pat, |pat| match pat {
            Term::Meta(m) => Visit::Done(sub.get(m).cloned().unwrap_or_else(|| pat.clone())),
            Term::Comb(c) if !c.ground => Visit::Descend(c, c.args.iter().collect()),
            _ => Visit::Done(pat.clone()),
        })
    }
}
