//! Anti-unification, i.e. least general generalisation of terms and rewrites.

use crate::session::Visit;
use crate::term::{Miller, Term};
use crate::{Rewrite, Session, Subst};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;

/// Meta-variables allocated for pairs of mismatching terms.
///
/// Pairs are kept in the order of their allocation.
#[derive(Debug, Default)]
pub struct Env(IndexMap<(Term, Term), Miller, FnvBuildHasher>);

impl Env {
    /// Return the meta-variable allocated for a pair of terms.
    pub fn get(&self, t1: &Term, t2: &Term) -> Option<Miller> {
        self.0.get(&(t1.clone(), t2.clone())).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find a meta-variable among `bound` that was allocated for a pair
    /// sharing exactly one side with the pair that `m` was allocated for.
    fn sibling(&self, m: Miller, bound: &[Miller]) -> Option<Miller> {
        let (a, b) = self.0.iter().find(|(_, m2)| **m2 == m)?.0;
        self.0
            .iter()
            .filter(|(_, m2)| bound.contains(*m2))
            .find(|((a2, b2), _)| (a2 == a) != (b2 == b))
            .map(|(_, m2)| *m2)
    }
}

impl Session {
    /// Compute the least general generalisation of two terms.
    ///
    /// Every pair of mismatching subterms is replaced by a meta-variable;
    /// the same pair is always replaced by the same meta-variable,
    /// also across several calls sharing the same environment.
    ///
    /// ~~~
    /// # use spdiff::{Env, Error, Session};
    /// let sess = Session::new();
    /// let t1 = sess.parse_term("call(f, 42, 42, 1)")?;
    /// let t2 = sess.parse_term("call(f, 10, 10, 2)")?;
    /// let g = sess.generalize(&t1, &t2, &mut Env::default());
    /// assert_eq!(g.to_string(), "call(f, ?0, ?0, ?1)");
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn generalize(&self, t1: &Term, t2: &Term, env: &mut Env) -> Term {
        self.transform((t1, t2), |(t1, t2)| {
            if t1 == t2 {
                return Visit::Done(t1.clone());
            }
            if let Some((c1, c2)) = t1.comparable(t2) {
                return Visit::Descend(c1, c1.args.iter().zip(&c2.args).collect());
            }
            let pair = (t1.clone(), t2.clone());
            let m = *env.0.entry(pair).or_insert_with(|| self.fresh_miller());
            Visit::Done(Term::Meta(m))
        })
    }

    /// Generalise two rewrites.
    ///
    /// Left-hand and right-hand sides are generalised with a shared environment,
    /// such that a pair of mismatching terms occurring on both sides
    /// is replaced by the same meta-variable on both sides.
    ///
    /// The result may be ill-formed, in which case
    /// its unbound meta-variables are rebound if
    /// [`Config::repair`](crate::Config::repair) is set:
    /// an unbound meta-variable standing for a pair `(a, b)` is replaced by
    /// a left-hand side meta-variable standing for `(a, b')` or `(a', b)`.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let rw1 = sess.parse_rewrite("f(1) --> g(1)")?;
    /// let rw2 = sess.parse_rewrite("f(3) --> g(4)")?;
    /// let rw = sess.merge_rewrites(&rw1, &rw2);
    /// assert_eq!(sess.normalize(&rw).to_string(), "f(?0) ⟶ g(?0)");
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn merge_rewrites(&self, rw1: &Rewrite, rw2: &Rewrite) -> Rewrite {
        let mut env = Env::default();
        let lhs = self.generalize(&rw1.lhs, &rw2.lhs, &mut env);
        let rhs = self.generalize(&rw1.rhs, &rw2.rhs, &mut env);
        let rw = Rewrite::new(lhs, rhs);
        if self.config.repair {
            self.repair(rw, &env)
        } else {
            rw
        }
    }

    fn repair(&self, rw: Rewrite, env: &Env) -> Rewrite {
        let unbound = rw.unbound();
        if unbound.is_empty() {
            return rw;
        }
        let bound = rw.lhs.metas();
        let mut sub = Subst::default();
        for m in unbound {
            if let Some(m2) = env.sibling(m, &bound) {
                trace!("rebind ?{} to ?{} in {}", m, m2, rw);
                sub.insert(m, Term::Meta(m2));
            }
        }
        let rhs = self.substitute(&rw.rhs, &sub);
        Rewrite::new(rw.lhs, rhs)
    }
}
