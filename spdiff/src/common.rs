//! Patterns common to several terms.

use crate::search::Budget;
use crate::term::Term;
use crate::{Env, Session};
use fnv::{FnvBuildHasher, FnvHashSet};
use indexmap::IndexSet;

/// State of the search for common patterns.
struct Patterns<'s> {
    sess: &'s Session,
    /// patterns that were already extended, together with
    /// the number of subterm lists that remained to be generalised
    seen: FnvHashSet<(usize, Term)>,
    found: IndexSet<Term, FnvBuildHasher>,
}

impl<'s> Patterns<'s> {
    /// Generalise a pattern with one subterm of every remaining list.
    fn extend(&mut self, pat: Term, rest: &[Vec<Term>], budget: &mut Budget) {
        let (head, tail) = match rest.split_first() {
            Some(split) => split,
            None => {
                self.found.insert(pat);
                return;
            }
        };
        if !self.seen.insert((rest.len(), pat.clone())) {
            return;
        }
        for tm in head {
            if !budget.tick() {
                return;
            }
            let gen = self.sess.generalize(&pat, tm, &mut Env::default());
            if gen.is_meta() {
                continue;
            }
            self.extend(self.sess.normalize_term(&gen), tail, budget)
        }
    }
}

impl Session {
    /// Find the patterns that match a subterm of every given term.
    ///
    /// Every pattern is the generalisation of one subterm per term.
    /// Patterns that consist of only a meta-variable are discarded.
    /// Meta-variables in the returned patterns are numbered
    /// in the order of their first occurrence.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let t1 = sess.parse_term("call(f, 42, 42)")?;
    /// let t2 = sess.parse_term("call(f, 10, 10)")?;
    /// let pats = sess.common_patterns(&[t1, t2]);
    /// let pats: Vec<_> = pats.iter().map(|p| p.to_string()).collect();
    /// assert_eq!(pats, ["call(f, ?0, ?0)", "f"]);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn common_patterns(&self, terms: &[Term]) -> Vec<Term> {
        self.common_patterns_within(terms, &mut Budget::new(self.config.budget))
    }

    pub(crate) fn common_patterns_within(&self, terms: &[Term], budget: &mut Budget) -> Vec<Term> {
        let subterms: Vec<Vec<Term>> = terms.iter().map(Term::subterms).collect();
        let (head, tail) = match subterms.split_first() {
            Some(split) => split,
            None => return Vec::new(),
        };
        let mut pats = Patterns {
            sess: self,
            seen: Default::default(),
            found: Default::default(),
        };
        for tm in head {
            if !budget.tick() {
                break;
            }
            if !tm.is_meta() {
                pats.extend(self.normalize_term(tm), tail, budget)
            }
        }
        trace!("{} common patterns", pats.found.len());
        pats.found.into_iter().collect()
    }
}
