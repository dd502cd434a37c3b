//! Safety of rewrites with respect to changes.

use crate::term::Term;
use crate::{Example, Rewrite, Session};

impl Session {
    /// Return true if applying the rewrite to `src` makes
    /// progress towards `tgt` without taking a detour.
    ///
    /// That is the case if the rewrite changes `src` to some term `mid`
    /// such that `d(src, mid) + d(mid, tgt) = d(src, tgt)`,
    /// where `d` is the [edit distance](Session::edit_dist).
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let src = sess.parse_term("f(1, 2)")?;
    /// let tgt = sess.parse_term("f(3, 4)")?;
    /// assert!(sess.is_safe(&sess.parse_rewrite("1 --> 3")?, &src, &tgt));
    /// assert!(!sess.is_safe(&sess.parse_rewrite("1 --> 5")?, &src, &tgt));
    /// // a rewrite that does not apply is never safe
    /// assert!(!sess.is_safe(&sess.parse_rewrite("7 --> 3")?, &src, &tgt));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn is_safe(&self, rw: &Rewrite, src: &Term, tgt: &Term) -> bool {
        let mid = self.apply(rw, src);
        if mid == *src {
            return false;
        }
        let direct = self.edit_dist(src, tgt);
        self.edit_dist(src, &mid) + self.edit_dist(&mid, tgt) == direct
    }

    /// Return true if `rw1` does at most the work of `rw2`
    /// on every example of a change set.
    ///
    /// For every example, `rw1` has to be safe for
    /// the change from the old term to `rw2` applied to the old term.
    pub fn is_sub_rewrite(&self, rw1: &Rewrite, rw2: &Rewrite, examples: &[Example]) -> bool {
        examples.iter().all(|ex| {
            let tgt = self.apply(rw2, &ex.old);
            self.is_safe(rw1, &ex.old, &tgt)
        })
    }
}
