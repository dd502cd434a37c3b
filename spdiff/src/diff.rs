//! Differences between an old and a new term.

use crate::term::Term;
use crate::{Rewrite, Session};
use core::fmt::{self, Display};
use std::rc::Rc;

/// Elementary edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// replace a leaf by a term or a term by a leaf
    Replace(Rewrite),
    /// change the tag of a composite, keeping its arguments
    Relabel(Rc<str>, Rc<str>),
    /// delete an argument
    Delete(Term),
    /// insert an argument
    Insert(Term),
}

impl Edit {
    /// Cost of the edit, consistent with [`Session::edit_dist`].
    pub fn cost(&self) -> usize {
        match self {
            Self::Replace(rw) => 1 + rw.lhs.size().max(rw.rhs.size()),
            Self::Relabel(..) => 2,
            Self::Delete(tm) | Self::Insert(tm) => tm.size(),
        }
    }

    pub fn rewrite(&self) -> Option<&Rewrite> {
        match self {
            Self::Replace(rw) => Some(rw),
            _ => None,
        }
    }
}

impl Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Replace(rw) => rw.fmt(f),
            Self::Relabel(from, to) => write!(f, "{} ⟶ {}", from, to),
            Self::Delete(tm) => write!(f, "- {}", tm),
            Self::Insert(tm) => write!(f, "+ {}", tm),
        }
    }
}

impl Session {
    /// Rewrite every differing position of two terms.
    ///
    /// The terms are traversed in pre-order and in lock-step.
    /// Every position where the terms differ yields a rewrite, and
    /// if the terms at that position have the same number of arguments,
    /// their arguments are compared pairwise.
    /// The result therefore also contains redundant, nested rewrites.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let old = sess.parse_term("f(1, g(2))")?;
    /// let new = sess.parse_term("f(1, g(3))")?;
    /// let diffs: Vec<_> = sess.simple_diffs(&old, &new).iter().map(|rw| rw.to_string()).collect();
    /// assert_eq!(diffs, ["f(1, g(2)) ⟶ f(1, g(3))", "g(2) ⟶ g(3)", "2 ⟶ 3"]);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn simple_diffs(&self, old: &Term, new: &Term) -> Vec<Rewrite> {
        let mut diffs = Vec::new();
        let mut stack = Vec::from([(old, new)]);
        while let Some((old, new)) = stack.pop() {
            if old == new {
                continue;
            }
            diffs.push(Rewrite::new(old.clone(), new.clone()));
            let (oargs, nargs) = (old.args(), new.args());
            if oargs.len() == nargs.len() {
                stack.extend(oargs.iter().zip(nargs).rev())
            }
        }
        diffs
    }

    /// Compute an edit script of minimal cost.
    ///
    /// Arguments are aligned as in [`Session::edit_dist`].
    /// When several choices yield the same cost,
    /// aligning two arguments is preferred to deleting an old argument,
    /// which is preferred to inserting a new argument.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let old = sess.parse_term("f(1, x, 2)")?;
    /// let new = sess.parse_term("g(1, 3)")?;
    /// let script = sess.minimal_diffs(&old, &new);
    /// let edits: Vec<_> = script.iter().map(|e| e.to_string()).collect();
    /// assert_eq!(edits, ["f ⟶ g", "x ⟶ 3", "- 2"]);
    /// let cost: usize = script.iter().map(|e| e.cost()).sum();
    /// assert_eq!(cost, sess.edit_dist(&old, &new));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn minimal_diffs(&self, old: &Term, new: &Term) -> Vec<Edit> {
        let mut script = Vec::new();
        let mut steps = Vec::from([Step::Align(old, new)]);
        while let Some(step) = steps.pop() {
            match step {
                Step::Emit(edit) => script.push(edit),
                Step::Align(old, new) => {
                    let level = self.align_edits(old, new, &mut script);
                    steps.extend(level.into_iter().rev())
                }
            }
        }
        script
    }

    /// Emit the edits at the root of two terms, and
    /// return the remaining steps for their arguments in order.
    fn align_edits<'a>(&self, old: &'a Term, new: &'a Term, script: &mut Vec<Edit>) -> Vec<Step<'a>> {
        if old == new {
            return Vec::new();
        }
        let (o, n) = match (old, new) {
            (Term::Comb(o), Term::Comb(n)) => (o, n),
            _ => {
                script.push(Edit::Replace(Rewrite::new(old.clone(), new.clone())));
                return Vec::new();
            }
        };
        if o.tag != n.tag {
            script.push(Edit::Relabel(o.tag.clone(), n.tag.clone()))
        }

        let (oargs, nargs) = (&o.args, &n.args);
        let table = self.args_table(oargs, nargs);
        let mut steps = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < oargs.len() || j < nargs.len() {
            let d = table.get(i, j);
            if i < oargs.len() && j < nargs.len() {
                let sub = self.edit_dist(&oargs[i], &nargs[j]) + table.get(i + 1, j + 1);
                if sub == d {
                    steps.push(Step::Align(&oargs[i], &nargs[j]));
                    i += 1;
                    j += 1;
                    continue;
                }
            }
            if i < oargs.len() && oargs[i].size() + table.get(i + 1, j) == d {
                steps.push(Step::Emit(Edit::Delete(oargs[i].clone())));
                i += 1;
            } else {
                steps.push(Step::Emit(Edit::Insert(nargs[j].clone())));
                j += 1;
            }
        }
        steps
    }
}

/// Pending work when building an edit script.
enum Step<'a> {
    Align(&'a Term, &'a Term),
    Emit(Edit),
}
