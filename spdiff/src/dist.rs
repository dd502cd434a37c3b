//! Tree edit distance.

use crate::term::{RTerm, Term};
use crate::Session;

/// Distance table for two argument lists.
///
/// The entry at `(i, j)` is the distance between
/// the old arguments starting from `i` and
/// the new arguments starting from `j`.
pub(crate) struct Table {
    cols: usize,
    cells: Vec<usize>,
}

impl Table {
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, d: usize) {
        self.cells[i * self.cols + j] = d
    }
}

/// Key of a pair in the memo table, which is the same in both directions.
fn ordered(t1: &Term, t2: &Term) -> (Term, Term) {
    if t1.key() <= t2.key() {
        (t1.clone(), t2.clone())
    } else {
        (t2.clone(), t1.clone())
    }
}

impl Session {
    /// Cost of transforming one term into another.
    ///
    /// Deleting or inserting a term costs its size,
    /// replacing a leaf by a different leaf costs 2,
    /// replacing a leaf by a composite or vice versa costs
    /// one plus the size of the composite, and
    /// relabelling a composite costs 2.
    /// Results are memoised for the whole session.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let t1 = sess.parse_term("call(f, 42, 42)")?;
    /// let t2 = sess.parse_term("call(f, 117, 42)")?;
    /// assert_eq!(sess.edit_dist(&t1, &t2), 2);
    /// assert_eq!(sess.edit_dist(&t1, &t1), 0);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn edit_dist(&self, old: &Term, new: &Term) -> usize {
        // pairs of composites whose distance is yet unknown;
        // a pair is only computed once the distances of all its argument pairs are known
        let mut pairs = Vec::from([(old.clone(), new.clone())]);
        let mut dist = 0;
        while let Some((o, n)) = pairs.pop() {
            let (oc, nc) = match self.known_dist(&o, &n) {
                Ok(d) => {
                    dist = d;
                    continue;
                }
                Err(combs) => combs,
            };
            let args = oc.args.iter().flat_map(|a| nc.args.iter().map(move |b| (a, b)));
            let missing: Vec<_> = args
                .filter(|(a, b)| self.known_dist(a, b).is_err())
                .map(|(a, b)| (a.clone(), b.clone()))
                .collect();
            if missing.is_empty() {
                let relabel = if oc.tag == nc.tag { 0 } else { 2 };
                dist = relabel + self.args_table(&oc.args, &nc.args).get(0, 0);
                self.dist.borrow_mut().insert(ordered(&o, &n), dist);
            } else {
                pairs.push((o.clone(), n.clone()));
                pairs.extend(missing)
            }
        }
        // the initial pair is always the last one to be finished
        dist
    }

    /// Return the distance between two terms if it is known without further work,
    /// otherwise return the two composites.
    fn known_dist<'a>(&self, old: &'a Term, new: &'a Term) -> Result<usize, (&'a RTerm, &'a RTerm)> {
        match (old, new) {
            _ if old == new => Ok(0),
            (Term::Comb(o), Term::Comb(n)) => {
                let d = self.dist.borrow().get(&ordered(old, new)).copied();
                d.ok_or((o, n))
            }
            (Term::Comb(c), _) | (_, Term::Comb(c)) => Ok(1 + c.size),
            _ => Ok(2),
        }
    }

    /// Compute the distances between all suffixes of two argument lists.
    pub(crate) fn args_table(&self, old: &[Term], new: &[Term]) -> Table {
        let (n, m) = (old.len(), new.len());
        let mut table = Table {
            cols: m + 1,
            cells: vec![0; (n + 1) * (m + 1)],
        };
        for i in (0..n).rev() {
            table.set(i, m, table.get(i + 1, m) + old[i].size());
        }
        for j in (0..m).rev() {
            table.set(n, j, table.get(n, j + 1) + new[j].size());
        }
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                let del = old[i].size() + table.get(i + 1, j);
                let ins = new[j].size() + table.get(i, j + 1);
                let sub = self.edit_dist(&old[i], &new[j]) + table.get(i + 1, j + 1);
                table.set(i, j, sub.min(del).min(ins));
            }
        }
        table
    }
}
