//! Inference of rewrites from examples.

use crate::term::Term;
use crate::{DiffMode, Keep, Rewrite, Session};
use fnv::{FnvBuildHasher, FnvHashSet};
use indexmap::IndexSet;

/// Change of an old term to a new term.
#[derive(Clone, Debug)]
pub struct Example {
    pub old: Term,
    pub new: Term,
}

impl Example {
    pub fn new(old: Term, new: Term) -> Self {
        Self { old, new }
    }
}

/// Counters of a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// common patterns of the old terms
    pub patterns: usize,
    /// candidate diffs of all examples that match some common pattern
    pub candidates: usize,
    /// merges computed
    pub visited: usize,
    /// merges discarded for being ill-formed
    pub ill_formed: usize,
    /// complete merges discarded for being unsafe for some example
    pub unsafe_merges: usize,
    /// complete merges that are safe for all examples
    pub accepted: usize,
}

/// Result of a search.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// inferred rewrites, normalised and sorted by their textual form
    pub rewrites: Vec<Rewrite>,
    /// true if the search ran out of budget, making `rewrites` possibly incomplete
    pub truncated: bool,
    pub stats: Stats,
}

/// Number of search steps that may still be taken.
pub(crate) struct Budget {
    left: Option<usize>,
    exhausted: bool,
}

impl Budget {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            left: limit,
            exhausted: false,
        }
    }

    /// Take a step if the budget permits it.
    pub fn tick(&mut self) -> bool {
        match &mut self.left {
            None => true,
            Some(0) => {
                self.exhausted = true;
                false
            }
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

struct Search<'a> {
    examples: &'a [Example],
    budget: Budget,
    stats: Stats,
    /// merges that were already extended, together with
    /// the number of examples that remained to be merged
    seen: FnvHashSet<(usize, Rewrite)>,
    found: IndexSet<Rewrite, FnvBuildHasher>,
}

impl Session {
    /// Infer rewrites that perform the changes of all examples.
    ///
    /// Every returned rewrite is a merge of one diff per example,
    /// where only diffs are considered whose left-hand side
    /// matches some [common pattern](Session::common_patterns) of the old terms.
    /// Every returned rewrite is [safe](Session::is_safe) for every example.
    /// Among these rewrites,
    /// only those that are maximal (or minimal, depending on [`Config::keep`](crate::Config::keep))
    /// with respect to [`Session::is_sub_rewrite`] are kept.
    ///
    /// ~~~
    /// # use spdiff::{Error, Example, Session};
    /// let sess = Session::new();
    /// let examples = [
    ///     ("call(f, 42, 42)", "call(f, 117, 42)"),
    ///     ("call(f, 10, 10)", "call(f, 117, 10)"),
    /// ];
    /// let examples = examples.iter().map(|(old, new)| -> Result<_, Error> {
    ///     Ok(Example::new(sess.parse_term(old)?, sess.parse_term(new)?))
    /// });
    /// let examples = examples.collect::<Result<Vec<_>, _>>()?;
    /// let outcome = sess.merge_diffs(&examples);
    /// assert!(!outcome.truncated);
    /// let rws: Vec<_> = outcome.rewrites.iter().map(|rw| rw.to_string()).collect();
    /// assert_eq!(rws, ["call(f, ?0, ?0) ⟶ call(f, 117, ?0)"]);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn merge_diffs(&self, examples: &[Example]) -> Outcome {
        let mut search = Search {
            examples,
            budget: Budget::new(self.config.budget),
            stats: Stats::default(),
            seen: Default::default(),
            found: Default::default(),
        };

        let olds: Vec<Term> = examples.iter().map(|ex| ex.old.clone()).collect();
        let patterns = self.common_patterns_within(&olds, &mut search.budget);
        search.stats.patterns = patterns.len();

        let candidates: Vec<Vec<Rewrite>> = examples
            .iter()
            .map(|ex| {
                let diffs = self.candidate_diffs(&ex.old, &ex.new);
                let matching = |rw: &Rewrite| patterns.iter().any(|p| self.matches(p, &rw.lhs).is_some());
                let diffs: IndexSet<_, FnvBuildHasher> = diffs.into_iter().filter(matching).collect();
                search.stats.candidates += diffs.len();
                diffs.into_iter().collect()
            })
            .collect();

        if !examples.is_empty() {
            self.fold(&candidates, &mut search);
        }

        let mut rewrites: Vec<Rewrite> = search.found.into_iter().collect();
        rewrites.sort_by_cached_key(|rw| rw.to_string());
        let rewrites = self.filter_subsumed(rewrites, examples);

        let truncated = search.budget.exhausted;
        let stats = search.stats;
        debug!("{:?}, {} rewrites, truncated: {}", stats, rewrites.len(), truncated);
        Outcome {
            rewrites,
            truncated,
            stats,
        }
    }

    fn candidate_diffs(&self, old: &Term, new: &Term) -> Vec<Rewrite> {
        match self.config.diffs {
            DiffMode::Simple => self.simple_diffs(old, new),
            DiffMode::Minimal => {
                let script = self.minimal_diffs(old, new).into_iter();
                script.filter_map(|edit| edit.rewrite().cloned()).collect()
            }
        }
    }

    /// Merge one candidate of every example, in all combinations.
    ///
    /// The search is depth-first; every frame on the stack holds
    /// the merge of the candidates chosen for the first examples and
    /// the position of the next candidate of the following example.
    fn fold(&self, candidates: &[Vec<Rewrite>], search: &mut Search) {
        let mut frames: Vec<(Option<Rewrite>, usize)> = Vec::from([(None, 0)]);
        while let Some((cur, next)) = frames.pop() {
            let depth = frames.len();
            let rw = match candidates[depth].get(next) {
                Some(rw) => rw,
                None => continue,
            };
            if !search.budget.tick() {
                return;
            }
            search.stats.visited += 1;
            let merged = match &cur {
                None => rw.clone(),
                Some(cur) => self.merge_rewrites(cur, rw),
            };
            frames.push((cur, next + 1));
            if merged.lhs.is_meta() {
                trace!("prune {}: left-hand side is a meta-variable", merged);
                continue;
            }
            if !merged.is_well_formed() {
                trace!("prune {}: ill-formed", merged);
                search.stats.ill_formed += 1;
                continue;
            }
            let merged = self.normalize(&merged);
            let left = candidates.len() - depth - 1;
            if left == 0 {
                self.accept(merged, search)
            } else if search.seen.insert((left, merged.clone())) {
                frames.push((Some(merged), 0))
            }
        }
    }

    fn accept(&self, rw: Rewrite, search: &mut Search) {
        let examples = search.examples;
        if examples.iter().all(|ex| self.is_safe(&rw, &ex.old, &ex.new)) {
            trace!("accept {}", rw);
            search.stats.accepted += 1;
            search.found.insert(rw);
        } else {
            trace!("reject {}: unsafe", rw);
            search.stats.unsafe_merges += 1;
        }
    }

    /// Keep only the rewrites that are not strictly subsumed by another rewrite.
    ///
    /// With [`Keep::Maximal`], a rewrite `a` is dropped if
    /// there is a rewrite `b` such that `a` is a sub-rewrite of `b`, but not vice versa.
    /// With [`Keep::Minimal`], the roles of `a` and `b` are swapped.
    /// The order of the remaining rewrites is preserved.
    pub fn filter_subsumed(&self, rewrites: Vec<Rewrite>, examples: &[Example]) -> Vec<Rewrite> {
        let sub: Vec<Vec<bool>> = rewrites
            .iter()
            .map(|a| {
                let sub_of = |b| self.is_sub_rewrite(a, b, examples);
                rewrites.iter().map(sub_of).collect()
            })
            .collect();
        let below = |i: usize, j: usize| sub[i][j] && !sub[j][i];
        let dominated = |i| match self.config.keep {
            Keep::Maximal => (0..rewrites.len()).any(|j| below(i, j)),
            Keep::Minimal => (0..rewrites.len()).any(|j| below(j, i)),
        };
        let keep: Vec<bool> = (0..rewrites.len()).map(|i| !dominated(i)).collect();
        let kept = rewrites.into_iter().zip(keep).filter(|(_, keep)| *keep);
        kept.map(|(rw, _)| rw).collect()
    }
}
