//! Pattern matching.

use crate::term::Term;
use crate::{Session, Subst};

impl Session {
    /// Compute a substitution `sub` such that
    /// `self.substitute(pat, &sub) == *tm`.
    ///
    /// A meta-variable occurring several times in a pattern
    /// has to match equal terms at all its occurrences.
    ///
    /// ~~~
    /// # use spdiff::{Error, Session};
    /// let sess = Session::new();
    /// let pat = sess.parse_term("eq(?0, ?0)")?;
    /// assert!(sess.matches(&pat, &sess.parse_term("eq(f(1), f(1))")?).is_some());
    /// assert!(sess.matches(&pat, &sess.parse_term("eq(f(1), f(2))")?).is_none());
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn matches(&self, pat: &Term, tm: &Term) -> Option<Subst> {
        let mut sub = Subst::default();
        match_pat(pat, tm, &mut sub)?;
        Some(sub)
    }
}

fn match_pat(pat: &Term, tm: &Term, sub: &mut Subst) -> Option<()> {
    let mut pairs = Vec::from([(pat, tm)]);
    while let Some((pat, tm)) = pairs.pop() {
        match pat {
            Term::Meta(m) => match sub.get(m) {
                Some(bound) if bound != tm => return None,
                Some(_) => (),
                None => {
                    sub.insert(*m, tm.clone());
                }
            },
            // a pattern without meta-variables matches only itself
            _ if pat.is_ground() => {
                if pat != tm {
                    return None;
                }
            }
            Term::Comb(p) => {
                // no backtracking: the first mismatching argument fails the whole match
                let t = tm.get_comb().filter(|t| p.comparable(t))?;
                pairs.extend(p.args.iter().zip(&t.args).rev())
            }
            Term::Atom(_) => return None,
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use crate::{Error, Session, Subst, Term};

    #[test]
    fn bind_and_fail() -> Result<(), Error> {
        let sess = Session::new();
        let pat = sess.parse_term("call(f, ?0, ?1)")?;
        let sub = sess.matches(&pat, &sess.parse_term("call(f, 1, g(2))")?).unwrap();
        assert_eq!(sub.get(&0), Some(&Term::int(1)));
        assert_eq!(sub.get(&1), Some(&sess.parse_term("g(2)")?));

        for tm in ["call(g, 1, 2)", "call(f, 1)", "call(f, 1, 2, 3)", "42", "?0"] {
            assert_eq!(sess.matches(&pat, &sess.parse_term(tm)?), None);
        }
        Ok(())
    }

    #[test]
    fn identical_binds_to_itself() -> Result<(), Error> {
        let sess = Session::new();
        let pat = sess.parse_term("f(?0, 1)")?;
        let sub = sess.matches(&pat, &pat).unwrap();
        assert_eq!(sub.get(&0), Some(&Term::Meta(0)));
        assert!(sess.substitute(&pat, &sub).ptr_eq(&pat));
        assert_eq!(sess.matches(&Term::int(1), &Term::int(1)), Some(Subst::default()));
        assert_eq!(sess.matches(&Term::int(1), &Term::str("1")), None);
        Ok(())
    }

    #[test]
    fn repeated_meta_in_term() -> Result<(), Error> {
        let sess = Session::new();
        let pat = sess.parse_term("f(?0, ?0)")?;
        assert_eq!(sess.matches(&pat, &sess.parse_term("f(?0, 5)")?), None);
        assert_eq!(sess.matches(&pat, &sess.parse_term("f(5, ?0)")?), None);
        for s in ["f(?0, ?0)", "f(?1, ?1)", "f(g(?0), g(?0))"] {
            let tm = sess.parse_term(s)?;
            let sub = sess.matches(&pat, &tm).unwrap();
            assert_eq!(sess.substitute(&pat, &sub), tm);
        }
        Ok(())
    }

    #[test]
    fn deep_match() -> Result<(), Error> {
        let sess = Session::new();
        let (mut pat, mut tm) = (Term::Meta(0), Term::int(0));
        for _ in 0..10_000 {
            pat = sess.intern("n", vec![pat])?;
            tm = sess.intern("n", vec![tm])?;
        }
        let sub = sess.matches(&pat, &tm).unwrap();
        assert_eq!(sub.get(&0), Some(&Term::int(0)));
        assert!(sess.substitute(&pat, &sub).ptr_eq(&tm));
        let other = sess.intern("m", vec![Term::int(0)])?;
        assert!(sess.matches(&pat, &sess.intern("n", vec![other])?).is_none());
        Ok(())
    }

    #[test]
    fn match_substitute_inverse() -> Result<(), Error> {
        let sess = Session::new();
        let pat = sess.parse_term("f(?0, g(?1, ?0), [](?2))")?;
        let mut sub = Subst::default();
        sub.insert(0, sess.parse_term("h(1, 2)")?);
        sub.insert(1, Term::str("x"));
        sub.insert(2, sess.parse_term("k")?);
        let tm = sess.substitute(&pat, &sub);
        assert_eq!(sess.matches(&pat, &tm), Some(sub));
        Ok(())
    }
}
