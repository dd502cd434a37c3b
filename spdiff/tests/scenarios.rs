use spdiff::{Config, DiffMode, Error, Example, Keep, Outcome, Session};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn examples(sess: &Session, changes: &[(&str, &str)]) -> Result<Vec<Example>, Error> {
    let parse = |(old, new): &(&str, &str)| -> Result<Example, Error> {
        Ok(Example::new(sess.parse_term(old)?, sess.parse_term(new)?))
    };
    changes.iter().map(parse).collect()
}

fn infer(sess: &Session, changes: &[(&str, &str)]) -> Result<(Vec<String>, Outcome), Error> {
    init();
    let examples = examples(sess, changes)?;
    let outcome = sess.merge_diffs(&examples);
    for rw in &outcome.rewrites {
        assert!(rw.is_well_formed());
        for ex in &examples {
            assert!(sess.is_safe(rw, &ex.old, &ex.new), "{} unsafe", rw);
        }
    }
    let rws = outcome.rewrites.iter().map(|rw| rw.to_string()).collect();
    Ok((rws, outcome))
}

#[test]
fn shared_replacement() -> Result<(), Error> {
    let sess = Session::new();
    let changes = [
        ("call(f, 42, 42)", "call(f, 117, 42)"),
        ("call(f, 10, 10)", "call(f, 117, 10)"),
    ];
    let (rws, outcome) = infer(&sess, &changes)?;
    assert_eq!(rws, ["call(f, ?0, ?0) ⟶ call(f, 117, ?0)"]);
    assert!(!outcome.truncated);
    assert_eq!(outcome.stats.patterns, 2);
    assert_eq!(outcome.stats.accepted, 1);
    Ok(())
}

#[test]
fn unrelated_replacements() -> Result<(), Error> {
    let sess = Session::new();
    let changes = [
        ("call(f, 42, 42)", "call(f, 117, 42)"),
        ("call(f, 10, 10)", "call(f, 200, 10)"),
    ];
    let (rws, outcome) = infer(&sess, &changes)?;
    // the new values cannot be expressed in terms of the old ones
    assert!(rws.is_empty());
    assert_eq!(outcome.stats.ill_formed, 1);
    assert!(!outcome.truncated);
    Ok(())
}

#[test]
fn unchanged_terms() -> Result<(), Error> {
    let sess = Session::new();
    let changes = [("f(1, g(2))", "f(1, g(2))"), ("h(3)", "h(3)")];
    let (rws, outcome) = infer(&sess, &changes)?;
    assert!(rws.is_empty());
    assert_eq!(outcome.stats.candidates, 0);
    Ok(())
}

#[test]
fn no_common_pattern() -> Result<(), Error> {
    let sess = Session::new();
    let changes = [("a(1)", "a(2)"), ("b(\"x\")", "b(\"y\")")];
    let exs = examples(&sess, &changes)?;
    assert!(exs.iter().all(|ex| !sess.simple_diffs(&ex.old, &ex.new).is_empty()));

    let (rws, outcome) = infer(&sess, &changes)?;
    assert!(rws.is_empty());
    assert_eq!(outcome.stats.patterns, 0);
    assert_eq!(outcome.stats.candidates, 0);
    Ok(())
}

#[test]
fn relabel_under_context() -> Result<(), Error> {
    let sess = Session::new();
    let changes = [("f(g(1), 5)", "f(h(1), 5)"), ("f(g(2), 6)", "f(h(2), 6)")];
    let (rws, _) = infer(&sess, &changes)?;
    // both rewrites do the same work, so neither subsumes the other
    assert_eq!(rws, ["f(g(?0), ?1) ⟶ f(h(?0), ?1)", "g(?0) ⟶ h(?0)"]);
    Ok(())
}

#[test]
fn keep_maximal_or_minimal() -> Result<(), Error> {
    let changes = [("f(1, 2)", "f(3, 4)")];

    let sess = Session::new();
    let (rws, outcome) = infer(&sess, &changes)?;
    assert_eq!(rws, ["f(1, 2) ⟶ f(3, 4)"]);
    assert_eq!(outcome.stats.accepted, 3);

    let sess = Session::with_config(Config {
        keep: Keep::Minimal,
        ..Config::default()
    });
    let (rws, _) = infer(&sess, &changes)?;
    assert_eq!(rws, ["1 ⟶ 3", "2 ⟶ 4"]);
    Ok(())
}

#[test]
fn minimal_diff_mode() -> Result<(), Error> {
    let changes = [("f(g(1))", "f(1)"), ("f(g(3))", "f(3)")];

    let sess = Session::new();
    let (rws, _) = infer(&sess, &changes)?;
    assert_eq!(rws, ["f(g(?0)) ⟶ f(?0)", "g(?0) ⟶ ?0"]);

    let sess = Session::with_config(Config {
        diffs: DiffMode::Minimal,
        ..Config::default()
    });
    let (rws, _) = infer(&sess, &changes)?;
    assert_eq!(rws, ["g(?0) ⟶ ?0"]);
    Ok(())
}

#[test]
fn exhausted_budget() -> Result<(), Error> {
    let sess = Session::with_config(Config {
        budget: Some(1),
        ..Config::default()
    });
    let changes = [
        ("call(f, 42, 42)", "call(f, 117, 42)"),
        ("call(f, 10, 10)", "call(f, 117, 10)"),
    ];
    let (_, outcome) = infer(&sess, &changes)?;
    assert!(outcome.truncated);

    let sess = Session::with_config(Config {
        budget: None,
        ..Config::default()
    });
    let (rws, outcome) = infer(&sess, &changes)?;
    assert!(!outcome.truncated);
    assert_eq!(rws.len(), 1);
    Ok(())
}

#[test]
fn many_examples() -> Result<(), Error> {
    let sess = Session::new();
    // the changed subterms occur in different contexts
    let context = |i: usize, tm: String| match i % 2 {
        0 => format!("f({tm})"),
        _ => format!("g(w, {tm}, w)"),
    };
    let changes: Vec<(String, String)> = (0..6)
        .map(|i| (context(i, format!("inc(v{i})")), context(i, format!("add(v{i}, 1)"))))
        .collect();
    let changes: Vec<(&str, &str)> = changes.iter().map(|(o, n)| (o.as_str(), n.as_str())).collect();
    let (rws, outcome) = infer(&sess, &changes)?;
    assert_eq!(rws, ["inc(?0) ⟶ add(?0, 1)"]);
    assert!(!outcome.truncated);
    Ok(())
}
