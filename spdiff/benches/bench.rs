use criterion::{criterion_group, criterion_main, Criterion};
use spdiff::{Example, Session, Term};

/// Build a balanced binary tree of the given depth with numbered leaves.
fn tree(sess: &Session, depth: usize, leaf: &mut i64) -> Term {
    if depth == 0 {
        *leaf += 1;
        return Term::int(*leaf);
    }
    let l = tree(sess, depth - 1, leaf);
    let r = tree(sess, depth - 1, leaf);
    sess.intern(if depth % 2 == 0 { "add" } else { "mul" }, vec![l, r]).unwrap()
}

/// Wrap the old and new term of a change in a context.
fn example(sess: &Session, i: i64) -> Example {
    let parse = |s: String| sess.parse_term(&s).unwrap();
    let old = parse(format!("stmt(x{i}, call(inc, v{i}, {i}), ret(v{i}))"));
    let new = parse(format!("stmt(x{i}, call(add, v{i}, 1, {i}), ret(v{i}))"));
    Example::new(old, new)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("edit_dist", |b| {
        b.iter(|| {
            let sess = Session::new();
            let t1 = tree(&sess, 8, &mut 0);
            let t2 = tree(&sess, 8, &mut 1);
            sess.edit_dist(&t1, &t2)
        })
    });

    c.bench_function("minimal_diffs", |b| {
        let sess = Session::new();
        let t1 = tree(&sess, 7, &mut 0);
        let t2 = tree(&sess, 7, &mut 3);
        b.iter(|| sess.minimal_diffs(&t1, &t2))
    });

    for n in [2, 4, 8] {
        c.bench_function(&format!("merge_diffs{}", n), |b| {
            b.iter(|| {
                let sess = Session::new();
                let examples: Vec<_> = (0..n).map(|i| example(&sess, i)).collect();
                sess.merge_diffs(&examples)
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
