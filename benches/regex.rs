use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use sre::Regex;

fn compilation(c: &mut Criterion) {
    c.bench_function("compile_simple", |bench| {
        bench.iter(|| Regex::new(black_box("car?")).unwrap());
    });

    c.bench_function("compile_bounded", |bench| {
        bench.iter(|| Regex::new(black_box(r"(\w+){2,8}@[[:alnum:]]{1,16}\.com")).unwrap());
    });

    c.bench_function("compile_unicode", |bench| {
        bench.iter(|| Regex::new(black_box(r"\p{Greek}+\pN")).unwrap());
    });
}

fn matching(c: &mut Criterion) {
    let haystack = "lorem ipsum dolor sit amet ".repeat(200) + "needle@example.com";

    c.bench_function("is_match_literal", |bench| {
        let re = Regex::new("needle").unwrap();
        bench.iter(|| re.is_match(black_box(&haystack)));
    });

    c.bench_function("captures_email", |bench| {
        let re = Regex::new(r"(\w+)@(\w+)\.com").unwrap();
        bench.iter(|| re.match_index(black_box(&haystack)));
    });

    c.bench_function("no_match_alternation", |bench| {
        let re = Regex::new("foo|bar|baz|qux").unwrap();
        bench.iter(|| re.is_match(black_box(&haystack)));
    });
}

criterion_group!(benches, compilation, matching);
criterion_main!(benches);
