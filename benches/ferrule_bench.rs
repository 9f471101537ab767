// Criterion benchmark suite for ferrule.
//
// Run: cargo bench
// Specific group: cargo bench -- compile
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ferrule::api::Regex;
use ferrule::regcomp::compile;
use ferrule::regdef::{RegexOptions, SearchOptions};
use ferrule::regexec::search;
use ferrule::regint::RegexType;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn compile_ok(pattern: &str, options: RegexOptions) -> RegexType {
    compile(pattern, options).expect("compile failed")
}

fn make_log_line(i: usize) -> String {
    format!(
        "2025-06-{:02} {:02}:{:02}:{:02} INFO server[{}] user{}@example.com path=/api/v1/users/{} status=200 duration={}ms\n",
        (i % 28) + 1,
        i % 24,
        i % 60,
        (i * 7) % 60,
        1000 + (i % 50),
        i % 97,
        i * 3,
        (i * 13) % 500,
    )
}

fn make_log_text(num_lines: usize) -> String {
    (0..num_lines).map(make_log_line).collect()
}

// ---------------------------------------------------------------------------
// 1. compile -- measure compilation time
// ---------------------------------------------------------------------------

fn bench_compile(c: &mut Criterion) {
    let patterns: &[(&str, &str)] = &[
        ("literal", "hello world"),
        ("dot_star", "foo.*bar"),
        ("alternation", "alpha|beta|gamma|delta"),
        ("char_class", "[a-zA-Z0-9_]+"),
        ("quantifier", "a{2,5}b+c?d*"),
        ("group", "(abc)+(def)*"),
        ("backref", r"(\w+)\s+\1"),
        ("lookbehind", r"(?<=@)\w+"),
        ("named_capture", r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})"),
    ];

    let mut group = c.benchmark_group("compile");
    for (name, pat) in patterns {
        group.bench_with_input(BenchmarkId::from_parameter(name), pat, |b, pat| {
            b.iter(|| {
                let reg = compile_ok(black_box(pat), RegexOptions::empty());
                black_box(&reg);
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. search -- single search over a short subject
// ---------------------------------------------------------------------------

fn bench_search(c: &mut Criterion) {
    let text = "purple alice-b@google.com monkey dishwasher <b>bold</b> 2026-10-18";
    let cases: &[(&str, &str, RegexOptions)] = &[
        ("literal", "dishwasher", RegexOptions::empty()),
        ("email", r"([\w.-]+)@([\w.-]+)", RegexOptions::empty()),
        ("lazy_tag", "<.*?>", RegexOptions::empty()),
        ("date", r"\d{4}-\d{2}-\d{2}", RegexOptions::empty()),
        ("ignorecase", "DISHWASHER", RegexOptions::IGNORECASE),
        ("lookahead", r"\w+(?=@)", RegexOptions::empty()),
        ("no_match", "zzz", RegexOptions::empty()),
    ];

    let mut group = c.benchmark_group("search");
    for (name, pat, options) in cases {
        let reg = compile_ok(pat, *options);
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| {
                let region = search(&reg, black_box(text.as_bytes()), 0, SearchOptions::empty());
                black_box(region);
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. large_text -- realistic log scanning
// ---------------------------------------------------------------------------

fn bench_large_text(c: &mut Criterion) {
    let text_10k = make_log_text(80);
    let text_50k = make_log_text(400);

    let cases: &[(&str, &str)] = &[
        ("literal_INFO", "INFO"),
        ("timestamp", r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}"),
        ("field_extract", r"duration=(\d+)ms"),
        ("no_match", "CRITICAL_ERROR"),
    ];

    let mut group = c.benchmark_group("large_text");
    for (name, pat) in cases {
        let reg = compile_ok(pat, RegexOptions::empty());
        for (size, text) in [("10k", &text_10k), ("50k", &text_50k)] {
            group.bench_with_input(
                BenchmarkId::new(*name, size),
                text,
                |b, text| {
                    b.iter(|| {
                        let region = search(&reg, black_box(text.as_bytes()), 0, SearchOptions::empty());
                        black_box(region);
                    });
                },
            );
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. find_all / substitute -- whole-subject iteration
// ---------------------------------------------------------------------------

fn bench_iterate(c: &mut Criterion) {
    let text = make_log_text(200);
    let email = Regex::new(r"([\w.-]+)@([\w.-]+)").expect("compile failed");
    let empty = Regex::new(r"\b").expect("compile failed");

    let mut group = c.benchmark_group("iterate");
    group.bench_function("find_iter_email", |b| {
        b.iter(|| black_box(email.find_iter(black_box(&text)).count()));
    });
    group.bench_function("find_iter_word_boundary", |b| {
        b.iter(|| black_box(empty.find_iter(black_box(&text)).count()));
    });
    group.bench_function("replace_all_email", |b| {
        b.iter(|| black_box(email.replace_all(black_box(&text), r"\1@example.com")));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 5. backtracking -- patterns that explore many alternatives
// ---------------------------------------------------------------------------

fn bench_backtracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("backtracking");
    for n in [10usize, 18] {
        let text = "a".repeat(n);
        let reg = compile_ok("(a|aa)*b", RegexOptions::empty());
        group.bench_with_input(BenchmarkId::new("alt_star_fail", n), &text, |b, text| {
            b.iter(|| black_box(search(&reg, black_box(text.as_bytes()), 0, SearchOptions::empty())));
        });
    }
    let text = "x".repeat(10_000);
    let reg = compile_ok(".*y", RegexOptions::empty());
    group.bench_with_input(BenchmarkId::new("dot_star_fail", 100), &text[..100], |b, text| {
        b.iter(|| black_box(search(&reg, black_box(text.as_bytes()), 0, SearchOptions::empty())));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion harness
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_compile,
    bench_search,
    bench_large_text,
    bench_iterate,
    bench_backtracking,
);
criterion_main!(benches);
