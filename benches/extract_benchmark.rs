use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ifacegen::lexer::Lexer;
use ifacegen::{extract, parse_source, render, FunctionLibrary, RenderOptions};
use std::hint::black_box as bb;

// =============================================================================
// Corpus
// =============================================================================

const SMALL_SERVICE: &str = r#"
package foo

import "context"

type Entity struct{}

type Foo interface {
    Load(context.Context) (Entity, error)
    Save([]Entity) error
    IsValid() bool
    ValidateMulti(...Entity)
    Multi(p1, p2 string) (r1, r2 string)
}
"#;

const MIXED_FILE: &str = r#"
package store

import (
    "context"
    "io"
    "time"
)

const DefaultTTL = 5 * time.Minute

var ErrNotFound = errors.New("not found")

type Record struct {
    Key     string            `json:"key"`
    Value   []byte            `json:"value"`
    Expires time.Time         `json:"expires"`
    Labels  map[string]string `json:"labels,omitempty"`
}

type Reader interface {
    Get(ctx context.Context, key string) (*Record, error)
    Scan(ctx context.Context, prefix string, fn func(*Record) bool) error
}

type Writer interface {
    Put(ctx context.Context, rec *Record, ttl time.Duration) error
    Delete(ctx context.Context, keys ...string) (int, error)
}

type Store interface {
    Reader
    Writer
    io.Closer
}

func (r *Record) Expired(now time.Time) bool {
    if r.Expires.IsZero() {
        return false
    }
    return now.After(r.Expires)
}

func NewRecord(key string, value []byte) *Record {
    return &Record{Key: key, Value: value, Labels: map[string]string{}}
}
"#;

const TEMPLATE: &str = "{{#each methods}}
func (l *logger{{../name}}) {{name}}({{input_parameters this}}) {{output_parameters this}} {
\t{{return this}} l.s.{{name}}({{input_calls this}})
}
{{/each}}";

/// An interface with `n` methods covering the common parameter shapes.
fn wide_interface(n: usize) -> String {
    let mut src = String::from("package wide\n\nimport \"context\"\n\ntype Wide interface {\n");
    for i in 0..n {
        src.push_str(&format!(
            "\tM{i}(ctx context.Context, id int64, tags []string, opts map[string]*Option) (<-chan Event, error)\n"
        ));
    }
    src.push_str("}\n");
    src
}

fn corpora() -> Vec<(String, String)> {
    vec![
        ("small_service".to_string(), SMALL_SERVICE.to_string()),
        ("mixed_file".to_string(), MIXED_FILE.replace("    io.Closer\n", "")),
        ("wide_100".to_string(), wide_interface(100)),
        ("wide_1000".to_string(), wide_interface(1000)),
    ]
}

// =============================================================================
// Benchmark 1: Lexer, parser, extraction
// =============================================================================

fn bench_front_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_end");

    for (name, input) in corpora() {
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("lex", &name), &input, |b, input| {
            b.iter(|| bb(Lexer::new(bb(input)).count()));
        });

        group.bench_with_input(BenchmarkId::new("parse", &name), &input, |b, input| {
            b.iter(|| bb(parse_source(bb(input)).map(|f| f.decls.len())));
        });

        group.bench_with_input(BenchmarkId::new("extract", &name), &input, |b, input| {
            b.iter(|| bb(extract(Some(bb(input.as_bytes())))));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: Rendering
// =============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for (name, input) in corpora() {
        let Ok(package) = extract(Some(input.as_bytes())) else {
            continue;
        };
        let methods: usize = package.interfaces.iter().map(|i| i.methods.len()).sum();
        group.throughput(Throughput::Elements(methods as u64));

        group.bench_with_input(BenchmarkId::new("decorator", &name), &package, |b, package| {
            b.iter(|| {
                let opts = RenderOptions {
                    template: TEMPLATE.as_bytes().to_vec(),
                    functions: FunctionLibrary::standard(),
                    ..RenderOptions::default()
                };
                bb(render(bb(package), opts))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion registration
// =============================================================================

criterion_group!(benches, bench_front_end, bench_render);
criterion_main!(benches);
