//! Pipeline performance benchmarks.
//!
//! Measures parsing, filtering, aggregation and chart selection across survey sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use surveyscope::aggregate::{mean_by_category, pivot_mean};
use surveyscope::{
    ChartKind, ChartSelector, Parser, SurveyFields, SurveyTable, WordFrequencies,
    extract_corpus, filter_affirmative,
};

const USER_TYPES: [&str; 3] = ["학생", "교사", "학부모"];
const EMOTIONS: [&str; 4] = ["기쁨", "불안", "무관심", "호기심"];
const FREQUENCIES: [&str; 3] = ["매일", "가끔", "거의 없음"];
const OPINIONS: [&str; 5] = [
    "과제에 도움이 됨",
    "가끔 틀린 답을 줌",
    "수업 준비가 빨라짐",
    "useful for drafting essays",
    "",
];

/// Generate a synthetic survey CSV with the default Korean headers.
fn generate_survey_csv(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data =
        String::from("사용 여부,사용자 유형,감정,사용 빈도,유용성 점수,신뢰도 점수,의견,학년\n");

    for _ in 0..rows {
        let used = if rng.gen_bool(0.7) { "예" } else { "아니오" };
        let score = |rng: &mut StdRng| {
            if rng.gen_bool(0.05) {
                String::new()
            } else {
                rng.gen_range(1..=5).to_string()
            }
        };
        let usefulness = score(&mut rng);
        let trust = score(&mut rng);
        data.push_str(&format!(
            "{},{},{},{},{},{},{},{}학년\n",
            used,
            USER_TYPES[rng.gen_range(0..USER_TYPES.len())],
            EMOTIONS[rng.gen_range(0..EMOTIONS.len())],
            FREQUENCIES[rng.gen_range(0..FREQUENCIES.len())],
            usefulness,
            trust,
            OPINIONS[rng.gen_range(0..OPINIONS.len())],
            rng.gen_range(1..=3),
        ));
    }

    data
}

fn parse(data: &str) -> SurveyTable {
    Parser::new()
        .parse_upload("bench.csv", data.as_bytes())
        .unwrap()
        .0
}

/// Benchmark parsing uploads of various sizes.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_upload");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_survey_csv(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| {
                let parser = Parser::new();
                black_box(parser.parse_upload("bench.csv", data.as_bytes()).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark the usage filter.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_affirmative");

    for rows in [1_000, 10_000].iter() {
        let table = parse(&generate_survey_csv(*rows));

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(filter_affirmative(table, "사용 여부", "예").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark mean and pivot aggregation.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let table = parse(&generate_survey_csv(10_000));
    let filtered = filter_affirmative(&table, "사용 여부", "예").unwrap();

    group.bench_function("mean_by_category", |b| {
        b.iter(|| black_box(mean_by_category(&filtered, "사용자 유형", "유용성 점수").unwrap()))
    });
    group.bench_function("pivot_mean", |b| {
        b.iter(|| black_box(pivot_mean(&filtered, "사용자 유형", "감정", "유용성 점수").unwrap()))
    });

    group.finish();
}

/// Benchmark chart selection per kind.
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_chart");
    let fields = SurveyFields::default();
    let selector = ChartSelector::new(&fields);
    let table = parse(&generate_survey_csv(5_000));
    let filtered = filter_affirmative(&table, "사용 여부", "예").unwrap();

    for kind in ChartKind::ALL {
        group.bench_with_input(BenchmarkId::new("kind", kind.tag()), &kind, |b, &kind| {
            b.iter(|| black_box(selector.select(kind, &filtered, "유용성 점수").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark corpus extraction and word counting.
fn bench_opinions(c: &mut Criterion) {
    let table = parse(&generate_survey_csv(10_000));
    let filtered = filter_affirmative(&table, "사용 여부", "예").unwrap();
    let corpus = extract_corpus(&filtered, "의견").unwrap();

    c.bench_function("extract_corpus", |b| {
        b.iter(|| black_box(extract_corpus(&filtered, "의견").unwrap()))
    });
    c.bench_function("word_frequencies", |b| {
        b.iter(|| black_box(WordFrequencies::from_corpus(&corpus, 200)))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_filter,
    bench_aggregate,
    bench_select,
    bench_opinions
);
criterion_main!(benches);
