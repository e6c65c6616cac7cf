use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataprofile_core::{Dataset, LoadOptions, ProfileReport, ProfileSettings};
use std::fmt::Write;

fn synthetic_tsv(rows: usize) -> String {
    let mut text = String::from("id\tname\tyear\tscore\tgenre\n");
    for i in 0..rows {
        let _ = writeln!(
            text,
            "{}\tperson {}\t{}\t{:.2}\t{}",
            i,
            i,
            1900 + i % 120,
            (i as f64).sin() * 10.0,
            ["drama", "comedy", "horror", "documentary"][i % 4]
        );
    }
    text
}

fn bench_profile(c: &mut Criterion) {
    let text = synthetic_tsv(10_000);
    let dataset = Dataset::from_reader(text.as_bytes(), &LoadOptions::tsv()).unwrap();
    let settings = ProfileSettings::default();

    c.bench_function("load_10k_rows", |b| {
        b.iter(|| Dataset::from_reader(black_box(text.as_bytes()), &LoadOptions::tsv()))
    });

    c.bench_function("profile_10k_rows", |b| {
        b.iter(|| ProfileReport::new(black_box(&dataset), "bench", &settings))
    });

    let report = ProfileReport::new(&dataset, "bench", &settings).unwrap();
    c.bench_function("render_html_10k_rows", |b| b.iter(|| black_box(&report).to_html()));
}

criterion_group!(benches, bench_profile);
criterion_main!(benches);
