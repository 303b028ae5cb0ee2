use criterion::{criterion_group, criterion_main, Criterion};
use triallist_core::{Cell, Table};
use triallist_gen::{generate_but_not, ColumnSpec, GenerateOpts, MatchKey};

fn word_pool(categories: usize, per_category: usize) -> Table {
    let mut rows = Vec::new();
    for category in 0..categories {
        for i in 0..per_category {
            rows.push(vec![
                Cell::from(category as i64),
                Cell::from(format!("word_{category}_{i}")),
            ]);
        }
    }
    Table::from_rows(vec!["category".into(), "word".into()], rows).unwrap()
}

fn trial_frame(n: usize, categories: usize) -> Table {
    let rows = (0..n)
        .map(|i| vec![Cell::from((i % categories) as i64), Cell::from(i as i64)])
        .collect();
    Table::from_rows(vec!["category".into(), "trial".into()], rows).unwrap()
}

fn bench_grouped(c: &mut Criterion) {
    let frame = trial_frame(600, 6);
    let pool = word_pool(6, 20);
    let opts = GenerateOpts {
        cols: ColumnSpec::from(vec![("word", "foil_word")]),
        seed: Some(4242),
    };
    c.bench_function("generate_but_not_600x6", |b| {
        b.iter(|| {
            let _ = generate_but_not(&frame, &pool, &MatchKey::from("category"), &opts)
                .expect("generate");
        });
    });
}

criterion_group!(benches, bench_grouped);
criterion_main!(benches);
