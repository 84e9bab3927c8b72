use criterion::{Criterion, criterion_group, criterion_main};
use wiki_comments_engine::{EditOp, Offset, remap_offsets};

/// One anchor per paragraph and one small edit in every other paragraph, on a
/// page of `paragraphs` paragraphs of 200 characters.
fn generate_page(paragraphs: usize) -> (Vec<Offset>, Vec<EditOp>) {
    let anchors = (0..paragraphs)
        .map(|p| Offset::new(p * 200, p * 200 + 180))
        .collect();

    let mut shift = 0usize;
    let ops = (0..paragraphs)
        .step_by(2)
        .map(|p| {
            let at = p * 200 + 50;
            let op = EditOp::insert(at, at + shift, at + shift + 7).unwrap();
            shift += 7;
            op
        })
        .collect();

    (anchors, ops)
}

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap");

    for paragraphs in [10, 100, 1000] {
        let (anchors, ops) = generate_page(paragraphs);
        group.bench_function(format!("paragraphs_{paragraphs}"), |b| {
            b.iter(|| {
                std::hint::black_box(remap_offsets(
                    std::hint::black_box(&anchors),
                    std::hint::black_box(&ops),
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_remap);
criterion_main!(benches);
