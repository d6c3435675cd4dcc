//! Benchmarks for the reflow passes

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use page_reflow::layout::{recalculate, renumber_template};
use page_reflow::{reflow_template, Content, ContentBlock, CutPointSelector, HeightEstimator, Page, ReflowConfig, Template};

fn long_page(id: &str, blocks: usize) -> Page {
    let content = Content::from(
        (0..blocks)
            .map(|i| match i % 12 {
                0 => ContentBlock::heading(1 + (i / 12 % 3) as u8, &format!("Section {}", i)),
                5 => ContentBlock::new(format!(
                    "<div class=\"table-wrapper\" data-height=\"{}\"><table></table></div>",
                    120 + i % 7 * 20
                )),
                _ => ContentBlock::paragraph(&format!(
                    "Paragraph {} carries enough text to wrap across a few lines of the page body. ",
                    i
                )
                .repeat(1 + i % 4)),
            })
            .collect::<Vec<_>>(),
    );
    Page::new(id, content)
}

fn long_document(pages: usize, blocks: usize) -> Template {
    Template::new((0..pages).map(|p| long_page(&format!("page-{}", p), blocks)).collect())
}

fn bench_select_cut_point(c: &mut Criterion) {
    let selector = CutPointSelector::default();
    let heights: Vec<f32> = (0..200).map(|i| 18.0 + (i % 9) as f32 * 11.0).collect();

    c.bench_function("select_cut_point", |b| {
        b.iter(|| black_box(selector.select(black_box(&heights), black_box(960.0))));
    });
}

fn bench_recalculate_order(c: &mut Criterion) {
    let template = reflow_template(long_document(20, 150), ReflowConfig::default(), HeightEstimator::default(), 960.0)
        .unwrap();

    c.bench_function("recalculate_order", |b| {
        b.iter(|| black_box(recalculate(black_box(&template.pages))));
    });
}

fn bench_renumber(c: &mut Criterion) {
    let mut template = long_document(20, 150);
    template.heading_numbering = true;

    c.bench_function("renumber_headings", |b| {
        b.iter(|| renumber_template(black_box(&mut template)));
    });
}

fn bench_reflow_long_document(c: &mut Criterion) {
    let template = long_document(5, 300);

    c.bench_function("reflow_long_document", |b| {
        b.iter(|| {
            let out = reflow_template(
                template.clone(),
                ReflowConfig::default(),
                HeightEstimator::default(),
                960.0,
            );
            black_box(out.unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_select_cut_point,
    bench_recalculate_order,
    bench_renumber,
    bench_reflow_long_document,
);

criterion_main!(benches);
