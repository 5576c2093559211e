use scalebar_rs::Diagnostics;
use scalebar_rs::api::{ScaleBar, render_bar};
use scalebar_rs::core::{
    LabelStyle, LengthRequest, MinorType, NumberFormat, SegmentRequest, StaticAxis,
    build_segments, optimize_bar_length,
};
use scalebar_rs::render::NullRenderer;
use scalebar_rs::{SizeTier, StyleRegistry};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_optimize_bar_length(c: &mut Criterion) {
    let ranges: Vec<f64> = (1..=1_000).map(|i| f64::from(i) * 137.5).collect();

    c.bench_function("optimize_bar_length_1k", |b| {
        b.iter(|| {
            for &range in &ranges {
                let mut diagnostics = Diagnostics::new();
                let _ = optimize_bar_length(
                    black_box(LengthRequest::default()),
                    black_box(8.0),
                    black_box(range),
                    None,
                    &mut diagnostics,
                );
            }
        })
    });
}

fn bench_build_segments_all_minor(c: &mut Criterion) {
    let request = SegmentRequest {
        bar_max: 2_500.0,
        major_width_in: 0.5,
        major_div: 5,
        minor_div: 4,
        minor_type: MinorType::All,
        label_style: LabelStyle::MinorAll,
        labels: None,
        format: Some(NumberFormat::fixed(2)),
        format_int: true,
    };

    c.bench_function("build_segments_all_minor", |b| {
        b.iter(|| {
            let mut diagnostics = Diagnostics::new();
            let _ = build_segments(black_box(&request), &mut diagnostics);
        })
    });
}

fn bench_render_bar_null_backend(c: &mut Criterion) {
    let axis = StaticAxis::new((0.0, 1_000_000.0), (0.0, 600_000.0), 8.0, 6.0, 100.0)
        .expect("valid axis")
        .with_crs("EPSG:3857");
    let scale_bar =
        ScaleBar::with_defaults(StyleRegistry::new(SizeTier::Medium)).expect("defaults");
    let mut renderer = NullRenderer::default();

    c.bench_function("render_bar_null_backend", |b| {
        b.iter(|| {
            let _ = render_bar(black_box(&axis), &scale_bar, &mut renderer, None)
                .expect("render should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_optimize_bar_length,
    bench_build_segments_all_minor,
    bench_render_bar_null_backend
);
criterion_main!(benches);
