use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use wavescope::render::{FigureConfig, FigureRenderer};
use wavescope::spectrum::{AnalyzerConfig, SpectrumAnalyzer};
use wavescope::Waveform;

fn test_wave(seconds: u32) -> Waveform {
    let sr = 44100;
    let samples = (0..sr * seconds)
        .map(|n| {
            let t = n as f64 / sr as f64;
            0.5 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()
                + 0.25 * (2.0 * std::f64::consts::PI * 1750.0 * t).sin()
        })
        .collect();
    Waveform::new(samples, sr).unwrap()
}

fn bench_analysis(c: &mut Criterion) {
    let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let mut group = c.benchmark_group("analysis");

    for seconds in [1, 10] {
        let wave = test_wave(seconds);
        group.bench_with_input(BenchmarkId::new("spectrum", seconds), &wave, |b, wave| {
            b.iter(|| black_box(analyzer.spectrum(wave).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("spectrogram", seconds), &wave, |b, wave| {
            b.iter(|| black_box(analyzer.spectrogram(wave).unwrap()));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let renderer = FigureRenderer::new(FigureConfig::default()).unwrap();
    let wave = test_wave(10);
    let analysis = analyzer.analyze(&wave).unwrap();

    c.benchmark_group("render")
        .sample_size(10)
        .bench_function("figure_png_1400x1200", |b| {
            b.iter(|| black_box(renderer.render_png(&wave, &analysis).unwrap()));
        });
}

criterion_group!(benches, bench_analysis, bench_render);
criterion_main!(benches);
