use convmatch::{
    convolve, convolve_sobel_combined, extract_region, match_template, process, trace_at,
    ConvolutionPass, Operation, PointOp, Preset, Raster,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Raster {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
            data.extend_from_slice(&[value, value.wrapping_mul(3), 255 - value, 255]);
        }
    }
    Raster::from_rgba(data, width, height).unwrap()
}

fn bench_convolution(c: &mut Criterion) {
    let image = make_image(256, 256);
    let box3 = Preset::BoxBlur.kernel();
    let gauss9 = Preset::GaussianBlur.at_size(9).unwrap();

    c.bench_function("convolve_box3_256", |b| {
        b.iter(|| black_box(convolve(&image, &box3, true)));
    });
    c.bench_function("convolve_gauss9_256", |b| {
        b.iter(|| black_box(convolve(&image, &gauss9, true)));
    });
    c.bench_function("sobel_combined_256", |b| {
        b.iter(|| black_box(convolve_sobel_combined(&image)));
    });
    c.bench_function("convolution_pass_steps_64", |b| {
        let small = make_image(64, 64);
        b.iter(|| {
            let mut pass = ConvolutionPass::new(&small, &box3, true);
            pass.run_to_end();
            black_box(pass.output())
        });
    });
}

fn bench_point_ops(c: &mut Criterion) {
    let image = make_image(256, 256);
    let op = Operation::Point(PointOp::Contrast { factor: 1.5 });
    c.bench_function("contrast_256", |b| {
        b.iter(|| black_box(process(&image, &op).unwrap()));
    });
    c.bench_function("contrast_trace_at", |b| {
        b.iter(|| black_box(trace_at(&image, &op, 100, 100).unwrap()));
    });
}

fn bench_matching(c: &mut Criterion) {
    let image = make_image(128, 128);
    let template = extract_region(&image, 40, 30, 16, 16).unwrap();
    for metric in [convmatch::Metric::Ncc, convmatch::Metric::Ssd, convmatch::Metric::Sad] {
        c.bench_function(&format!("match_{}_128_tpl16", metric.name()), |b| {
            b.iter(|| black_box(match_template(&image, &template, metric).unwrap()));
        });
    }
}

criterion_group!(benches, bench_convolution, bench_point_ops, bench_matching);
criterion_main!(benches);
