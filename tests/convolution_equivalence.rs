use convmatch::{
    convolve, convolve_at_point, convolve_sobel_combined, ConvolutionPass, Kernel, Preset, Raster,
    Rgba,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_raster(rng: &mut StdRng, width: usize, height: usize) -> Raster {
    let mut data = vec![0u8; width * height * 4];
    for value in &mut data {
        *value = rng.random_range(0..=255);
    }
    Raster::from_rgba(data, width, height).unwrap()
}

fn random_kernel(rng: &mut StdRng, size: usize) -> Kernel {
    let weights = (0..size * size)
        .map(|_| rng.random_range(-2.0..2.0))
        .collect();
    Kernel::from_row_major(size, weights).unwrap()
}

fn gray_ramp(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Raster {
    let mut img = Raster::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            img.set_pixel(x, y, Rgba::gray(f(x, y))).unwrap();
        }
    }
    img
}

#[test]
fn traced_pixel_matches_full_pass() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for (size, width, height) in [(3, 9, 7), (5, 6, 8), (7, 4, 4)] {
        let source = random_raster(&mut rng, width, height);
        let kernel = random_kernel(&mut rng, size);
        for normalize in [false, true] {
            let full = convolve(&source, &kernel, normalize);
            for y in 0..height {
                for x in 0..width {
                    let trace = convolve_at_point(&source, &kernel, x, y, normalize).unwrap();
                    let px = full.get_pixel(x, y).unwrap();
                    assert_eq!(trace.result, px.rgb(), "size={size} at ({x}, {y})");
                    assert_eq!(px.a, source.get_pixel(x, y).unwrap().a);
                }
            }
        }
    }
}

#[test]
fn trace_lists_only_in_bounds_taps_in_kernel_order() {
    let source = gray_ramp(4, 4, |x, y| (x * 10 + y) as u8);
    let kernel = Preset::BoxBlur.kernel();

    let corner = convolve_at_point(&source, &kernel, 0, 0, false).unwrap();
    let positions: Vec<(usize, usize)> = corner
        .steps
        .iter()
        .map(|tap| (tap.position.x, tap.position.y))
        .collect();
    assert_eq!(positions, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);

    let edge = convolve_at_point(&source, &kernel, 3, 1, false).unwrap();
    assert_eq!(edge.steps.len(), 6);

    let inner = convolve_at_point(&source, &kernel, 1, 2, true).unwrap();
    assert_eq!(inner.steps.len(), 9);
    for tap in &inner.steps {
        assert!((tap.kernel_value - 1.0 / 9.0).abs() < 1e-12);
        assert_eq!(Some(tap.pixel), source.get_pixel(tap.position.x, tap.position.y));
    }
    assert_eq!(inner.kernel, kernel.normalized());
}

#[test]
fn out_of_bounds_trace_is_an_error() {
    let source = gray_ramp(4, 4, |x, _| x as u8);
    let kernel = Preset::Sharpen.kernel();
    assert!(convolve_at_point(&source, &kernel, 4, 0, false).is_err());
}

#[test]
fn identity_kernel_reproduces_source() {
    let mut rng = StdRng::seed_from_u64(7);
    let source = random_raster(&mut rng, 11, 5);
    assert_eq!(convolve(&source, &Preset::Identity.kernel(), false), source);
    assert_eq!(convolve(&source, &Kernel::identity(5).unwrap(), true), source);
}

#[test]
fn box_blur_keeps_uniform_interior() {
    let color = Rgba::new(90, 30, 200, 255);
    let source = Raster::filled(6, 5, color).unwrap();
    let out = convolve(&source, &Preset::BoxBlur.kernel(), true);
    for y in 1..4 {
        for x in 1..5 {
            assert_eq!(out.get_pixel(x, y), Some(color));
        }
    }
}

#[test]
fn normalized_box_blur_darkens_borders() {
    let source = gray_ramp(4, 4, |x, y| (10 * x + 40 * y) as u8);
    let out = convolve(&source, &Preset::BoxBlur.kernel(), true);

    // (0 + 10 + 20 + 40 + 50 + 60 + 80 + 90 + 100) / 9
    assert_eq!(out.get_pixel(1, 1), Some(Rgba::gray(50)));
    // Four in-bounds taps, still weighted 1/9 each: (0 + 10 + 40 + 50) / 9
    assert_eq!(out.get_pixel(0, 0), Some(Rgba::gray(11)));
    // (100 + 110 + 140 + 150) / 9 = 55.6
    assert_eq!(out.get_pixel(3, 3), Some(Rgba::gray(56)));
}

#[test]
fn zero_sum_kernel_is_not_normalized() {
    let source = gray_ramp(5, 5, |x, _| (x * 20) as u8);
    let kernel = Preset::EdgeDetect.kernel();
    assert_eq!(convolve(&source, &kernel, true), convolve(&source, &kernel, false));
}

#[test]
fn sobel_combined_detects_vertical_edge() {
    let source = gray_ramp(6, 3, |x, _| if x < 3 { 0 } else { 100 });
    let out = convolve_sobel_combined(&source);
    assert_eq!(out.get_pixel(1, 1), Some(Rgba::gray(0)));
    assert_eq!(out.get_pixel(2, 1), Some(Rgba::gray(255)));
    assert_eq!(out.get_pixel(3, 1), Some(Rgba::gray(255)));
}

#[test]
fn progressive_pass_converges_to_full_pass() {
    let mut rng = StdRng::seed_from_u64(42);
    let source = random_raster(&mut rng, 5, 4);
    let kernel = Preset::GaussianBlur.kernel();
    let expected = convolve(&source, &kernel, true);

    let mut pass = ConvolutionPass::new(&source, &kernel, true);
    assert_eq!(pass.current(), &source);
    assert_eq!(pass.progress(), 0);

    let first = pass.step().unwrap();
    assert_eq!((first.position.x, first.position.y), (0, 0));
    assert_eq!(Some(first.trace.result), expected.get_pixel(0, 0).map(Rgba::rgb));

    for _ in 1..10 {
        pass.step().unwrap();
    }
    assert_eq!(pass.progress(), 50);
    assert_eq!(pass.current().get_pixel(4, 1), expected.get_pixel(4, 1));
    assert_eq!(pass.current().get_pixel(0, 2), source.get_pixel(0, 2));

    pass.run_to_end();
    assert!(pass.is_complete());
    assert!(pass.step().is_none());
    assert_eq!(pass.progress(), 100);

    pass.reset();
    assert_eq!(pass.current(), &source);
    pass.run_to_end();
    assert_eq!(pass.output(), expected);
}
