// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmark for the perspective crop on a small synthetic photo.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use docscan_core::types::{Point, Quad};
use docscan_document::QuadCropper;

/// Crop a slightly skewed page out of a 200x200 image: dark background with a
/// light rectangle from (20, 20) to (180, 180).
fn bench_quad_crop(c: &mut Criterion) {
    let mut img = RgbImage::from_pixel(200, 200, Rgb([30, 30, 30]));
    for y in 20..180 {
        for x in 20..180 {
            img.put_pixel(x, y, Rgb([240, 240, 235]));
        }
    }
    let cropper = QuadCropper::from_dynamic(DynamicImage::ImageRgb8(img));
    let quad = Quad([
        Point::new(22.0, 18.0),
        Point::new(181.0, 24.0),
        Point::new(176.0, 183.0),
        Point::new(19.0, 178.0),
    ]);

    c.bench_function("quad_crop (200x200)", |b| {
        b.iter(|| black_box(cropper.crop(black_box(&quad)).ok()));
    });
}

criterion_group!(benches, bench_quad_crop);
criterion_main!(benches);
