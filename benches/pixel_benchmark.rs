//! Pixel path benchmark: serialization and compositing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pulse::{Color, Compositor, Layer, Pixel, PixelBuffer};

/// Create a buffer with random-ish content for benchmarking.
fn create_test_buffer(width: u16, height: u16, seed: u8) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height);
    for y in 0..i32::from(height) {
        for x in 0..i32::from(width) {
            let n = (x + y + i32::from(seed)) as usize;
            let pixel = Pixel::new(
                char::from(b'a' + (n % 26) as u8),
                Color::ALL[n % 8],
                Color::ALL[(n / 8) % 8],
            );
            buffer.set_pixel(x, y, pixel);
        }
    }
    buffer
}

fn serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_to_terminal");

    for (width, height) in [(80, 24), (200, 50)] {
        let buffer = create_test_buffer(width, height, 0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &buffer,
            |b, buffer| b.iter(|| black_box(buffer).render_to_terminal()),
        );
    }

    group.finish();
}

fn composite(c: &mut Criterion) {
    let layers: Vec<PixelBuffer> = (0..4).map(|seed| create_test_buffer(200, 50, seed)).collect();

    c.bench_function("composite_4x200x50", |b| {
        b.iter(|| {
            let mut compositor = Compositor::new();
            for (z, layer) in layers.iter().enumerate() {
                let opacity = if z % 2 == 0 { 1.0 } else { 0.4 };
                compositor.add_layer(Layer::new(layer, z as i32, opacity));
            }
            black_box(compositor.composite())
        })
    });
}

fn draw_lines(c: &mut Criterion) {
    let pixel = Pixel::new('#', Color::Green, Color::Black);

    c.bench_function("draw_line_fan_200x50", |b| {
        b.iter(|| {
            let mut buffer = PixelBuffer::new(200, 50);
            for x in (0..200).step_by(10) {
                buffer.draw_line(100, 25, x, 0, pixel);
                buffer.draw_line(100, 25, x, 49, pixel);
            }
            black_box(buffer)
        })
    });
}

criterion_group!(benches, serialize, composite, draw_lines);
criterion_main!(benches);
