use criterion::{black_box, criterion_group, criterion_main, Criterion};
use darkpack_core::{
    color::ColorMap,
    recolor::{encode_png, recolor},
};
use image::RgbaImage;

fn sample_png() -> Vec<u8> {
    let mut img = RgbaImage::new(64, 64);
    for (x, y, px) in img.enumerate_pixels_mut() {
        px.0 = if (x + y) % 3 == 0 {
            [0xc6, 0xc6, 0xc6, 255]
        } else if x % 2 == 0 {
            [0x37, 0x37, 0x37, 255]
        } else {
            [x as u8, y as u8, 0, 255]
        };
    }
    encode_png(&img).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let colors = ColorMap::from_pairs([
        ("#c6c6c6", "#343434"),
        ("#373737", "#202020"),
        ("white", "#111111"),
        ("#8b8b8b", "#2a2a2a"),
    ])
    .unwrap();
    let data = sample_png();
    c.bench_function("recolor 64x64", |b| {
        b.iter(|| recolor(black_box(&colors), black_box(&data)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
