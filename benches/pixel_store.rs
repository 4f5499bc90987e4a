use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image_renderer::core::{GpuTexture, PixelStore, TextureUnit, TextureUnits, UploadPolicy};
use image_renderer::TextureBackend;

const SIZES: [(u32, u32); 3] = [(64, 64), (1000, 800), (1920, 1080)];

/// Backend that discards uploads, isolating the locking and copy cost
struct NullBackend {
    width: u32,
    height: u32,
}

impl TextureBackend for NullBackend {
    type Binding = ();

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn upload(&self, pixels: &[u8], _width: u32, _height: u32) {
        black_box(pixels);
    }

    fn binding(&self) -> &() {
        &()
    }
}

/// Benchmark: full RGBA image write
fn bench_write_rgba(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_rgba");

    for (w, h) in SIZES {
        let store = PixelStore::new(w, h).unwrap();
        let image = vec![0x80u8; store.byte_count()];

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", w, h)), &image, |b, image| {
            b.iter(|| store.write_rgba_image(black_box(image)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark: grayscale write with channel expansion
fn bench_write_grayscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_grayscale");

    for (w, h) in SIZES {
        let store = PixelStore::new(w, h).unwrap();
        let luma: Vec<u8> = (0..store.pixel_count()).map(|i| i as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", w, h)), &luma, |b, luma| {
            b.iter(|| store.write_grayscale_image(black_box(luma)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark: copy out of the store
fn bench_read_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_image");

    for (w, h) in SIZES {
        let store = PixelStore::new(w, h).unwrap();
        let mut out = vec![0u8; store.byte_count()];

        group.bench_function(BenchmarkId::from_parameter(format!("{}x{}", w, h)), |b| {
            b.iter(|| {
                store.read_image(&mut out).unwrap();
                black_box(&out);
            })
        });
    }

    group.finish();
}

/// Benchmark: per-frame upload step under both policies with no pending write
fn bench_update_and_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_and_bind");

    for policy in [UploadPolicy::Always, UploadPolicy::OnChange] {
        let store = PixelStore::new(1000, 800).unwrap();
        let backend = NullBackend { width: 1000, height: 800 };
        let texture = GpuTexture::from_parts(store, backend, policy).unwrap();
        let mut units = TextureUnits::new();

        group.bench_function(BenchmarkId::from_parameter(format!("{:?}", policy)), |b| {
            b.iter(|| black_box(texture.update_and_bind(TextureUnit::ZERO, &mut units).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_write_rgba,
    bench_write_grayscale,
    bench_read_image,
    bench_update_and_bind,
);
criterion_main!(benches);
