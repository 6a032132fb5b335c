use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use otp_core::{Algorithm, OtpParameters, HOTP, TOTP};

const SECRET: &[u8] = b"12345678901234567890";

fn generate_benchmark(c: &mut Criterion) {
    for algorithm in [Algorithm::SHA1, Algorithm::SHA256, Algorithm::SHA512] {
        let parameters = OtpParameters::new(algorithm, 6, SECRET).unwrap();
        c.bench_with_input(
            BenchmarkId::new("generate", algorithm),
            black_box(&parameters),
            |b, p| {
                b.iter(|| {
                    let _code = p.generate(1234567);
                })
            },
        );
    }
}

fn hotp_window_benchmark(c: &mut Criterion) {
    // no match, so the whole window is searched
    for window in [0, 10, 100] {
        let hotp = HOTP::new(Algorithm::SHA1, 6, SECRET, 0, window).unwrap();
        c.bench_with_input(
            BenchmarkId::new("hotp_validate_miss", window),
            black_box(&hotp),
            |b, h| {
                b.iter(|| {
                    let mut hotp = h.clone();
                    let _valid = hotp.validate("abcdef");
                })
            },
        );
    }
}

fn totp_benchmark(c: &mut Criterion) {
    let totp = TOTP::new(Algorithm::SHA1, 6, 30, SECRET).unwrap();
    c.bench_with_input(
        BenchmarkId::new("totp", "validate_at"),
        black_box(&totp),
        |b, t| {
            b.iter(|| {
                let _valid = t.validate_at(1111111109, "081804");
            })
        },
    );
}

criterion_group!(benches, generate_benchmark, hotp_window_benchmark, totp_benchmark);
criterion_main!(benches);
