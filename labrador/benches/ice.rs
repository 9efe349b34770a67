use criterion::{criterion_group, criterion_main, Criterion};
use labrador::_internal_test_data::RANDOM_500_BIN_MATRIX;
use labrador::normalization::{IceNormalizer, Normalizer, ScnNormalizer};
use labrador::RAW_COUNT_FIELD;

fn ice_500_bins(c: &mut Criterion) {
    let field = RANDOM_500_BIN_MATRIX.field(RAW_COUNT_FIELD).unwrap();

    c.bench_function("ICE normalize 500 bins", |b| {
        b.iter(|| {
            let normalized = IceNormalizer::default().normalize(field).unwrap();
            assert_eq!(normalized.nnz(), field.nnz());
        })
    });
}

fn scn_500_bins(c: &mut Criterion) {
    let field = RANDOM_500_BIN_MATRIX.field(RAW_COUNT_FIELD).unwrap();

    c.bench_function("SCN normalize 500 bins", |b| {
        b.iter(|| {
            let normalized = ScnNormalizer::default().normalize(field).unwrap();
            assert_eq!(normalized.nnz(), field.nnz());
        })
    });
}

criterion_group!(benches, ice_500_bins, scn_500_bins);
criterion_main!(benches);
