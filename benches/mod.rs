use criterion::{criterion_group, criterion_main};

mod engine;

criterion_group!(
    benches,
    engine::bench_receive_headers,
    engine::bench_chunked_decode,
    engine::bench_chunk_encode
);
criterion_main!(benches);
