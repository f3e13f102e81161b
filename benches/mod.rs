use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::http::exchange::bench_chunked_response,
    network::application::http::exchange::bench_content_length_response,
    network::application::http::exchange::bench_encode_request
);
criterion_main!(benches);
