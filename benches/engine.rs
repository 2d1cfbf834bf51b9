use criterion::{Criterion, Throughput};
use embhttp::client::Client;
use embhttp::transport::{Close, Connection, Read, Write};

/// In-memory connection backed by a canned response stream. Writes are
/// discarded.
struct ScriptConnection {
    data: Vec<u8>,
    pos: usize,
}

impl ScriptConnection {
    fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
        }
    }
}

impl Read for ScriptConnection {
    type Error = core::convert::Infallible;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for ScriptConnection {
    type Error = core::convert::Infallible;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for ScriptConnection {
    type Error = core::convert::Infallible;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for ScriptConnection {}

fn header_script() -> Vec<u8> {
    let mut script = b"HTTP/1.1 200 OK\r\n".to_vec();
    for i in 0..8 {
        script.extend_from_slice(format!("X-Header-{i}: some moderately long value\r\n").as_bytes());
    }
    script.extend_from_slice(b"Content-Length: 0\r\n\r\n");
    script
}

fn chunked_script() -> Vec<u8> {
    let mut script = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    let payload = [0x42u8; 256];
    for _ in 0..64 {
        script.extend_from_slice(b"100\r\n");
        script.extend_from_slice(&payload);
        script.extend_from_slice(b"\r\n");
    }
    script.extend_from_slice(b"0\r\n\r\n");
    script
}

pub fn bench_receive_headers(c: &mut Criterion) {
    let script = header_script();
    let mut group = c.benchmark_group("receive_headers");
    group.throughput(Throughput::Bytes(script.len() as u64));
    group.bench_function("parse_200_with_headers", |b| {
        b.iter_batched_ref(
            || Client::new(ScriptConnection::new(&script)),
            |client| client.receive_headers().unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_chunked_decode(c: &mut Criterion) {
    let script = chunked_script();
    let mut group = c.benchmark_group("chunked_decode");
    group.throughput(Throughput::Bytes((64 * 256) as u64));
    group.bench_function("decode_64x256", |b| {
        b.iter_batched_ref(
            || {
                let mut client = Client::new(ScriptConnection::new(&script));
                client.receive_headers().unwrap();
                client
            },
            |client| {
                let mut buf = [0u8; 512];
                while client.read_body(&mut buf).unwrap() > 0 {}
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_chunk_encode(c: &mut Criterion) {
    let payload = [0x42u8; 1024];
    let mut group = c.benchmark_group("chunk_encode");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("frame_1k", |b| {
        b.iter_batched_ref(
            || Client::new(ScriptConnection::new(b"")),
            |client| client.send_chunk(&payload).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
