use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use peerlink::protocol::{checksum, decode, encode};
use peerlink::{MAX_PAYLOAD, MacAddress, Message, MessageKind};

const SENDER: MacAddress = MacAddress::new([0x24, 0x6F, 0x28, 0xAA, 0xBB, 0xCC]);
const SIZES: [usize; 3] = [11, 64, MAX_PAYLOAD];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/encode");

    for size in SIZES {
        let payload = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| black_box(encode(MessageKind::SensorData, SENDER, 0x0001_2345, payload).unwrap()));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode");

    for size in SIZES {
        let frame = Bytes::from(encode(MessageKind::SensorData, SENDER, 0, &vec![b'x'; size]).unwrap());
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &frame, |b, frame| {
            b.iter(|| black_box(decode(frame.clone()).unwrap()));
        });
    }

    group.finish();
}

fn bench_checksum(c: &mut Criterion) {
    let payload = vec![b'x'; MAX_PAYLOAD];
    let frame = encode(MessageKind::Custom, SENDER, 0, &payload).unwrap();

    c.bench_function("checksum/compute_230b", |b| {
        b.iter(|| {
            black_box(checksum::compute(
                MessageKind::Custom,
                &SENDER,
                0,
                230,
                black_box(&payload),
            ))
        });
    });
    c.bench_function("checksum/verify_243b", |b| {
        b.iter(|| black_box(checksum::verify(black_box(&frame))));
    });
}

fn bench_roundtrip(c: &mut Criterion) {
    let msg = Message::new(MessageKind::Status, SENDER, 7, vec![b'x'; 64]).unwrap();

    c.bench_function("codec/roundtrip_64b", |b| {
        b.iter(|| {
            let encoded = msg.encode();
            black_box(Message::decode(&encoded).unwrap());
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_checksum, bench_roundtrip);
criterion_main!(benches);
