use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prayer::{Block, BlockKind, PrayFile, TagList, Windows1252Encoding};

fn agent_file(files: usize, size: usize) -> PrayFile {
    let mut tags = TagList::new();
    tags.push("Agent Type", 0u32);
    tags.push("Dependency Count", files as u32);
    tags.push("Agent Description", "A benchmark agent");
    for i in 0..files {
        tags.push(format!("Dependency {}", i + 1), format!("file{}.c16", i));
        tags.push(format!("Dependency Category {}", i + 1), 2u32);
    }

    let mut file = PrayFile::new();
    file.push(Block::from_body(BlockKind::DockingStationAgent.prefix(), "bench", &tags).unwrap());
    for i in 0..files {
        let body: Vec<u8> = (0..size).map(|x| (x * 7 + i) as u8).collect();
        file.push(Block::new(BlockKind::File.prefix(), format!("file{}.c16", i), body).unwrap());
    }
    file
}

pub fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for size in [64, 1024, 16 * 1024, 256 * 1024].iter() {
        let file = agent_file(8, *size);
        let plain = file.to_bytes(false).unwrap();
        let packed = file.to_bytes(true).unwrap();

        group.throughput(Throughput::Bytes(plain.len() as u64));
        group.bench_with_input(BenchmarkId::new("uncompressed", size), size, |b, &_size| {
            b.iter(|| PrayFile::from_slice(black_box(&plain)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("compressed", size), size, |b, &_size| {
            b.iter(|| PrayFile::from_slice(black_box(&packed)).unwrap())
        });
    }
    group.finish();
}

pub fn encode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for size in [64, 1024, 16 * 1024, 256 * 1024].iter() {
        let file = agent_file(8, *size);
        let len = file.to_bytes(false).unwrap().len();

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("uncompressed", size), size, |b, &_size| {
            b.iter(|| black_box(&file).to_bytes(false).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("compressed", size), size, |b, &_size| {
            b.iter(|| black_box(&file).to_bytes(true).unwrap())
        });
    }
    group.finish();
}

pub fn tags_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tags");
    for count in [1, 16, 256].iter() {
        let tags: TagList = (0..*count)
            .flat_map(|i| {
                [
                    (format!("Int {}", i), prayer::TagValue::from(i as u32)),
                    (format!("Str {}", i), prayer::TagValue::from("Éléonore")),
                ]
            })
            .collect();
        let data = tags.to_bytes().unwrap();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", count), count, |b, &_count| {
            b.iter(|| TagList::from_slice(black_box(&data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("encode", count), count, |b, &_count| {
            b.iter(|| black_box(&tags).to_bytes().unwrap())
        });
    }
    group.finish();
}

pub fn windows1252_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("windows1252");
    for size in [2, 8, 32, 128, 512].iter() {
        let data = vec![b'a'; *size];
        let data2 = vec![0xfe; *size];
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("ascii-to-utf8", size),
            size,
            |b, &_size| b.iter(|| Windows1252Encoding::decode(black_box(&data))),
        );
        group.bench_with_input(BenchmarkId::new("1252-to-utf8", size), size, |b, &_size| {
            b.iter(|| Windows1252Encoding::decode(black_box(&data2)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    decode_benchmark,
    encode_benchmark,
    tags_benchmark,
    windows1252_benchmark
);
criterion_main!(benches);
