use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use whitelist_merkle::{verify_record, Identity, LeafLayout, MerkleTree, Record, IDENTITY_LEN};

fn make_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut bytes = [0u8; IDENTITY_LEN];
            bytes[IDENTITY_LEN - 8..].copy_from_slice(&(i as u64).to_be_bytes());
            Record::new(Identity::new(bytes), (i % 5 + 1) as u64)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let sizes = [1024usize, 16_384, 65_536];
    for &size in &sizes {
        let records = make_records(size);
        let mut group = c.benchmark_group("build_abi");
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter_batched(
                || records.clone(),
                |records| {
                    black_box(MerkleTree::from_records(black_box(&records), LeafLayout::Abi).unwrap());
                },
                BatchSize::SmallInput,
            );
        });
        group.finish();
    }
}

fn bench_proof_and_verify(c: &mut Criterion) {
    let records = make_records(1 << 14);
    let tree = MerkleTree::from_records(&records, LeafLayout::Abi).unwrap();
    let root = tree.root();
    let target = records[records.len() / 3];
    let leaf = target.leaf(LeafLayout::Abi);

    c.bench_function("proof_16k", |b| {
        b.iter(|| black_box(tree.proof(black_box(&leaf)).unwrap()));
    });

    let proof = tree.proof(&leaf).unwrap();
    c.bench_function("verify_16k", |b| {
        b.iter(|| assert!(verify_record(black_box(&target), &root, &proof, LeafLayout::Abi)));
    });
}

fn merkle_benches(c: &mut Criterion) {
    bench_build(c);
    bench_proof_and_verify(c);
}

criterion_group!(benches, merkle_benches);
criterion_main!(benches);
