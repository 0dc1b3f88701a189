//! Benchmarks for the custom precompile call path.
//!
//! Compares selector dispatch across method-set sizes against the legacy
//! built-in path.
//!
//! Run with: cargo bench -p ev-revm

use alloy_primitives::{Address, Bytes, FixedBytes};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ev_precompiles::{CustomPrecompile, PrecompileCallError, PrecompileMethod};
use ev_revm::EvEvm;
use revm::primitives::hardfork::SpecId;

const PRECOMPILE: Address = Address::repeat_byte(0xaa);
const CALLER: Address = Address::repeat_byte(0xca);
const ECRECOVER: Address = Address::with_last_byte(1);

/// Host state touched by every executor call so the work is not optimized out.
#[derive(Debug, Default)]
struct Counter {
    calls: u64,
}

fn count(
    _: Address,
    _: Address,
    input: &[u8],
    evm: &mut EvEvm<Counter>,
) -> Result<Bytes, PrecompileCallError> {
    evm.host_mut().calls += 1;
    Ok(Bytes::copy_from_slice(&input[..4]))
}

fn selector(i: u32) -> FixedBytes<4> {
    FixedBytes::from(i.wrapping_mul(0x9e37_79b9).to_be_bytes())
}

/// Builds an EVM whose single custom precompile exposes `methods` selectors.
fn evm_with_methods(methods: u32) -> EvEvm<Counter> {
    let mut evm = EvEvm::new(Counter::default(), SpecId::CANCUN);
    evm.with_custom_precompiled_contracts([CustomPrecompile::new(
        PRECOMPILE,
        (0..methods).map(|i| {
            PrecompileMethod::new(selector(i).to_vec(), 100, i % 2 == 0).with_executor(count)
        }),
        "bench",
    )]);
    evm
}

/// Benchmark dispatch to the last-registered selector, the worst case for a
/// linear scan.
fn bench_custom_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("custom_dispatch");
    group.throughput(Throughput::Elements(1));

    for &methods in &[1u32, 8, 32] {
        let mut evm = evm_with_methods(methods);
        let precompile = evm.precompile(&PRECOMPILE).expect("registered");
        let mut input = selector(methods - 1).to_vec();
        input.extend_from_slice(&[0u8; 64]);

        group.bench_with_input(BenchmarkId::new("last_selector", methods), &input, |b, input| {
            let mut interpreter = evm.interpreter();
            b.iter(|| {
                black_box(interpreter.run_precompiled_contract(
                    CALLER,
                    &precompile,
                    black_box(input),
                    1_000_000,
                    false,
                ))
            })
        });
    }

    group.finish();
}

/// Benchmark the read-only promotion and the rejection of unknown selectors.
fn bench_guarded_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("guarded_paths");
    let mut evm = evm_with_methods(8);
    let precompile = evm.precompile(&PRECOMPILE).expect("registered");
    let view = selector(0).to_vec();
    let unknown = vec![0xff; 4];
    let mut interpreter = evm.interpreter();

    group.bench_function("read_only_view", |b| {
        b.iter(|| {
            black_box(interpreter.run_precompiled_contract(
                CALLER,
                &precompile,
                black_box(&view),
                1_000_000,
                true,
            ))
        })
    });

    group.bench_function("unknown_selector", |b| {
        b.iter(|| {
            black_box(interpreter.run_precompiled_contract(
                CALLER,
                &precompile,
                black_box(&unknown),
                1_000_000,
                false,
            ))
        })
    });

    group.finish();
}

/// Benchmark resolution plus execution through `call_precompile` for both
/// precompile kinds.
fn bench_resolve_and_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_and_call");
    let mut evm = evm_with_methods(8);
    let view = selector(0).to_vec();
    let mut interpreter = evm.interpreter();

    group.bench_function("custom", |b| {
        b.iter(|| {
            black_box(interpreter.call_precompile(
                CALLER,
                PRECOMPILE,
                black_box(&view),
                1_000_000,
                false,
            ))
        })
    });

    // ecrecover on garbage input still exercises the full legacy path.
    let garbage = [0u8; 128];
    group.bench_function("builtin_ecrecover", |b| {
        b.iter(|| {
            black_box(interpreter.call_precompile(
                CALLER,
                ECRECOVER,
                black_box(&garbage),
                1_000_000,
                false,
            ))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_custom_dispatch, bench_guarded_paths, bench_resolve_and_call);
criterion_main!(benches);
