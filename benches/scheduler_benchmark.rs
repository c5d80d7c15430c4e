/*!
 * Scheduler Benchmarks
 *
 * Measure the cost of one scheduling tick under varying ready-queue sizes
 */

use coop_kernel::{NoopWork, ProcessManager};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

fn bench_advance_round_robin(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_round_robin");

    for count in [1usize, 16, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let pm = ProcessManager::builder()
                .with_quantum(Duration::from_secs(3600))
                .build();
            for i in 0..count {
                pm.spawn(format!("bench-{i}"), NoopWork);
            }

            // Every tick yields the running process and dispatches the next
            b.iter(|| black_box(pm.advance()));
        });
    }

    group.finish();
}

fn bench_advance_preempting(c: &mut Criterion) {
    let pm = ProcessManager::builder().with_quantum(Duration::ZERO).build();
    for i in 0..64 {
        pm.spawn(format!("bench-{i}"), NoopWork);
    }

    c.bench_function("advance_preempting", |b| {
        b.iter(|| black_box(pm.advance()));
    });
}

fn bench_block_unblock(c: &mut Criterion) {
    let pm = ProcessManager::new();
    let pids: Vec<_> = (0..256).map(|i| pm.spawn(format!("bench-{i}"), NoopWork)).collect();

    c.bench_function("block_unblock_middle", |b| {
        let pid = pids[pids.len() / 2];
        b.iter(|| {
            black_box(pm.block(pid));
            black_box(pm.unblock(pid));
        });
    });
}

fn bench_list_processes(c: &mut Criterion) {
    let pm = ProcessManager::new();
    for i in 0..64 {
        let parent = pm.spawn(format!("parent-{i}"), NoopWork);
        for j in 0..4 {
            pm.create_child_process(parent, format!("child-{i}-{j}"), NoopWork);
        }
    }

    c.bench_function("list_processes_320", |b| {
        b.iter(|| black_box(pm.list_processes()));
    });
}

criterion_group!(
    benches,
    bench_advance_round_robin,
    bench_advance_preempting,
    bench_block_unblock,
    bench_list_processes
);

criterion_main!(benches);
