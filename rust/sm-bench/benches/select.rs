use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use sm_agent::{select_best, ConstantBot, HeuristicBot, SpyMaster};
use sm_oracle::StubOracle;

fn bench_select(c: &mut Criterion) {
    let mut g = c.benchmark_group("sm_agent_select");
    for &n in &[16usize, 1024usize] {
        let (candidates, oracle) = sm_bench::scored_candidates(n, "zebra");
        g.bench_with_input(BenchmarkId::new("select_best", n), &candidates, |b, cand| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(0);
                black_box(select_best(&oracle, "zebra", black_box(cand), &mut rng).ok())
            })
        });
    }
    g.finish();
}

fn bench_get_clue(c: &mut Criterion) {
    let mut g = c.benchmark_group("sm_agent_get_clue");
    let state = sm_bench::state();
    let vocab = sm_bench::vocabulary(512);

    // Every own word expands to the whole vocabulary.
    let related: Vec<String> = vocab.words().iter().cloned().collect();
    let clusters: Vec<Vec<&str>> = related.iter().map(|w| vec![w.as_str()]).collect();
    let cluster_refs: Vec<&[&str]> = clusters.iter().map(Vec::as_slice).collect();
    let mut oracle = StubOracle::new();
    for w in state.own_words() {
        oracle = oracle.with_senses(w, &cluster_refs);
    }

    let mut heuristic = HeuristicBot::new(vocab, state.clone(), oracle, 7, 25);
    let mut constant = ConstantBot::new(state, "dumb");
    let invalid = BTreeSet::new();

    g.bench_function("heuristic", |b| {
        b.iter(|| black_box(heuristic.get_clue(black_box(&invalid)).ok()))
    });
    g.bench_function("constant", |b| {
        b.iter(|| black_box(constant.get_clue(black_box(&invalid)).ok()))
    });
    g.finish();
}

criterion_group!(benches, bench_select, bench_get_clue);
criterion_main!(benches);
