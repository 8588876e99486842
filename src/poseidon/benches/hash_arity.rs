use criterion::{criterion_group, Criterion};
use futures::executor::block_on;
use rand::{thread_rng, Rng};
use std::hint::black_box;
use zkprimitives::poseidon::{Backend, PoseidonEngine};
use zkprimitives::FieldElement;

fn random_element() -> FieldElement {
    let mut bytes = [0u8; 32];
    thread_rng().fill(&mut bytes);
    FieldElement::from(bytes)
}

fn benchmark_hash(c: &mut Criterion) {
    for backend in [Backend::Reference, Backend::Optimized] {
        let engine = block_on(PoseidonEngine::new(backend)).unwrap();
        for arity in [1usize, 2, 5, 14] {
            let inputs: Vec<FieldElement> = (0..arity).map(|_| random_element()).collect();
            c.bench_function(
                &format!("{}/backend={:?} arity={}", module_path!(), backend, arity),
                |b| {
                    b.iter(|| {
                        black_box(engine.hash(&inputs).unwrap());
                    });
                },
            );
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_hash
}
