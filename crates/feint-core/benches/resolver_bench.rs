use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feint_core::feint_session::{MemorySessionStore, SessionStore, Side, Slot, Zone};
use feint_core::{CombatResolver, DuelConfig, EffectiveStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_resolve(c: &mut Criterion) {
    let resolver = CombatResolver::new();
    let attacker = EffectiveStats {
        damage: 20.0,
        armor: 3.0,
        crit_chance: 0.4,
        crit_multiplier: 3.0,
    };
    let defender = EffectiveStats {
        damage: 13.0,
        armor: 5.0,
        crit_chance: 0.65,
        crit_multiplier: 2.7,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("resolve_exchange", |b| {
        b.iter(|| {
            resolver.resolve(
                black_box(&attacker),
                black_box(&defender),
                Zone::Head,
                Zone::Legs,
                &mut rng,
            )
        })
    });
}

fn bench_full_match(c: &mut Criterion) {
    let config = DuelConfig::default();

    c.bench_function("full_match", |b| {
        b.iter(|| {
            let mut controller = config.build_controller(black_box(7));
            let mut turn = 0usize;
            while !controller.is_over() {
                let attacker = controller.attacker();
                let _ = controller.submit_choice(attacker, Zone::ALL[turn % 3]);
                let _ = controller.submit_choice(attacker.other(), Zone::ALL[(turn + 1) % 3]);
                controller.try_advance();
                turn += 1;
            }
            controller.winner()
        })
    });
}

fn bench_store_cas(c: &mut Criterion) {
    // Alternates a fill and a clear so every CAS sees an empty slot
    let store = MemorySessionStore::new();
    let Ok(id) = store.create_session(Side::Left) else {
        return;
    };

    c.bench_function("memory_store_cas", |b| {
        b.iter(|| {
            let accepted = store.try_set_choice(&id, Slot::One, black_box(Zone::Torso));
            let _ = store.clear_and_rotate(&id, Side::Left);
            accepted
        })
    });
}

criterion_group!(benches, bench_resolve, bench_full_match, bench_store_cas);
criterion_main!(benches);
