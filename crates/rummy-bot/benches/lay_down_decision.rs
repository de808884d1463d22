use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rummy_bot::controller::TurnController;
use rummy_bot::search::SearchConfig;
use rummy_core::model::card::join_cards;
use rummy_core::model::deck::{Deck, GIN_HAND_SIZE};

fn bench_lay_down(seed: u64, iterations: u32) {
    let mut deck = Deck::shuffled_with_seed(seed);
    let hand = join_cards(&deck.deal(GIN_HAND_SIZE));
    let drawn = deck.deal(1);
    let mut controller =
        TurnController::new("P1", SearchConfig::default().with_iterations(iterations), seed);
    controller.start_game("bench", "P2", &hand);
    let feed = format!("P1 draws {}", join_cards(&drawn));
    let _ = black_box(controller.decide_lay_down(&feed));
}

fn lay_down_decision_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("lay_down_decision");
    for (seed, iterations) in [(1040u64, 0u32), (1040, 1000), (1145, 1000), (2203, 4000)] {
        group.bench_function(format!("seed_{seed}_iters_{iterations}"), |b| {
            b.iter(|| bench_lay_down(seed, iterations))
        });
    }
    group.finish();
}

criterion_group!(benches, lay_down_decision_bench);
criterion_main!(benches);
