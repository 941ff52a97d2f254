use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizr::bank::{ALL_CATEGORY, Category, Question, QuestionBank};
use quizr::engine::selector::{pick_questions, shuffle};

fn make_bank(categories: usize, per_category: usize) -> QuestionBank {
    let categories = (0..categories)
        .map(|c| Category {
            key: format!("cat{c}"),
            label: format!("Category {c}"),
            questions: (0..per_category)
                .map(|q| Question::new(&format!("Question {c}.{q}"), &["a", "b", "c", "d"], q % 4))
                .collect(),
        })
        .collect();
    QuestionBank::new(categories).expect("benchmark bank is valid")
}

fn bench_shuffle(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut items: Vec<usize> = (0..1000).collect();

    c.bench_function("shuffle (1000 items)", |b| {
        b.iter(|| shuffle(black_box(&mut items), &mut rng))
    });
}

fn bench_pick(c: &mut Criterion) {
    let bank = make_bank(8, 250);
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("pick_questions all (20 of 2000)", |b| {
        b.iter(|| pick_questions(black_box(&bank), ALL_CATEGORY, 20, &mut rng))
    });

    c.bench_function("pick_questions single category (20 of 250)", |b| {
        b.iter(|| pick_questions(black_box(&bank), "cat3", 20, &mut rng))
    });
}

fn bench_builtin(c: &mut Criterion) {
    let bank = QuestionBank::builtin().expect("builtin bank parses");
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("pick_questions builtin all (10)", |b| {
        b.iter(|| pick_questions(black_box(&bank), ALL_CATEGORY, 10, &mut rng))
    });
}

criterion_group!(benches, bench_shuffle, bench_pick, bench_builtin);
criterion_main!(benches);
