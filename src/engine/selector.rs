use rand::Rng;

use crate::bank::{Question, QuestionBank};

/// In-place Fisher-Yates: walk from the last index down to 1, swapping each
/// slot with a uniformly chosen slot at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(&mut out, rng);
    out
}

/// Random selection without replacement. Asking for more questions than the
/// pool holds returns the whole pool in random order.
pub fn pick_questions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    category: &str,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool: Vec<Question> = bank.pool(category).into_iter().cloned().collect();
    shuffle(&mut pool, rng);
    pool.truncate(count.min(pool.len()));
    pool
}
