//! Multiple-choice quiz core: question bank, random selection, the
//! home/quiz/review/results state machine, result compilation and the
//! bounded local history. The terminal front-end lives in the binary.

pub mod bank;
pub mod config;
pub mod engine;
pub mod session;
pub mod store;
