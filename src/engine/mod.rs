pub mod scoring;
pub mod selector;
