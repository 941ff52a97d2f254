pub mod history;
pub mod json_store;
