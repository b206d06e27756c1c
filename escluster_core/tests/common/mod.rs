pub mod editing_store;
pub mod flaky_store;
