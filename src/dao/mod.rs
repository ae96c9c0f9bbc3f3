/// Catalog persistence backends.
pub mod game_store;
/// Storage-level record definitions.
pub mod models;
/// Backend-neutral selection predicates.
pub mod predicate;
/// Storage error types shared by every backend.
pub mod storage;
