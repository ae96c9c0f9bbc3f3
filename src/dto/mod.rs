pub mod common;
pub mod filter;
pub mod game;
pub mod health;
pub mod report;
pub mod validation;
