pub mod accounting;
pub mod config;
pub mod shell;
pub mod store;

#[cfg(test)]
mod shell_tests;
