pub mod computer;
pub mod config;
pub mod domain;
pub mod filter;
