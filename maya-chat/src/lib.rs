pub mod client;
pub mod config;
pub mod controller;
pub mod models;
pub mod repl;
pub mod store;
