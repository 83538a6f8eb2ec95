pub mod bot;
pub mod calc;
pub mod commands;
pub mod config;
pub mod delivery;
pub mod error;
pub mod languages;
pub mod pagination;
pub mod retry;
pub mod security;
pub mod server;
pub mod telegram;
pub mod translate;
