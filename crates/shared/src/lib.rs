pub mod chat;
pub mod config;
mod config_env;
pub mod lookup;
pub mod models;
pub mod profiles;
