pub mod admin;
pub mod api_keys;
pub mod audit_logs;
pub mod auth;
pub mod error;
pub mod health;
pub mod invites;
pub mod mcp;
pub mod members;
pub mod overview;
pub mod projects;
pub mod providers;
pub mod proxy;
pub mod settings;
