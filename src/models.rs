pub mod api_key;
pub mod audit_log;
pub mod auth;
pub mod error;
pub mod invite;
pub mod list;
pub mod mcp;
pub mod member;
pub mod overview;
pub mod project;
pub mod provider;
pub mod schema;
pub mod settings;
