pub mod config;
pub mod fake_auth;
pub mod secret;
pub mod web;
