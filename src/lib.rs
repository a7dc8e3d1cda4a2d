//! Gazette - a small read-only blog engine
//!
//! Serves a home page of fresh and popular posts, post detail pages with
//! comments and likes, tag listing pages, and a contacts page. Content is
//! written through external admin tooling; this crate only reads.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
