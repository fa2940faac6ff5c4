//! Icebreaker: profile-aware outreach relay.
//!
//! Parses professional profile pages into structured records and fills
//! `[BRACKETED]` message templates through an OpenAI-compatible chat
//! completion backend, with fingerprint-keyed caching and single-flight
//! deduplication of concurrent identical requests.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod sanitize;
