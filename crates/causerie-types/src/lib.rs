//! Shared domain types for Causerie.
//!
//! This crate contains the core domain types used across the bot:
//! identities, conversation turns, credentials, gateway and transcription
//! errors, and configuration.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod credential;
pub mod identity;
pub mod llm;
pub mod transcribe;
