//! Business logic and port trait definitions for Causerie.
//!
//! This crate defines the "ports" (gateway, transcriber, transcoder,
//! credential repository traits) that the infrastructure layer implements.
//! It depends only on `causerie-types` -- never on `causerie-infra` or any
//! HTTP/IO crate.

pub mod conversation;
pub mod credential;
pub mod dispatcher;
pub mod gateway;
pub mod transcribe;
