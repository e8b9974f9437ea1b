//! Callbridge API Library Crate
//!
//! HTTP surface for outbound call initiation and the telephony provider's signaling
//! callback, plus configuration and session persistence. The `api` binary is a
//! thin wrapper around this library.

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
