//! Networking for the lead server.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` holds the `LeadApi` seam and its reqwest-backed implementation.

pub mod api;
