//! Client library for the ChaiTrade lead server.
//!
//! Provides the HTTP API client, the submission flow behind the contact form
//! and the sample-request modal, and the admin dashboard state. Rendering is
//! left to the embedding UI; everything here is plain state plus async calls.

pub mod config;
pub mod net;
pub mod state;
pub mod submission;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;
