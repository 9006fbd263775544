//! Client-side state for the public forms and the admin dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `form` is pure reducer state with no I/O; `dashboard` owns the admin
//! view's fetch/update cycle over a `LeadApi`.

pub mod dashboard;
pub mod form;
