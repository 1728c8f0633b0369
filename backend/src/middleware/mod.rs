//! Request middleware.
//!
//! Cross-cutting request concerns; the session gate lives with the HTTP
//! adapter in [`crate::inbound::http::session`].

pub mod trace;

pub use trace::Trace;
