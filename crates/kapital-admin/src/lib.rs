//! Administration backend for the Melanin Kapital lending platform.
//!
//! The crate scores how complete an SME applicant's business profile and
//! supporting documentation are, keeps scored businesses behind a repository
//! seam, and exposes the workflow over HTTP.

pub mod businesses;
pub mod config;
pub mod error;
pub mod telemetry;
