//! Common functionality for Ad-Kit.
//!
//! This crate holds everything between the user's three inputs and the
//! rendered ad copy: the form controller, the webhook transport and the
//! normalizer that turns whatever the generation workflow answers into a
//! three-column result.
//!
//! # Modules
//!
//! - [`ad_result`]: Normalized three-column ad copy
//! - [`campaign`]: Campaign request sent to the webhook
//! - [`constants`]: Wire constants and user-facing notices
//! - [`error`]: Error types and error handling utilities
//! - [`form`]: Form controller with validation and busy tracking
//! - [`normalizer`]: Classification and normalization of webhook responses
//! - [`settings`]: Configuration management and validation
//! - [`test_support`]: Testing utilities and mocks
//! - [`transport`]: HTTP transport to the generation webhook

pub mod ad_result;
pub mod campaign;
pub mod constants;
pub mod error;
pub mod form;
pub mod normalizer;
pub mod settings;
pub mod transport;
