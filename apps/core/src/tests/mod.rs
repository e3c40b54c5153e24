//! Test Module
//!
//! Cross-module test suite for the faqbot core.
//!
//! ## Test Categories
//! - `dialogue_tests`: conversation scenarios through the responder cascade
//! - `supervisor_tests`: per-conversation sessions behind the supervisor actor
//! - `config_tests`: environment settings and knowledge base files
//! - `integration_tests`: console transport driving the supervisor end to end

pub mod integration_tests;
pub mod supervisor_tests;
