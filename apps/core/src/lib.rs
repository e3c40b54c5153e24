//! faqbot core: a rule-based enquiry responder.
//!
//! [`brain::Responder`] answers a message given a [`brain::Session`];
//! [`actors::supervisor::SupervisorHandle`] keeps one session per conversation
//! behind an actor so any number of transports can share it.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod transport;

pub use error::AppError;

#[cfg(test)]
mod tests;
