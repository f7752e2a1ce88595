#![doc = "log-notifier-core: core logic library for log-notifier."]

//! This crate contains the decoding, templating and relay logic for log-notifier.
//! It has no AWS dependencies: publishing goes through the [`contract::Publisher`] trait,
//! implemented by the binary crate (SNS) and by mocks in tests.
//!
//! # Usage
//! Call [`relay::handle`] with the raw Lambda event, a [`contract::TargetSource`]
//! and a [`contract::Publisher`].

pub mod config;
pub mod contract;
pub mod error;
pub mod message;
pub mod payload;
pub mod relay;
