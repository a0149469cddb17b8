//! Metas Dashboard - training-goal hierarchy and semaphore engine
//!
//! This crate turns flat target-vs-execution exports into classified goal
//! trees and filtered tables, and serves them to a rendering front-end over
//! a read-only JSON API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
