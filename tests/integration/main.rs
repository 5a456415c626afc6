//! Integration Tests
//!
//! End-to-end runs through the public facade:
//! - Command language: tokenizing, matching, suggestions
//! - Round trips: store, import, assert, delete
//! - Sessions: settings files, encryption, metadata logs

mod common;

mod language;
mod round_trips;
mod sessions;
