//! Relay Daemon - Session registry and log relay
//!
//! This crate provides the runtime pieces of the relay:
//! - `registry` - name-keyed registry of live bot sessions with scoped snapshots
//! - `relay` - `LogRelay`, its configuration and the `tracing` layer feeding it
//! - `console` - a stdout session for running without a chat network
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   events    ┌──────────────┐   handle()   ┌──────────────┐
//! │  RelayLayer  │────────────▶│ relay worker │─────────────▶│   LogRelay   │
//! │  (tracing)   │  (bounded)  │ (tokio task) │              └──────┬───────┘
//! └──────────────┘             └──────────────┘                     │ get / snapshot
//!                                                                   ▼
//!                                                          ┌─────────────────┐
//!                                                          │ SessionRegistry │
//!                                                          └─────────────────┘
//! ```
//!
//! # Panic-Free Guarantees
//!
//! All production code in this crate follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations return `Result` or `Option`
//! - Delivery failures become `Delivery::Failed`, never errors

pub mod console;
pub mod registry;
pub mod relay;
