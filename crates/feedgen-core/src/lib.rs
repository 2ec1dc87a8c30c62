//! feedgen-core
//!
//! Core building blocks for feed generation: a `GenerateFeed` command is
//! resolved against the feed, channel and locale stores, the feed's data
//! provider is asked how many batches of work exist, and one `GenerateBatch`
//! command per batch is fanned out onto the command bus.
//!
//! # Modules
//! - **domain**: entities, ids, commands, error taxonomy
//! - **ports**: repository, data provider, command bus, clock and id traits
//! - **typed**: typed message API (`Message`, `MessageHandler`, `HandlerRegistry`)
//!   and the feed type registry
//! - **app**: message handlers, builder, worker group
//! - **queue**: in-memory command bus with retry / dead-letter handling
//! - **impls**: in-memory repositories
//! - **config**: TOML configuration

pub mod domain;
pub mod ports;
pub mod typed;
pub mod app;
pub mod queue;
pub mod impls;
pub mod config;
pub mod observability;
