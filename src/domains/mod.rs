//! Domains module containing the bridge logic organized by bounded contexts.
//!
//! Dependencies point downwards: `naming` <- `catalog` <- `executor` <-
//! `gateway` <- `router`. `services` sits on top and only provides the
//! built-in handlers.

pub mod catalog;
pub mod executor;
pub mod gateway;
pub mod naming;
pub mod router;
pub mod services;
