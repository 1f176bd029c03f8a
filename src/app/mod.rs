//! Application layer: ports, commands, events and the service loop.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
