//! fal.ai queue API integration.

mod client;
mod dto;
mod queue;

pub use client::FalClient;
