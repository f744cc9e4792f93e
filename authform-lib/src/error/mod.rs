//! Error types

mod action;
mod config;
mod schema;
mod server;

pub use action::*;
pub use config::*;
pub use schema::*;
pub use server::*;
