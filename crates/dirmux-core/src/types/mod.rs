//! Core types for Dirmux

mod dispatch;
mod user;

pub use dispatch::*;
pub use user::*;
