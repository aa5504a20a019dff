//! Command implementations.

pub mod cart;
pub mod menu;
pub mod render;
pub mod shell;
