//! One module per tool: clap arguments in `mod.rs`, logic in `handler.rs`

pub mod codes;
pub mod helpers;
pub mod inventory;
pub mod label;
pub mod orders;
pub mod price;
pub mod sales;
