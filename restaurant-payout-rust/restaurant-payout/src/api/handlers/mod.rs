pub mod health;
pub mod withdrawal;

pub use withdrawal::*;
