//! Business entities, free of any actor or transport concerns.

pub mod order;
pub mod principal;
pub mod product;

pub use order::*;
pub use principal::*;
pub use product::*;
