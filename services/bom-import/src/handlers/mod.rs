pub mod bom;
pub mod health;

pub use bom::*;
pub use health::*;
