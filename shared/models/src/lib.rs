//! # ExecBOM Domain Models
//!
//! Data structures for bills of materials imported from spreadsheets.
//!
//! ## Key Models
//!
//! - **BomData**: root of an imported tree
//! - **Block**: top-level grouping, e.g. a project phase
//! - **Section**: grouping within a block, e.g. a sub-assembly
//! - **Item**: one quantified line (module, description, quantity)
//! - **BomSummary**: counts and quantity totals over a tree
//!
//! All models serialize with serde so a tree can be handed to UI or
//! back-end collaborators as JSON without a separate wire format.

pub mod bom;
pub mod quantity;
pub mod summary;


pub use bom::*;
pub use summary::*;
