//! Typed program tree for Choco
//!
//! The tree produced by the type checker and consumed, in turn, by the
//! lowering passes and the code generator. `visit` holds the shared
//! traversal every pass builds on.

pub mod build;
pub mod ir;
pub mod pretty;
pub mod visit;

pub use ir::*;
pub use visit::{Folder, Visitor};
