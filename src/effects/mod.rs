//! Effect system: domain operations and their application.
//!
//! - `DomainOp`: tagged union of every primitive state change
//! - `apply_ops`: applies an op list to a `GameState`, producing a new one
//!
//! Card effects return ops; they never touch state themselves.

mod op;
mod resolver;

pub use op::DomainOp;
pub use resolver::apply_ops;
