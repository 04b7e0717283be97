//! Bitcoin transaction types consumed by the seal protocol.

/// Consensus encoding primitives.
pub mod primitives;

/// Opaque script types.
pub mod script;

/// Legacy transactions.
pub mod transactions;

/// Inputs and outpoints.
pub mod txin;

/// Outputs.
pub mod txout;

pub use script::*;
pub use transactions::*;
pub use txin::*;
pub use txout::*;
