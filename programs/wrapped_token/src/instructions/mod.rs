//! Ledger instructions
//! Each instruction runs the shared ledger and checks backing before commit

pub mod initialize;
pub mod wrap;
pub mod unwrap;
pub mod transfer;
pub mod transfer_from;
pub mod approve;

#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use wrap::*;
#[allow(ambiguous_glob_reexports)]
pub use unwrap::*;
#[allow(ambiguous_glob_reexports)]
pub use transfer::*;
#[allow(ambiguous_glob_reexports)]
pub use transfer_from::*;
#[allow(ambiguous_glob_reexports)]
pub use approve::*;
