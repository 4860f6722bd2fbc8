//! Command implementations

mod sign;

pub use sign::sign;
