//! Cryptography module - digest newtype and proof-of-work hash routing

mod hash;
mod pow;

pub use hash::*;
pub use pow::*;
