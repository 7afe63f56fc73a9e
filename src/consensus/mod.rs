//! Consensus module - compact target codec, algorithm registry,
//! chain parameters, and the retarget policy engine

mod algo;
mod compact;
mod error;
mod header;
mod kgw;
mod params;
mod retarget;

pub use algo::*;
pub use compact::*;
pub use error::*;
pub use header::*;
pub use params::*;
pub use retarget::*;
