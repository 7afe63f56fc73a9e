//! Storage module - header store collaborator and implementations

mod store;
pub mod db;

pub use db::HeaderDb;
pub use store::*;
