//! Declaration loading and schema definitions
//!
//! The declarative build settings consumed by the profile resolver.

mod loader;
mod schema;

pub use loader::{find_declaration_file, Declaration, CANDIDATE_FILES};
pub use schema::*;
