//! Domain logic - semantic versions and their identifiers

pub mod ident;
pub mod version;

pub use ident::{IdKind, IdList, ID_SEPARATOR};
pub use version::{SemVer, VERSION_PREFIX};
