//! CLI command implementations.

pub mod build;
pub mod check;
pub mod init;
pub mod normalize;
pub mod properties;

pub use build::build_site;
pub use check::check_site;
pub use init::init_project;
pub use normalize::normalize_names;
pub use properties::export_properties;
