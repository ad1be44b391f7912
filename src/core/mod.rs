//! Core data types: manifests, local packages and errors.

pub mod errors;
pub mod local_package;
pub mod manifest;

pub use errors::LinkError;
pub use local_package::LocalPackage;
pub use manifest::Manifest;
