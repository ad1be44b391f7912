//! High-level operations.
//!
//! This module contains the implementation of the link run.

pub mod link;
pub mod normalize;

pub use link::{
    build_linked_packages, install_linked_packages, link_staging, plan_link, LinkOptions, LinkPlan,
    LinkReport,
};
pub use normalize::revert_local_specs;
