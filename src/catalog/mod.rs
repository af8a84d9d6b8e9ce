//! Declaration compilation and resource value objects.
//!
//! This module turns a declared environment into the resources that realize
//! it: a directory resource and, when creating, a guarded command execution.

pub mod compile;
pub mod resource;

pub use compile::{compile, exec_name, VenvSpec};
pub use resource::{Ensure, ExecResource, FileResource, Resource};
