//! maven-bridge crate
//!
//! This crate is an implementation detail of the `maven-bridge` tool, which presents Hangar and Modrinth
//! projects through a Maven repository layout. Its API is fluid and may change without warning
//! and in a semver-incompatible way.
//!
//! # Module Organization
//!
//! - [`upstream`]: HTTP fetch adapter, response cache, and pagination shared by both platforms
//! - [`hangar`]: Hangar API provider
//! - [`modrinth`]: Modrinth API provider and dependency expansion
//! - [`maven`]: coordinates, group ID policy, and document synthesis
//! - [`repository`]: maps repository paths to typed responses
//! - [`server`]: HTTP front end for the repository
//! - [`config`]: settings loading and validation
//! - [`commands`]: the command-line interface

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod config;

#[doc(hidden)]
pub mod hangar;

#[doc(hidden)]
pub mod maven;

#[doc(hidden)]
pub mod modrinth;

#[doc(hidden)]
pub mod repository;

#[doc(hidden)]
pub mod server;

#[doc(hidden)]
pub mod upstream;

pub use commands::{Host, run};
