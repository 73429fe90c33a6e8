//! alps-setup-lib: staged installer for ALPS and its pinned Boost dependency.
//!
//! The pipeline, in order:
//! - `provision`: prerequisite packages through the system package manager
//! - `artifact`: the pinned Boost archive, downloaded and extracted once
//! - `source`: the ALPS working copy, cloned or pulled
//! - `environment`: compiler and SDK overrides for the host
//! - `configure`: CMake parameters and the generated build tree
//! - `gate`: operator confirmation before anything compiles
//! - `build`: build, test and install phases
//!
//! `pipeline` sequences them; every external tool runs through `exec`.

pub mod artifact;
pub mod build;
pub mod config;
pub mod configure;
pub mod consts;
pub mod environment;
pub mod exec;
pub mod gate;
pub mod pipeline;
pub mod platform;
pub mod provision;
pub mod source;
pub mod util;

pub use config::SetupConfig;
pub use pipeline::{Outcome, Pipeline, PipelineError, Plan, Report, plan};
