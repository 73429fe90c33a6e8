//! Integration tests driving `alps-setup` against stub tools.
//!
//! The stubs are shell scripts, so these only run on unix.
#![cfg(unix)]

mod common;
mod install_tests;
mod plan_tests;
