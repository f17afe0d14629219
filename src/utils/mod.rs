//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `wsamp` application.
//!
//! This module aims to centralize reusable components, such as custom error
//! types and logging setup, to promote code consistency and reduce duplication.

pub mod error;
pub mod logging;
