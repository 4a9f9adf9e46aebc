//! Command implementations behind the `create-pairs-matrix` and
//! `trigger-tests` binaries.
//!
//! The binaries only parse arguments and set up logging; everything else
//! lives here so it can be driven from tests.

pub mod logging;
pub mod pairs;
pub mod trigger;
