//! Library side of the tabsift command line.

pub mod logging;
pub mod pipeline;
pub mod types;
