//! Page components.

pub mod downloads;
pub mod force_graph;
pub mod upload;
