//! Plan rendering for humans: indented text and Graphviz DOT.

mod dot;
mod explain;
pub mod format;

pub use dot::to_dot;
pub use explain::explain;
