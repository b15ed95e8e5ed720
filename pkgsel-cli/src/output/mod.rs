//! Output formatting for the CLI: label templates, aligned lists and graph
//! formats.

pub mod dot;
pub mod graph;
pub mod graphml;
pub mod table;
pub mod template;

pub use dot::DotOptions;
pub use graph::{write_graph, GraphType};
pub use table::TableBuilder;
pub use template::LabelTemplate;
