mod filter;
mod model;
mod parse;
mod sample;

pub use filter::{FilterCriteria, FilteredView};
pub use model::{Category, GraphSnapshot, Node, Relation, RelationDirection, Rgb};
pub use parse::load_graph_file;
pub use sample::sample_graph;
