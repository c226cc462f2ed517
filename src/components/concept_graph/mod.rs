mod component;
mod layout;
mod loader;
mod render;
mod state;
mod types;

pub use component::ConceptGraphCanvas;
pub use loader::{DataError, load_graph_data};
pub use types::{
	ConceptEdge, ConceptGraphData, ConceptNode, GraphCommand, LayoutMode, NodeDetails, NodeGroup,
};
