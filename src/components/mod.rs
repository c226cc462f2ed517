pub mod concept_graph;
pub mod controls;
pub mod details_panel;
