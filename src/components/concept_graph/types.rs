use serde::Deserialize;

/// Authoring category of a node. Each group carries a fixed fill color and
/// node radius so the dataset never has to spell out styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
	Core,
	Bridge,
	Practice,
	Place,
	Character,
	Book,
}

impl NodeGroup {
	pub fn color(self) -> &'static str {
		match self {
			NodeGroup::Core => "#ffd166",
			NodeGroup::Bridge => "#7aa2ff",
			NodeGroup::Practice => "#8bd3c7",
			NodeGroup::Place => "#b39ddb",
			NodeGroup::Character => "#ff8a65",
			NodeGroup::Book => "#a5d6a7",
		}
	}

	pub fn radius(self) -> f64 {
		match self {
			NodeGroup::Core => 26.0,
			NodeGroup::Character => 24.0,
			NodeGroup::Book => 20.0,
			NodeGroup::Bridge | NodeGroup::Practice | NodeGroup::Place => 18.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConceptNode {
	pub id: String,
	pub label: String,
	pub group: NodeGroup,
	#[serde(default)]
	pub description: String,
}

/// Directed, labeled relationship between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct ConceptEdge {
	pub from: String,
	pub to: String,
	#[serde(default)]
	pub label: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConceptGraphData {
	pub nodes: Vec<ConceptNode>,
	pub edges: Vec<ConceptEdge>,
}

impl ConceptGraphData {
	/// Structural checks that deserialization alone cannot express.
	pub fn validate(&self) -> Result<(), String> {
		let mut seen = std::collections::HashSet::new();
		for node in &self.nodes {
			if node.label.trim().is_empty() {
				return Err(format!("node \"{}\" has an empty label", node.id));
			}
			if !seen.insert(node.id.as_str()) {
				return Err(format!("duplicate node id \"{}\"", node.id));
			}
		}
		Ok(())
	}
}

/// How node positions are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	#[default]
	ForceDirected,
	Hierarchical,
}

/// Requests from the page controls into the canvas component.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphCommand {
	Search(String),
	SetLayout(LayoutMode),
	ResetView,
}

/// Content for the details panel, derived from the current selection.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	pub label: String,
	pub description: String,
	/// Neighbor labels, sorted case-insensitively.
	pub neighbors: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> ConceptGraphData {
		serde_json::from_str(
			r#"{
				"nodes": [
					{ "id": "hozho", "label": "Hozho", "group": "core", "description": "Harmony and balance." },
					{ "id": "chee", "label": "Jim Chee", "group": "character" }
				],
				"edges": [
					{ "from": "chee", "to": "hozho", "label": "seeks" }
				]
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn parses_dataset() {
		let data = sample();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].group, NodeGroup::Core);
		assert_eq!(data.nodes[1].description, "");
		assert_eq!(data.edges[0].label, "seeks");
		assert!(data.validate().is_ok());
	}

	#[test]
	fn rejects_unknown_group() {
		let raw = r#"{ "nodes": [{ "id": "x", "label": "X", "group": "villain" }], "edges": [] }"#;
		assert!(serde_json::from_str::<ConceptGraphData>(raw).is_err());
	}

	#[test]
	fn rejects_duplicate_ids() {
		let mut data = sample();
		data.nodes.push(data.nodes[0].clone());
		let err = data.validate().unwrap_err();
		assert!(err.contains("duplicate"));
	}

	#[test]
	fn rejects_empty_label() {
		let mut data = sample();
		data.nodes[1].label = "  ".into();
		assert!(data.validate().is_err());
	}

	#[test]
	fn group_styling_is_total() {
		for group in [
			NodeGroup::Core,
			NodeGroup::Bridge,
			NodeGroup::Practice,
			NodeGroup::Place,
			NodeGroup::Character,
			NodeGroup::Book,
		] {
			assert!(group.color().starts_with('#'));
			assert!(group.radius() > 0.0);
		}
	}
}
