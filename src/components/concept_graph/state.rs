use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::layout;
use super::types::{ConceptGraphData, LayoutMode, NodeDetails, NodeGroup};

/// Extra world-space slop around a node for hit-testing.
pub const HIT_SLOP: f64 = 4.0;
/// Press-to-release travel (screen px) below which a gesture is a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Physics ticks before the view auto-fits once.
const STABILIZATION_TICKS: u32 = 200;
const FOCUS_SCALE: f64 = 1.2;
const FOCUS_DURATION: f64 = 0.5;
const FIT_DURATION: f64 = 0.45;
const FIT_PADDING: f64 = 40.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub label: String,
	pub description: String,
	pub group: NodeGroup,
}

/// Dataset edge resolved to simulation indices, keeping its label.
#[derive(Clone, Debug)]
pub struct EdgeRef {
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub label: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Current selection plus the previous one, kept around so the dim state
/// can fade back out instead of snapping.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
}

#[derive(Clone, Debug)]
struct ViewAnimation {
	from: ViewTransform,
	to: ViewTransform,
	t: f64,
	duration: f64,
}

pub struct ConceptGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub selection: SelectionState,
	pub width: f64,
	pub height: f64,
	pub layout_mode: LayoutMode,
	physics_enabled: bool,
	order: Vec<DefaultNodeIdx>,
	edges: Vec<EdgeRef>,
	view_anim: Option<ViewAnimation>,
	ticks: u32,
	user_interacted: bool,
}

impl ConceptGraphState {
	pub fn new(data: &ConceptGraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 350.0,
			force_spring: 0.04,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut order = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
			let idx = graph.add_node(NodeData {
				x: (160.0 * angle.cos()) as f32,
				y: (160.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.label.clone(),
					description: node.description.clone(),
					group: node.group,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			order.push(idx);
		}

		let mut edges = Vec::new();
		for edge in &data.edges {
			match (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
				(Some(&from), Some(&to)) => {
					graph.add_edge(from, to, EdgeData::default());
					edges.push(EdgeRef {
						from,
						to,
						label: edge.label.clone(),
					});
				}
				_ => log::warn!(
					"edge \"{}\" -> \"{}\" references an unknown node, skipped",
					edge.from,
					edge.to
				),
			}
		}

		Self {
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			selection: SelectionState::default(),
			width,
			height,
			layout_mode: LayoutMode::ForceDirected,
			physics_enabled: true,
			order,
			edges,
			view_anim: None,
			ticks: 0,
			user_interacted: false,
		}
	}

	pub fn edges(&self) -> &[EdgeRef] {
		&self.edges
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// hit radius is in world-space, scales with zoom like nodes
			let radius = node.data.user_data.group.radius() + HIT_SLOP;
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Change the selection. The highlight set is always the selected node
	/// plus its undirected neighbors.
	pub fn select(&mut self, node: Option<DefaultNodeIdx>) {
		if self.selection.node == node {
			return;
		}
		let was_selected = self.selection.node.is_some();

		// Save previous state for fade-out
		if was_selected && node.is_none() {
			self.selection.prev_node = self.selection.node.take();
			self.selection.prev_neighbors = std::mem::take(&mut self.selection.neighbors);
		} else {
			self.selection.prev_node = None;
			self.selection.prev_neighbors.clear();
		}

		self.selection.node = node;
		self.selection.neighbors.clear();

		if let Some(idx) = node {
			for edge in &self.edges {
				if edge.from == idx {
					self.selection.neighbors.insert(edge.to);
				} else if edge.to == idx {
					self.selection.neighbors.insert(edge.from);
				}
			}
		}
	}

	/// Details-panel content for the current selection, neighbor labels
	/// sorted case-insensitively.
	pub fn selection_details(&self) -> Option<NodeDetails> {
		let selected = self.selection.node?;
		let mut label = String::new();
		let mut description = String::new();
		let mut neighbors = Vec::new();
		self.graph.visit_nodes(|node| {
			let idx = node.index();
			if idx == selected {
				label = node.data.user_data.label.clone();
				description = node.data.user_data.description.clone();
			} else if self.selection.neighbors.contains(&idx) {
				neighbors.push(node.data.user_data.label.clone());
			}
		});
		neighbors.sort_by_key(|l| l.to_lowercase());
		Some(NodeDetails {
			label,
			description,
			neighbors,
		})
	}

	/// First node in dataset order whose label contains the query as a
	/// case-insensitive substring. Whitespace-only queries match nothing.
	pub fn find_by_label(&self, query: &str) -> Option<DefaultNodeIdx> {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return None;
		}
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if found.is_none() && node.data.user_data.label.to_lowercase().contains(&query) {
				found = Some(node.index());
			}
		});
		found
	}

	/// Search-and-focus. On a match, selects the node, animates the view
	/// onto it and returns its details; otherwise leaves everything as is.
	pub fn search(&mut self, query: &str) -> Option<NodeDetails> {
		let idx = self.find_by_label(query)?;
		self.select(Some(idx));
		self.focus(idx);
		self.selection_details()
	}

	fn focus(&mut self, idx: DefaultNodeIdx) {
		let mut center = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				center = Some((node.x() as f64, node.y() as f64));
			}
		});
		if let Some((x, y)) = center {
			let to = ViewTransform {
				k: FOCUS_SCALE,
				x: self.width / 2.0 - x * FOCUS_SCALE,
				y: self.height / 2.0 - y * FOCUS_SCALE,
			};
			self.animate_view(to, FOCUS_DURATION);
		}
	}

	/// Frame the whole graph. `duration` of zero applies instantly.
	pub fn fit(&mut self, duration: f64) {
		let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
			return;
		};
		let spread_x = (max_x - min_x) + 2.0 * FIT_PADDING;
		let spread_y = (max_y - min_y) + 2.0 * FIT_PADDING;
		let k = (self.width / spread_x)
			.min(self.height / spread_y)
			.clamp(0.1, 1.0);
		let to = ViewTransform {
			k,
			x: self.width / 2.0 - (min_x + max_x) / 2.0 * k,
			y: self.height / 2.0 - (min_y + max_y) / 2.0 * k,
		};
		if duration > 0.0 {
			self.animate_view(to, duration);
		} else {
			self.transform = to;
			self.view_anim = None;
		}
	}

	fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let radius = node.data.user_data.group.radius();
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x - radius, y - radius, x + radius, y + radius),
				Some((x0, y0, x1, y1)) => (
					x0.min(x - radius),
					y0.min(y - radius),
					x1.max(x + radius),
					y1.max(y + radius),
				),
			});
		});
		bounds
	}

	/// Switch layout mode. Hierarchical anchors every node on layered
	/// positions; force-directed releases them back to the simulation.
	/// Either way the selection clears and the view refits.
	pub fn set_layout(&mut self, mode: LayoutMode) {
		self.layout_mode = mode;
		self.select(None);
		match mode {
			LayoutMode::Hierarchical => {
				let index_of: HashMap<DefaultNodeIdx, usize> = self
					.order
					.iter()
					.enumerate()
					.map(|(i, &idx)| (idx, i))
					.collect();
				let edges: Vec<(usize, usize)> = self
					.edges
					.iter()
					.filter_map(|e| Some((*index_of.get(&e.from)?, *index_of.get(&e.to)?)))
					.collect();
				let positions = layout::layered_positions(self.order.len(), &edges);
				self.graph.visit_nodes_mut(|node| {
					if let Some(&i) = index_of.get(&node.index()) {
						node.data.x = positions[i].0;
						node.data.y = positions[i].1;
						node.data.is_anchor = true;
					}
				});
				self.physics_enabled = false;
			}
			LayoutMode::ForceDirected => {
				self.graph.visit_nodes_mut(|node| node.data.is_anchor = false);
				self.physics_enabled = true;
			}
		}
		self.fit(FIT_DURATION);
	}

	/// Reset control: clear the selection and refit the view.
	pub fn reset_view(&mut self) {
		self.select(None);
		self.fit(FIT_DURATION);
	}

	/// A direct pan/zoom/drag takes priority over any running view
	/// animation and cancels the pending auto-fit.
	pub fn note_interaction(&mut self) {
		self.user_interacted = true;
		self.view_anim = None;
	}

	fn animate_view(&mut self, to: ViewTransform, duration: f64) {
		self.view_anim = Some(ViewAnimation {
			from: self.transform,
			to,
			t: 0.0,
			duration,
		});
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.selection.node == Some(idx)
			|| self.selection.neighbors.contains(&idx)
			|| self.selection.prev_node == Some(idx)
			|| self.selection.prev_neighbors.contains(&idx)
	}

	pub fn is_selected(&self, idx: DefaultNodeIdx) -> bool {
		self.selection.node == Some(idx) || self.selection.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.selection.node.is_some() || self.selection.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		if self.physics_enabled {
			self.graph.update(dt);
			if self.ticks < STABILIZATION_TICKS {
				self.ticks += 1;
				if self.ticks == STABILIZATION_TICKS && !self.user_interacted {
					self.fit(0.0);
				}
			}
		}

		let (target, speed) = if self.selection.node.is_some() {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.selection.highlight_t += (target - self.selection.highlight_t) * speed * dt as f64;
		if self.selection.node.is_none() && self.selection.highlight_t < 0.01 {
			self.selection.highlight_t = 0.0;
			self.selection.prev_node = None;
			self.selection.prev_neighbors.clear();
		}

		if let Some(mut anim) = self.view_anim.take() {
			anim.t = (anim.t + dt as f64 / anim.duration).min(1.0);
			let e = ease_out_cubic(anim.t);
			self.transform = ViewTransform {
				x: anim.from.x + (anim.to.x - anim.from.x) * e,
				y: anim.from.y + (anim.to.y - anim.from.y) * e,
				k: anim.from.k + (anim.to.k - anim.from.k) * e,
			};
			if anim.t < 1.0 {
				self.view_anim = Some(anim);
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::concept_graph::types::{ConceptEdge, ConceptNode};

	fn node(id: &str, label: &str, group: NodeGroup) -> ConceptNode {
		ConceptNode {
			id: id.into(),
			label: label.into(),
			group,
			description: format!("About {label}."),
		}
	}

	fn edge(from: &str, to: &str, label: &str) -> ConceptEdge {
		ConceptEdge {
			from: from.into(),
			to: to.into(),
			label: label.into(),
		}
	}

	fn data() -> ConceptGraphData {
		ConceptGraphData {
			nodes: vec![
				node("harmony", "Harmony", NodeGroup::Core),
				node("chee", "Jim Chee", NodeGroup::Character),
				node("leaphorn", "Joe Leaphorn", NodeGroup::Character),
				node("chaco", "Chaco Canyon", NodeGroup::Place),
			],
			edges: vec![
				edge("chee", "harmony", "seeks"),
				edge("leaphorn", "harmony", "doubts"),
				edge("chee", "leaphorn", "works under"),
			],
		}
	}

	fn state() -> ConceptGraphState {
		ConceptGraphState::new(&data(), 800.0, 600.0)
	}

	#[test]
	fn skips_edges_with_unknown_endpoints() {
		let mut broken = data();
		broken.edges.push(edge("chee", "ghost", "haunts"));
		let s = ConceptGraphState::new(&broken, 800.0, 600.0);
		assert_eq!(s.edges().len(), 3);
	}

	#[test]
	fn selection_highlights_undirected_neighbors() {
		let mut s = state();
		let harmony = s.find_by_label("harmony").unwrap();
		s.select(Some(harmony));
		// both in-edges count as neighbors
		assert_eq!(s.selection.neighbors.len(), 2);
		assert!(s.is_highlighted(harmony));
		let chaco = s.find_by_label("chaco").unwrap();
		assert!(!s.is_highlighted(chaco));
	}

	#[test]
	fn details_list_sorted_neighbor_labels() {
		let mut s = state();
		let chee = s.find_by_label("jim").unwrap();
		s.select(Some(chee));
		let details = s.selection_details().unwrap();
		assert_eq!(details.label, "Jim Chee");
		assert_eq!(details.description, "About Jim Chee.");
		assert_eq!(details.neighbors, vec!["Harmony", "Joe Leaphorn"]);
	}

	#[test]
	fn deselect_keeps_previous_set_for_fade_out() {
		let mut s = state();
		let harmony = s.find_by_label("harmony").unwrap();
		s.select(Some(harmony));
		s.tick(0.1);
		assert!(s.selection.highlight_t > 0.0);
		s.select(None);
		assert!(s.has_active_highlight());
		assert!(s.is_highlighted(harmony));
		// fades out over subsequent ticks
		for _ in 0..100 {
			s.tick(0.1);
		}
		assert!(!s.has_active_highlight());
		assert_eq!(s.selection.highlight_t, 0.0);
	}

	#[test]
	fn search_is_case_insensitive_substring() {
		let s = state();
		assert_eq!(s.find_by_label("LEAP"), s.find_by_label("leaphorn"));
		assert!(s.find_by_label("leap").is_some());
		assert!(s.find_by_label("nothing here").is_none());
	}

	#[test]
	fn search_ignores_blank_queries() {
		let mut s = state();
		assert!(s.find_by_label("   ").is_none());
		assert!(s.search("").is_none());
		assert!(s.selection.node.is_none());
	}

	#[test]
	fn search_prefers_dataset_order() {
		// "o" appears in Harmony (first), Joe Leaphorn and Chaco Canyon.
		let s = state();
		let hit = s.find_by_label("o").unwrap();
		assert_eq!(Some(hit), s.find_by_label("harmony"));
	}

	#[test]
	fn search_selects_and_animates_focus() {
		let mut s = state();
		let details = s.search("chaco").unwrap();
		assert_eq!(details.label, "Chaco Canyon");
		assert!(details.neighbors.is_empty());
		assert!(s.selection.node.is_some());
		let before = s.transform;
		s.tick(0.1);
		assert_ne!(s.transform, before);
		// animation converges on the focus scale
		for _ in 0..20 {
			s.tick(0.1);
		}
		assert!((s.transform.k - 1.2).abs() < 1e-9);
	}

	#[test]
	fn failed_search_leaves_selection_untouched() {
		let mut s = state();
		let harmony = s.find_by_label("harmony").unwrap();
		s.select(Some(harmony));
		assert!(s.search("zzz").is_none());
		assert_eq!(s.selection.node, Some(harmony));
	}

	#[test]
	fn fit_frames_all_nodes() {
		let mut s = state();
		s.fit(0.0);
		let k = s.transform.k;
		assert!(k > 0.0 && k <= 1.0);
		// every node lands inside the viewport after the fit
		s.graph.visit_nodes(|node| {
			let sx = node.x() as f64 * k + s.transform.x;
			let sy = node.y() as f64 * k + s.transform.y;
			assert!(sx >= 0.0 && sx <= 800.0);
			assert!(sy >= 0.0 && sy <= 600.0);
		});
	}

	#[test]
	fn hierarchical_layout_anchors_and_clears_selection() {
		let mut s = state();
		let harmony = s.find_by_label("harmony").unwrap();
		s.select(Some(harmony));
		s.set_layout(LayoutMode::Hierarchical);
		assert!(s.selection.node.is_none());
		let mut anchored = 0;
		let mut positions = Vec::new();
		s.graph.visit_nodes(|node| {
			if node.data.is_anchor {
				anchored += 1;
			}
			positions.push((node.x(), node.y()));
		});
		assert_eq!(anchored, 4);
		// harmony sits a rank right of its predecessors
		let xs: Vec<f32> = positions.iter().map(|p| p.0).collect();
		assert!(xs[0] > xs[1]);

		s.set_layout(LayoutMode::ForceDirected);
		let mut still_anchored = 0;
		s.graph.visit_nodes(|node| {
			if node.data.is_anchor {
				still_anchored += 1;
			}
		});
		assert_eq!(still_anchored, 0);
	}

	#[test]
	fn interaction_cancels_view_animation() {
		let mut s = state();
		let _ = s.search("chaco");
		s.note_interaction();
		let before = s.transform;
		s.tick(0.1);
		assert_eq!(s.transform, before);
	}

	#[test]
	fn stabilization_fits_once_unless_interacted() {
		let off_center = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 0.5,
		};

		let mut s = state();
		s.transform = off_center;
		for _ in 0..STABILIZATION_TICKS {
			s.tick(0.016);
		}
		assert_ne!(s.transform, off_center);

		let mut s = state();
		s.transform = off_center;
		s.note_interaction();
		for _ in 0..STABILIZATION_TICKS {
			s.tick(0.016);
		}
		assert_eq!(s.transform, off_center);
	}

	#[test]
	fn hit_test_respects_group_radius() {
		let mut s = state();
		s.fit(0.0);
		let mut target = None;
		s.graph.visit_nodes(|node| {
			if target.is_none() {
				let sx = node.x() as f64 * s.transform.k + s.transform.x;
				let sy = node.y() as f64 * s.transform.k + s.transform.y;
				target = Some((node.index(), sx, sy));
			}
		});
		let (idx, sx, sy) = target.unwrap();
		assert_eq!(s.node_at_position(sx, sy), Some(idx));
		assert_eq!(s.node_at_position(sx + 500.0, sy + 500.0), None);
	}
}
