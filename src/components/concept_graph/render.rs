use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ConceptGraphState, ease_out_cubic};

const BACKGROUND: &str = "#0b0f14";
const EDGE_COLOR: (u8, u8, u8) = (148, 163, 184);
const TEXT_COLOR: (u8, u8, u8) = (230, 237, 246);
const ARROW_SIZE: f64 = 9.0;

// Opacity targets while a selection dims the rest of the graph.
const EDGE_ALPHA: f64 = 0.9;
const EDGE_ALPHA_DIM: f64 = 0.12;
const NODE_ALPHA_DIM: f64 = 0.18;

struct NodeSprite {
	x: f64,
	y: f64,
	radius: f64,
}

pub fn render(state: &ConceptGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut sprites = HashMap::new();
	state.graph.visit_nodes(|node| {
		sprites.insert(
			node.index(),
			NodeSprite {
				x: node.x() as f64,
				y: node.y() as f64,
				radius: node.data.user_data.group.radius(),
			},
		);
	});

	draw_edges(state, ctx, &sprites);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn rgba(color: (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({}, {}, {}, {})", color.0, color.1, color.2, alpha)
}

fn draw_edges(
	state: &ConceptGraphState,
	ctx: &CanvasRenderingContext2d,
	sprites: &HashMap<DefaultNodeIdx, NodeSprite>,
) {
	let t = ease_out_cubic(state.selection.highlight_t);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for edge in state.edges() {
		let (Some(from), Some(to)) = (sprites.get(&edge.from), sprites.get(&edge.to)) else {
			continue;
		};
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		// Edges between two kept nodes stay bright, the rest fade out.
		let kept = state.is_highlighted(edge.from) && state.is_highlighted(edge.to);
		let alpha = if kept {
			EDGE_ALPHA
		} else {
			EDGE_ALPHA - (EDGE_ALPHA - EDGE_ALPHA_DIM) * t
		};

		ctx.set_stroke_style_str(&rgba(EDGE_COLOR, alpha));
		ctx.set_line_width(1.5);
		ctx.begin_path();
		ctx.move_to(from.x + ux * from.radius, from.y + uy * from.radius);
		ctx.line_to(
			to.x - ux * (to.radius + ARROW_SIZE),
			to.y - uy * (to.radius + ARROW_SIZE),
		);
		ctx.stroke();

		ctx.set_fill_style_str(&rgba(EDGE_COLOR, alpha));
		let (tip_x, tip_y) = (to.x - ux * to.radius, to.y - uy * to.radius);
		let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if !edge.label.is_empty() {
			let (mid_x, mid_y) = ((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
			ctx.set_fill_style_str(&rgba(TEXT_COLOR, alpha));
			ctx.set_font("11px sans-serif");
			let _ = ctx.fill_text(&edge.label, mid_x, mid_y - 7.0);
		}
	}
}

fn draw_nodes(state: &ConceptGraphState, ctx: &CanvasRenderingContext2d) {
	let has_highlight = state.has_active_highlight();
	let t = ease_out_cubic(state.selection.highlight_t);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	// Dimmed pass first, highlighted nodes on top.
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let alpha = 1.0 - (1.0 - NODE_ALPHA_DIM) * t;
		draw_node(
			ctx,
			node.x() as f64,
			node.y() as f64,
			node.data.user_data.group.radius(),
			node.data.user_data.group.color(),
			&node.data.user_data.label,
			alpha,
		);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = node.data.user_data.group.radius();
		draw_node(
			ctx,
			x,
			y,
			radius,
			node.data.user_data.group.color(),
			&node.data.user_data.label,
			1.0,
		);

		if state.is_selected(idx) && t > 0.01 {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(3.0),
			));
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 5.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&rgba((255, 255, 255), 0.7 * t));
			ctx.set_line_width(1.5);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	});
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	color: &str,
	label: &str,
	alpha: f64,
) {
	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.35)");
	ctx.set_line_width(1.0);
	ctx.stroke();
	ctx.set_global_alpha(1.0);

	ctx.set_fill_style_str(&rgba(TEXT_COLOR, alpha));
	ctx.set_font("13px sans-serif");
	let _ = ctx.fill_text(label, x, y + radius + 13.0);
}
