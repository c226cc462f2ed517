//! Page controls: label search, layout selector, view reset.

use leptos::ev;
use leptos::prelude::*;

use crate::components::concept_graph::{GraphCommand, LayoutMode};

#[component]
pub fn GraphControls(
	/// Search input contents, owned by the page so reset can clear it.
	query: RwSignal<String>,
	on_command: Callback<GraphCommand>,
) -> impl IntoView {
	let on_keydown = move |ev: ev::KeyboardEvent| {
		if ev.key() == "Enter" {
			on_command.run(GraphCommand::Search(query.get_untracked()));
		}
	};

	let on_layout_change = move |ev: ev::Event| {
		let mode = if event_target_value(&ev) == "hierarchical" {
			LayoutMode::Hierarchical
		} else {
			LayoutMode::ForceDirected
		};
		on_command.run(GraphCommand::SetLayout(mode));
	};

	let on_reset = move |_: ev::MouseEvent| {
		query.set(String::new());
		on_command.run(GraphCommand::ResetView);
	};

	view! {
		<div class="graph-controls">
			<input
				type="text"
				class="search-box"
				placeholder="Search themes\u{2026}"
				prop:value=move || query.get()
				on:input=move |ev| query.set(event_target_value(&ev))
				on:keydown=on_keydown
			/>
			<select class="layout-select" on:change=on_layout_change>
				<option value="physics">"Physics layout"</option>
				<option value="hierarchical">"Hierarchical layout"</option>
			</select>
			<button class="reset-button" on:click=on_reset>
				"Reset"
			</button>
		</div>
	}
}
