use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::concept_graph::{
	ConceptGraphCanvas, ConceptGraphData, GraphCommand, NodeDetails, load_graph_data,
};
use crate::components::controls::GraphControls;
use crate::components::details_panel::DetailsPanel;

/// Default Home Page: the concept graph with its controls and details panel.
#[component]
pub fn Home() -> impl IntoView {
	let data = RwSignal::new(None::<ConceptGraphData>);
	let load_error = RwSignal::new(None::<String>);
	let details = RwSignal::new(None::<NodeDetails>);
	let commands = RwSignal::new(Vec::<GraphCommand>::new());
	let query = RwSignal::new(String::new());

	// The dataset is a static asset, fetched once.
	spawn_local(async move {
		match load_graph_data("data.json").await {
			Ok(loaded) => data.set(Some(loaded)),
			Err(err) => {
				log::error!("{err}");
				load_error.set(Some(err.to_string()));
			}
		}
	});

	let on_select = Callback::new(move |selected: Option<NodeDetails>| details.set(selected));
	let on_command = Callback::new(move |command: GraphCommand| {
		commands.update(|queue| queue.push(command));
	});

	view! {
		<div class="fullscreen-graph">
			{move || match (data.get(), load_error.get()) {
				(_, Some(err)) => {
					view! {
						<p class="load-error">"Error loading graph data: " {err}</p>
					}
						.into_any()
				}
				(None, None) => view! { <p class="loading">"Loading graph\u{2026}"</p> }.into_any(),
				(Some(loaded), None) => {
					view! {
						<ConceptGraphCanvas
							data=loaded
							commands=commands
							on_select=on_select
							fullscreen=true
						/>
					}
						.into_any()
				}
			}}
			<div class="graph-overlay">
				<h1>"Hillerman Themes"</h1>
				<p class="subtitle">
					"Click a node to highlight its neighbors. Drag to pan, scroll to zoom."
				</p>
			</div>
			<GraphControls query=query on_command=on_command />
			<DetailsPanel details=details />
		</div>
	}
}
