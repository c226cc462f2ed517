//! Details panel for the selected node.

use leptos::prelude::*;

use crate::components::concept_graph::NodeDetails;

const PLACEHOLDER: &str = "Click a node to see details here.";

#[component]
pub fn DetailsPanel(#[prop(into)] details: Signal<Option<NodeDetails>>) -> impl IntoView {
	view! {
		<aside class="details-panel">
			{move || match details.get() {
				None => view! { <p class="details-placeholder">{PLACEHOLDER}</p> }.into_any(),
				Some(d) => {
					view! {
						<div>
							<h2 class="details-title">{d.label}</h2>
							<p class="details-description">{d.description}</p>
							<h3 class="details-subtitle">"Connected themes"</h3>
							<p class="details-neighbors">{d.neighbors.join(", ")}</p>
						</div>
					}
						.into_any()
				}
			}}
		</aside>
	}
}
