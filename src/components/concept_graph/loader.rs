use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::types::ConceptGraphData;

/// Why the graph dataset could not be loaded. Everything here surfaces as
/// a single message in the page's error state.
#[derive(Debug, Error)]
pub enum DataError {
	#[error("request failed: {0}")]
	Request(String),
	#[error("invalid graph data: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("invalid graph data: {0}")]
	Invalid(String),
}

fn js_error(context: &str) -> impl Fn(wasm_bindgen::JsValue) -> DataError + '_ {
	move |value| {
		let detail = value
			.as_string()
			.unwrap_or_else(|| format!("{value:?}"));
		DataError::Request(format!("{context}: {detail}"))
	}
}

/// Fetch and decode the dataset asset. Called exactly once, before the
/// graph view is created.
pub async fn load_graph_data(url: &str) -> Result<ConceptGraphData, DataError> {
	let window =
		web_sys::window().ok_or_else(|| DataError::Request("no window object".into()))?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(js_error("fetch"))?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| DataError::Request("fetch returned a non-Response value".into()))?;
	if !response.ok() {
		return Err(DataError::Request(format!(
			"HTTP {} for {url}",
			response.status()
		)));
	}

	let body = JsFuture::from(
		response
			.text()
			.map_err(js_error("reading response body"))?,
	)
	.await
	.map_err(js_error("reading response body"))?;
	let body = body
		.as_string()
		.ok_or_else(|| DataError::Request("response body was not text".into()))?;

	let data: ConceptGraphData = serde_json::from_str(&body)?;
	data.validate().map_err(DataError::Invalid)?;
	log::info!(
		"loaded concept graph: {} nodes, {} edges",
		data.nodes.len(),
		data.edges.len()
	);
	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_error_is_reported() {
		let err: DataError = serde_json::from_str::<ConceptGraphData>("not json")
			.unwrap_err()
			.into();
		assert!(err.to_string().starts_with("invalid graph data"));
	}

	#[test]
	fn validation_error_is_reported() {
		let raw = r#"{
			"nodes": [
				{ "id": "a", "label": "A", "group": "core" },
				{ "id": "a", "label": "A again", "group": "book" }
			],
			"edges": []
		}"#;
		let data: ConceptGraphData = serde_json::from_str(raw).unwrap();
		let err = data.validate().map_err(DataError::Invalid).unwrap_err();
		assert_eq!(err.to_string(), "invalid graph data: duplicate node id \"a\"");
	}
}
