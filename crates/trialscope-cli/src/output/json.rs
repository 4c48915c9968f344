//! JSON output formatting.

use serde::Serialize;
use trialscope_core::{ResolvedResource, ResourceDescriptor};

/// Envelope written for each resolved URI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceEnvelope<'a> {
    uri: &'a str,
    text: &'a str,
    estimated_tokens: usize,
}

/// Formats resolved resources as a JSON array of `{ uri, text, estimatedTokens }`.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_resources_json(resources: &[ResolvedResource], compact: bool) -> String {
    let envelopes: Vec<ResourceEnvelope<'_>> = resources
        .iter()
        .map(|r| ResourceEnvelope {
            uri: &r.uri,
            text: &r.text,
            estimated_tokens: r.estimated_tokens,
        })
        .collect();
    to_json(&envelopes, compact)
}

/// Formats the resource registry as JSON.
pub fn format_descriptors_json(descriptors: &[ResourceDescriptor], compact: bool) -> String {
    to_json(descriptors, compact)
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(value).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(value).expect("serialization cannot fail")
    }
}
