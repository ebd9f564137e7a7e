//! Response normalization
//!
//! The search backend has answered in several payload shapes over time. All of
//! them are reduced here to one ordered list of [`ResultItem`]s:
//!
//! - `{"results": {"documents": [[..]], "metadatas": [[..]], "distances": [[..]]}}`
//!   (parallel arrays from the vector store, one row per query)
//! - `[item, item, ..]`
//! - `{"results": [item, ..]}`
//! - `{"answer": "..", "sources": [item, ..]}`
//!
//! Any of them may be wrapped in a `[payload, status_code]` envelope.

use crate::http::unwrap_envelope;
use serde_json::{Map, Value};

/// Title given to the generated-answer item.
pub const AI_ANSWER_TITLE: &str = "AI answer";

/// One renderable search result.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultItem {
    /// A loosely typed document object (or any other JSON value).
    Document(Value),
    /// A job listing hit taken from the parallel-array shape.
    Listing(ListingHit),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingHit {
    pub document: String,
    pub metadata: Map<String, Value>,
    pub distance: Option<f64>,
}

/// The payload shapes the client understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    ParallelArrays(&'a Map<String, Value>),
    List(&'a [Value]),
    Answer {
        answer: Option<&'a str>,
        sources: &'a [Value],
    },
    Single(&'a Value),
    Empty,
}

impl<'a> ResponseShape<'a> {
    pub fn detect(payload: &'a Value) -> Self {
        match payload {
            Value::Array(items) => ResponseShape::List(items),
            Value::Object(obj) if obj.contains_key("answer") || obj.contains_key("sources") => {
                let sources = obj
                    .get("sources")
                    .or_else(|| obj.get("results"))
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                ResponseShape::Answer {
                    answer: obj.get("answer").and_then(Value::as_str),
                    sources,
                }
            }
            Value::Object(obj) => match obj.get("results") {
                Some(Value::Object(results)) if results.contains_key("documents") => {
                    ResponseShape::ParallelArrays(results)
                }
                Some(Value::Array(items)) => ResponseShape::List(items),
                Some(_) => ResponseShape::Empty,
                None => ResponseShape::Single(payload),
            },
            _ => ResponseShape::Empty,
        }
    }

    pub fn into_items(self) -> Vec<ResultItem> {
        match self {
            ResponseShape::ParallelArrays(results) => listing_hits(results),
            ResponseShape::List(items) => items.iter().cloned().map(ResultItem::Document).collect(),
            ResponseShape::Answer { answer, sources } => {
                let mut items = Vec::with_capacity(sources.len() + 1);
                if let Some(text) = answer.filter(|a| !a.trim().is_empty()) {
                    items.push(ResultItem::Document(serde_json::json!({
                        "title": AI_ANSWER_TITLE,
                        "answer": text,
                    })));
                }
                items.extend(sources.iter().cloned().map(ResultItem::Document));
                items
            }
            ResponseShape::Single(value) => vec![ResultItem::Document(value.clone())],
            ResponseShape::Empty => Vec::new(),
        }
    }
}

/// Reduce any supported payload to an ordered list of items.
pub fn normalize(payload: Value) -> Vec<ResultItem> {
    let payload = unwrap_envelope(payload);
    ResponseShape::detect(&payload).into_items()
}

fn listing_hits(results: &Map<String, Value>) -> Vec<ResultItem> {
    let documents = first_row(results.get("documents"));
    let metadatas = first_row(results.get("metadatas"));
    let distances = first_row(results.get("distances"));

    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            ResultItem::Listing(ListingHit {
                document: match doc {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                },
                metadata: metadatas
                    .get(i)
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
                distance: distances.get(i).and_then(Value::as_f64),
            })
        })
        .collect()
}

/// The vector store nests every column per query: `[[a, b, c]]`. Take the
/// first row, or the column itself when it is already flat.
fn first_row(column: Option<&Value>) -> &[Value] {
    match column.and_then(Value::as_array) {
        Some(rows) => match rows.first() {
            Some(Value::Array(row)) => row.as_slice(),
            _ => rows.as_slice(),
        },
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parallel_arrays_share_index() {
        let payload = json!({
            "results": {
                "ids": [["job-0", "job-1"]],
                "documents": [["Nurse Leeds", "Welder Hull"]],
                "metadatas": [[{"Title": "Nurse"}, {"Title": "Welder"}]],
                "distances": [[0.12, 0.5]]
            }
        });
        let items = normalize(payload);
        assert_eq!(items.len(), 2);
        match &items[1] {
            ResultItem::Listing(hit) => {
                assert_eq!(hit.document, "Welder Hull");
                assert_eq!(hit.metadata["Title"], "Welder");
                assert_eq!(hit.distance, Some(0.5));
            }
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[test]
    fn test_enveloped_payload_normalizes_like_bare() {
        let bare = json!({
            "results": {
                "documents": [["a"]],
                "metadatas": [[{"Title": "A"}]],
                "distances": [[0.3]]
            }
        });
        let wrapped = json!([bare.clone(), 200]);
        assert_eq!(normalize(wrapped), normalize(bare));
    }

    #[test]
    fn test_enveloped_flat_array() {
        let items = normalize(json!([[{"title": "A"}, {"title": "B"}], 200]));
        assert_eq!(
            items,
            vec![
                ResultItem::Document(json!({"title": "A"})),
                ResultItem::Document(json!({"title": "B"})),
            ]
        );
        assert!(normalize(json!([[], 200])).is_empty());
    }

    #[test]
    fn test_enveloped_answer_with_sources() {
        let bare = json!({"answer": "X", "sources": [{"title": "A"}]});
        assert_eq!(normalize(json!([bare.clone(), 200])), normalize(bare));
    }

    #[test]
    fn test_short_metadata_and_distance_columns() {
        let payload = json!({"results": {"documents": [["a", "b"]], "metadatas": [[{"Title": "A"}]]}});
        let items = normalize(payload);
        match &items[1] {
            ResultItem::Listing(hit) => {
                assert!(hit.metadata.is_empty());
                assert_eq!(hit.distance, None);
            }
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[test]
    fn test_flat_array_and_results_array() {
        let flat = normalize(json!([{"title": "A"}, {"title": "B"}, {"title": "C"}]));
        assert_eq!(flat.len(), 3);

        let wrapped = normalize(json!({"results": [{"title": "A"}]}));
        assert_eq!(wrapped, vec![ResultItem::Document(json!({"title": "A"}))]);
    }

    #[test]
    fn test_empty_results() {
        assert!(normalize(json!({"results": []})).is_empty());
        assert!(normalize(json!({"results": {"documents": [[]]}})).is_empty());
        assert!(normalize(json!({"results": null})).is_empty());
        assert!(normalize(json!([])).is_empty());
        assert!(normalize(Value::Null).is_empty());
    }

    #[test]
    fn test_answer_with_sources() {
        let items = normalize(json!({"answer": "X", "sources": [{"title": "A"}]}));
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            ResultItem::Document(json!({"title": "AI answer", "answer": "X"}))
        );
        assert_eq!(items[1], ResultItem::Document(json!({"title": "A"})));
    }

    #[test]
    fn test_blank_answer_is_skipped() {
        let items = normalize(json!({"answer": "", "sources": [{"title": "A"}]}));
        assert_eq!(items.len(), 1);
        assert!(normalize(json!({"answer": null})).is_empty());
    }

    #[test]
    fn test_unknown_object_is_a_single_item() {
        let items = normalize(json!({"message": "hello"}));
        assert_eq!(items, vec![ResultItem::Document(json!({"message": "hello"}))]);
    }
}
