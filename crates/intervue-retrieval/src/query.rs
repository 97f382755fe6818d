// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Elasticsearch query DSL bodies for lexical and kNN retrieval.

use intervue_core::types::{LexicalQuery, VectorQuery};
use serde_json::{Value, json};

/// Fields searched by the lexical query; the question title is boosted.
pub const LEXICAL_FIELDS: [&str; 3] = ["question^3", "text", "section"];

/// Source fields returned by kNN queries. The stored vector is excluded.
pub const SOURCE_FIELDS: [&str; 5] = ["text", "section", "question", "position", "id"];

/// `bool` query: `multi_match` must-clause plus an exact category filter.
pub fn lexical_body(query: &LexicalQuery, category_field: &str) -> Value {
    json!({
        "size": query.size,
        "query": {
            "bool": {
                "must": {
                    "multi_match": {
                        "query": query.text,
                        "fields": LEXICAL_FIELDS,
                        "type": "best_fields",
                    }
                },
                "filter": category_filter(category_field, query.category.code()),
            }
        },
    })
}

/// Top-level `knn` search with the same category filter.
pub fn vector_body(query: &VectorQuery, vector_field: &str, category_field: &str) -> Value {
    json!({
        "size": query.k,
        "knn": {
            "field": vector_field,
            "query_vector": query.vector,
            "k": query.k,
            "num_candidates": query.num_candidates,
            "filter": category_filter(category_field, query.category.code()),
        },
        "_source": SOURCE_FIELDS,
    })
}

fn category_filter(field: &str, code: &str) -> Value {
    let mut term = serde_json::Map::new();
    term.insert(field.to_string(), Value::String(code.to_string()));
    json!({ "term": term })
}
