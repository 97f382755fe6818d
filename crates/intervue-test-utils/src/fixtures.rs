// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample knowledge-base entries.

use intervue_core::{Category, Document};

pub fn document(id: &str, category: Category, section: &str, question: &str, text: &str) -> Document {
    Document {
        id: id.to_string(),
        section: section.to_string(),
        question: question.to_string(),
        text: text.to_string(),
        category,
        embedding: None,
    }
}

/// Four data-engineering and two machine-learning entries, in rank order.
pub fn knowledge_base() -> Vec<Document> {
    vec![
        document(
            "de-1",
            Category::DataEngineer,
            "General",
            "What is Data Engineering?",
            "Data engineering is the practice of designing and building systems that collect, store, and analyze data at scale.",
        ),
        document(
            "mle-1",
            Category::MachineLearningEngineer,
            "General",
            "What does a machine learning engineer do?",
            "They productionize models: training pipelines, serving, and monitoring.",
        ),
        document(
            "de-2",
            Category::DataEngineer,
            "Pipelines",
            "What is ETL?",
            "Extract, transform, load: moving data from sources into a warehouse.",
        ),
        document(
            "de-3",
            Category::DataEngineer,
            "Storage",
            "What is a data lake?",
            "A repository holding raw data in its native format until needed.",
        ),
        document(
            "mle-2",
            Category::MachineLearningEngineer,
            "Modeling",
            "What is overfitting?",
            "When a model learns noise in the training data and fails to generalize.",
        ),
        document(
            "de-4",
            Category::DataEngineer,
            "Streaming",
            "What is Kafka used for?",
            "Durable, partitioned event streaming between producers and consumers.",
        ),
    ]
}
