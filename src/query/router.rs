// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Counting-question detection

/// How a question should be served
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// "how many X are there" style question; answered by counting detections
    Counting { object_name: String },
    /// Anything else; passed verbatim to the question answerer
    General { text: String },
}

/// Classify a question
///
/// A question counts when its lowercased text contains both "how many" and
/// "are there". The object name is the single whitespace-separated token
/// right after the first "many" token, taken from the lowercased text. If
/// there is no "many" token, or it is the last token, the question is
/// treated as general.
///
/// Only one token is extracted: "how many red cars are there" resolves to
/// "red", and "cars" stays plural. The text is otherwise not normalized.
pub fn classify(question: &str) -> Query {
    let lowered = question.to_lowercase();

    if lowered.contains("how many") && lowered.contains("are there") {
        let mut tokens = lowered.split_whitespace();
        if tokens.by_ref().any(|t| t == "many") {
            if let Some(object_name) = tokens.next() {
                return Query::Counting {
                    object_name: object_name.to_string(),
                };
            }
        }
    }

    Query::General {
        text: question.to_string(),
    }
}
