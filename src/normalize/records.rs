use serde_json::Value;
use tracing::debug;

use super::probe::{first_array, first_number, first_text, FieldPath};
use crate::proposal::{EvaluationData, Record, Review, StatusTag};

/// Where the proposal list may sit: wrapped under `data`, or the body itself.
pub const RECORD_LIST_PATHS: [FieldPath; 2] = [FieldPath::new(&["data"]), FieldPath::new(&[])];

const ID_FIELDS: [FieldPath; 2] = crate::field_paths!["_id", "id"];
const KIND_FIELDS: [FieldPath; 2] = crate::field_paths!["presentationType", "type"];
const REVIEWER_FIELDS: [FieldPath; 3] = crate::field_paths!["reviewer", "reviewerName", "name"];
const COMMENT_FIELDS: [FieldPath; 2] = crate::field_paths!["comments", "comment"];

pub fn extract_record(raw: &Value) -> Record {
    Record {
        id: first_text(raw, &ID_FIELDS).unwrap_or_default(),
        title: first_text(raw, &crate::field_paths!["title"]).unwrap_or_default(),
        status: first_text(raw, &crate::field_paths!["status"]).map(|s| StatusTag::parse(&s)),
        created_at: first_text(raw, &crate::field_paths!["createdAt"]).unwrap_or_default(),
        kind: first_text(raw, &KIND_FIELDS).unwrap_or_default(),
        category: first_text(raw, &crate::field_paths!["category"]).unwrap_or_default(),
    }
}

/// Proposal list from a my-proposals body. Unrecognized shapes give an empty list.
pub fn extract_records(raw: &Value) -> Vec<Record> {
    match first_array(raw, &RECORD_LIST_PATHS) {
        Some(items) => items.iter().map(extract_record).collect(),
        None => {
            debug!(target: "normalize", "no proposal array in response; treating as empty");
            Vec::new()
        }
    }
}

pub fn extract_review(raw: &Value) -> Review {
    Review {
        reviewer: first_text(raw, &REVIEWER_FIELDS).unwrap_or_default(),
        score: first_number(raw, &crate::field_paths!["score"]),
        comments: first_text(raw, &COMMENT_FIELDS).unwrap_or_default(),
    }
}

pub fn extract_evaluation(raw: &Value) -> EvaluationData {
    let reviews: Vec<Review> = first_array(raw, &crate::field_paths!["reviews"])
        .map(|items| items.iter().map(extract_review).collect())
        .unwrap_or_default();
    EvaluationData { reviews, overall_score: first_number(raw, &crate::field_paths!["overallScore"]) }
}
