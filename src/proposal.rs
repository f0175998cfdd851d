//! Proposal view models: the records listed on the author dashboard and the
//! evaluation data joined onto them.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Review status as labelled by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusTag {
    Accepted,
    UnderReview,
    Rejected,
    Other(String),
}

impl StatusTag {
    pub const ACCEPTED: &'static str = "Accepté";
    pub const UNDER_REVIEW: &'static str = "En évaluation";
    pub const REJECTED: &'static str = "Rejeté";

    /// Exact match on the backend labels; anything else is kept as `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            Self::ACCEPTED => StatusTag::Accepted,
            Self::UNDER_REVIEW => StatusTag::UnderReview,
            Self::REJECTED => StatusTag::Rejected,
            other => StatusTag::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusTag::Accepted => Self::ACCEPTED,
            StatusTag::UnderReview => Self::UNDER_REVIEW,
            StatusTag::Rejected => Self::REJECTED,
            StatusTag::Other(raw) => raw.as_str(),
        }
    }
}

impl Display for StatusTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusTag {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusTag {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(StatusTag::parse(&String::deserialize(d)?))
    }
}

/// A submitted proposal. `status: None` means nobody has ruled on it yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub status: Option<StatusTag>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
}

impl Record {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, Some(StatusTag::Accepted))
    }

    /// Absent status and "under review" both count; nothing else does.
    pub fn is_pending(&self) -> bool {
        matches!(self.status, None | Some(StatusTag::UnderReview))
    }

    /// Calendar date of `created_at`. Accepts RFC 3339 timestamps or a bare date prefix.
    pub fn created_on(&self) -> Option<NaiveDate> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(ts.date_naive());
        }
        let day = self.created_at.split('T').next()?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    pub score: Option<f64>,
    pub comments: String,
}

/// Evaluation attached to a proposal. The default is the "not evaluated yet" state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationData {
    pub reviews: Vec<Review>,
    #[serde(rename = "overallScore")]
    pub overall_score: Option<f64>,
}

impl EvaluationData {
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty() && self.overall_score.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(flatten)]
    pub evaluation: EvaluationData,
}

impl EvaluatedRecord {
    pub fn new(record: Record, evaluation: EvaluationData) -> Self { Self { record, evaluation } }

    pub fn reviews(&self) -> &[Review] { &self.evaluation.reviews }

    pub fn overall_score(&self) -> Option<f64> { self.evaluation.overall_score }
}

/// Colour family a status is shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Accepted,
    Rejected,
    Pending,
}

/// One row of the "recent proposals" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionSummary {
    pub title: String,
    pub kind: String,
    pub status_label: String,
    pub date: String,
    pub tone: StatusTone,
}

impl From<&Record> for SubmissionSummary {
    fn from(r: &Record) -> Self {
        let tone = match r.status {
            Some(StatusTag::Accepted) => StatusTone::Accepted,
            Some(StatusTag::Rejected) => StatusTone::Rejected,
            _ => StatusTone::Pending,
        };
        let date = match r.created_on() {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => r.created_at.split('T').next().unwrap_or("").to_string(),
        };
        Self {
            title: r.title.clone(),
            kind: r.kind.clone(),
            status_label: r
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| StatusTag::UNDER_REVIEW.to_string()),
            date,
            tone,
        }
    }
}

pub fn summarize_submissions(records: &[Record]) -> Vec<SubmissionSummary> {
    records.iter().map(SubmissionSummary::from).collect()
}
