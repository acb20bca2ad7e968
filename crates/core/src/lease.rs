//! Extracted lease fields and the lease abstract projection.
//!
//! Every group is optional: the extraction backend emits `null` for any
//! group it could not find, and presence of a group is what decides which
//! section the abstract view shows.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::types::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    #[serde(default)]
    pub landlord: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseTerm {
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentSchedule {
    #[serde(default)]
    pub base_rent: Option<String>,
    #[serde(default)]
    pub escalation_clauses: Option<Vec<String>>,
    #[serde(default)]
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseOptions {
    #[serde(default)]
    pub renewal_options: Option<Vec<String>>,
    #[serde(default)]
    pub termination_clauses: Option<Vec<String>>,
}

/// Use clauses arrive either as a flat list (current backend) or split into
/// permitted and prohibited uses (shared type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UseClauses {
    List(Vec<String>),
    Categorized {
        #[serde(default)]
        permitted: Vec<String>,
        #[serde(default)]
        prohibited: Vec<String>,
    },
}

impl UseClauses {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Categorized {
                permitted,
                prohibited,
            } => permitted.is_empty() && prohibited.is_empty(),
        }
    }
}

/// Assignment and subletting terms: free text or a list of clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssignmentTerms {
    Text(String),
    Clauses(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLeaseData {
    #[serde(default)]
    pub parties: Option<Parties>,
    #[serde(default, alias = "leaseTerm")]
    pub dates: Option<LeaseTerm>,
    #[serde(default, alias = "rentSchedule")]
    pub rent: Option<RentSchedule>,
    #[serde(default)]
    pub options: Option<LeaseOptions>,
    #[serde(default, rename = "use_clauses", alias = "useClauses")]
    pub use_clauses: Option<UseClauses>,
    #[serde(default, alias = "assignmentSubletting")]
    pub assignment: Option<AssignmentTerms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_clauses: Option<Vec<String>>,
}

impl ExtractedLeaseData {
    /// Renewal and termination options, merging the nested `options` group
    /// with the top-level lists used by the shared type.
    pub fn lease_options(&self) -> Option<LeaseOptions> {
        if self.options.is_none()
            && self.renewal_options.is_none()
            && self.termination_clauses.is_none()
        {
            return None;
        }

        let nested = self.options.clone().unwrap_or_default();
        Some(LeaseOptions {
            renewal_options: merge_lists(nested.renewal_options, self.renewal_options.as_ref()),
            termination_clauses: merge_lists(
                nested.termination_clauses,
                self.termination_clauses.as_ref(),
            ),
        })
    }

    /// Use clauses, treating an empty list as absent.
    pub fn use_clauses(&self) -> Option<&UseClauses> {
        self.use_clauses.as_ref().filter(|u| !u.is_empty())
    }

    /// True when none of the displayable groups is present.
    pub fn is_empty(&self) -> bool {
        self.parties.is_none()
            && self.dates.is_none()
            && self.rent.is_none()
            && self.lease_options().is_none()
            && self.use_clauses().is_none()
    }
}

fn merge_lists(nested: Option<Vec<String>>, top: Option<&Vec<String>>) -> Option<Vec<String>> {
    match (nested, top) {
        (None, None) => None,
        (Some(list), None) => Some(list),
        (None, Some(top)) => Some(top.clone()),
        (Some(mut list), Some(top)) => {
            for item in top {
                if !list.contains(item) {
                    list.push(item.clone());
                }
            }
            Some(list)
        }
    }
}

// ---------------------------------------------------------------------------
// Lease abstract
// ---------------------------------------------------------------------------

/// Extracted data plus summary for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseAbstract {
    pub document_id: String,
    pub extracted_data: ExtractedLeaseData,
    pub summary: String,
    pub created_at: Timestamp,
}

impl LeaseAbstract {
    /// Project a document's optional extraction fields. Returns `None` when
    /// the document carries neither extracted data nor a summary.
    pub fn from_document(document: &Document) -> Option<Self> {
        if document.extracted_lease_data.is_none() && document.summary().is_none() {
            return None;
        }
        Some(Self {
            document_id: document.id.clone(),
            extracted_data: document.extracted_lease_data.clone().unwrap_or_default(),
            summary: document.summary().unwrap_or_default().to_string(),
            created_at: document
                .processed_at
                .or(document.updated_at)
                .unwrap_or(document.created_at),
        })
    }
}
