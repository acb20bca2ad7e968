//! Read-only lease abstract view.
//!
//! [`AbstractView::build`] turns a fetched [`Document`] into the sections
//! the detail screen shows. Each section appears only when its group was
//! extracted; when none was, the view carries a notice whose wording
//! depends on whether processing has finished. The `Display` impl renders
//! the view as plain text.

use std::fmt;

use crate::document::{Document, DocumentStatus};
use crate::lease::{ExtractedLeaseData, UseClauses};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const NO_DATA_TITLE: &str = "No Extracted Data Available";

/// Notice for a completed document without structured data.
pub const NO_DATA_PROCESSED: &str =
    "The document was processed but no structured data could be extracted.";

/// Notice for a document that has not finished processing.
pub const NO_DATA_PENDING: &str =
    "The document is still being processed. Please check back later.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Parties,
    LeaseTerm,
    Rent,
    Options,
    PermittedUse,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Parties => "Parties",
            Self::LeaseTerm => "Lease Term",
            Self::Rent => "Rent Information",
            Self::Options => "Options & Terms",
            Self::PermittedUse => "Permitted Use",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub fields: Vec<Field>,
}

fn text_field(fields: &mut Vec<Field>, label: &'static str, value: Option<&String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        fields.push(Field {
            label,
            value: FieldValue::Text(value.clone()),
        });
    }
}

fn list_field(fields: &mut Vec<Field>, label: &'static str, value: Option<&Vec<String>>) {
    if let Some(items) = value.filter(|items| !items.is_empty()) {
        fields.push(Field {
            label,
            value: FieldValue::List(items.clone()),
        });
    }
}

fn build_sections(data: &ExtractedLeaseData) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(parties) = &data.parties {
        let mut fields = Vec::new();
        text_field(&mut fields, "Landlord", parties.landlord.as_ref());
        text_field(&mut fields, "Tenant", parties.tenant.as_ref());
        sections.push(Section {
            kind: SectionKind::Parties,
            fields,
        });
    }

    if let Some(term) = &data.dates {
        let mut fields = Vec::new();
        text_field(&mut fields, "Effective Date", term.effective_date.as_ref());
        text_field(&mut fields, "Expiration Date", term.expiration_date.as_ref());
        text_field(&mut fields, "Duration", term.duration.as_ref());
        sections.push(Section {
            kind: SectionKind::LeaseTerm,
            fields,
        });
    }

    if let Some(rent) = &data.rent {
        let mut fields = Vec::new();
        text_field(&mut fields, "Base Rent", rent.base_rent.as_ref());
        list_field(&mut fields, "Escalation Clauses", rent.escalation_clauses.as_ref());
        text_field(&mut fields, "Payment Terms", rent.payment_terms.as_ref());
        sections.push(Section {
            kind: SectionKind::Rent,
            fields,
        });
    }

    if let Some(options) = data.lease_options() {
        let mut fields = Vec::new();
        list_field(&mut fields, "Renewal Options", options.renewal_options.as_ref());
        list_field(
            &mut fields,
            "Termination Clauses",
            options.termination_clauses.as_ref(),
        );
        sections.push(Section {
            kind: SectionKind::Options,
            fields,
        });
    }

    if let Some(use_clauses) = data.use_clauses() {
        let mut fields = Vec::new();
        match use_clauses {
            UseClauses::List(items) => list_field(&mut fields, "Permitted Use", Some(items)),
            UseClauses::Categorized {
                permitted,
                prohibited,
            } => {
                list_field(&mut fields, "Permitted", Some(permitted));
                list_field(&mut fields, "Prohibited", Some(prohibited));
            }
        }
        sections.push(Section {
            kind: SectionKind::PermittedUse,
            fields,
        });
    }

    sections
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AbstractView {
    pub title: String,
    pub status: DocumentStatus,
    pub uploaded_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub summary: Option<String>,
    pub sections: Vec<Section>,
    /// Set only when `sections` is empty.
    pub empty_notice: Option<&'static str>,
}

impl AbstractView {
    pub fn build(document: &Document) -> Self {
        let sections = document
            .extracted_lease_data
            .as_ref()
            .map(build_sections)
            .unwrap_or_default();

        let empty_notice = if sections.is_empty() {
            Some(no_data_message(document.status))
        } else {
            None
        };

        Self {
            title: document.display_name().to_string(),
            status: document.status,
            uploaded_at: document.created_at,
            updated_at: document.updated_at,
            summary: document.summary().map(str::to_string),
            sections,
            empty_notice,
        }
    }

    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Wording of the "no extracted data" notice for a status.
pub fn no_data_message(status: DocumentStatus) -> &'static str {
    if status == DocumentStatus::Completed {
        NO_DATA_PROCESSED
    } else {
        NO_DATA_PENDING
    }
}

impl fmt::Display for AbstractView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", self.title, self.status.label())?;
        writeln!(f, "Uploaded: {}", self.uploaded_at.format(TIMESTAMP_FORMAT))?;
        if let Some(updated) = self.updated_at {
            writeln!(f, "Last Updated: {}", updated.format(TIMESTAMP_FORMAT))?;
        }

        if let Some(summary) = &self.summary {
            writeln!(f)?;
            writeln!(f, "AI-Generated Summary")?;
            writeln!(f, "  {summary}")?;
        }

        writeln!(f)?;
        writeln!(f, "Lease Abstract Details")?;

        if let Some(notice) = self.empty_notice {
            writeln!(f, "  {NO_DATA_TITLE}")?;
            writeln!(f, "  {notice}")?;
            return Ok(());
        }

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "  {}", section.kind.title())?;
            for field in &section.fields {
                match &field.value {
                    FieldValue::Text(text) => writeln!(f, "    {}: {text}", field.label)?,
                    FieldValue::List(items) => {
                        writeln!(f, "    {}:", field.label)?;
                        for item in items {
                            writeln!(f, "      - {item}")?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
