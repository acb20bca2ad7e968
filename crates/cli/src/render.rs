//! Plain-text rendering of controller state for the terminal.

use std::fmt::Write as _;

use legalease_client::listing::ListView;
use legalease_client::upload::UploadState;
use legalease_core::document::Document;
use legalease_core::listing::{EMPTY_LIST_HINT, EMPTY_LIST_MESSAGE};
use legalease_core::user::User;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn document_row(doc: &Document) -> String {
    let size = doc
        .file_size
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".into());
    format!(
        "{id}  {kind:<4}  {status:<10}  {size:>10}  {uploaded}  {name}",
        id = doc.id,
        kind = doc.kind().tag(),
        status = doc.status.label(),
        uploaded = doc.created_at.format(DATE_FORMAT),
        name = doc.display_name(),
    )
}

pub fn list_view(view: &ListView<'_>) -> String {
    match view {
        ListView::Loading => "Loading documents...".to_string(),
        ListView::Error(message) => format!("Error: {message}"),
        ListView::Empty => format!("{EMPTY_LIST_MESSAGE}\n{EMPTY_LIST_HINT}"),
        ListView::Rows(rows) => {
            let mut out = format!("Your Documents ({})\n", rows.len());
            for doc in rows {
                let _ = writeln!(out, "{}", document_row(doc));
            }
            out.trim_end().to_string()
        }
    }
}

pub fn upload_state(state: &UploadState) -> String {
    match (&state.error, state.uploading) {
        (Some(error), _) => format!("Upload error: {error}"),
        (None, true) => format!("Uploading... {}%", state.progress),
        (None, false) => format!("Upload progress: {}%", state.progress),
    }
}

pub fn welcome(user: &User) -> String {
    format!("Welcome, {} ({})", user.full_name(), user.email)
}
