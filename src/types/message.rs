//! Cross-context message protocol.
//!
//! Requests, responses, and out-of-band events are closed tagged sets;
//! serde validates each variant's required fields at the boundary before
//! anything is dispatched.

use serde::{Deserialize, Serialize};

use super::group::GroupMap;

/// A request from the foreground context, tagged by `action`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Write one serialized group to the durable medium.
    #[serde(rename_all = "camelCase")]
    SaveFile {
        group_name: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        folder_location: Option<String>,
    },
    /// Check that a candidate save directory is usable, without persisting.
    VerifyFolder { path: String },
    /// Persist the configured save directory.
    SetSaveDirectory { path: String },
    /// Read back the configured save directory, if any.
    GetSaveDirectory,
    /// Import an archive or bare JSON document; binary content crosses the
    /// boundary base64-encoded.
    #[serde(rename_all = "camelCase")]
    ImportGroups {
        filename: String,
        content_base64: String,
    },
}

/// Immediate reply to a request. For `saveFile` a success response is only
/// the acknowledgment; the final path arrives in a `saveFileComplete` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Ok {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    Err {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<ErrorDetails>,
    },
}

impl Response {
    pub fn ok() -> Self {
        Response::Ok {
            success: true,
            path: None,
        }
    }

    pub fn ok_with_path(path: Option<String>) -> Self {
        Response::Ok {
            success: true,
            path,
        }
    }

    /// Collapses any error into the single human-readable wire shape.
    pub fn failure(err: &dyn std::error::Error) -> Self {
        let message = err.to_string();
        Response::Err {
            error: message.clone(),
            details: Some(ErrorDetails {
                message,
                stack: None,
            }),
        }
    }
}

/// Structured error payload carried alongside the collapsed message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Asynchronous broadcast, tagged by `type`. The original reply channel may
/// already be gone, so these are addressed by correlation fields instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    SaveFileComplete {
        group_title: String,
        result: SaveResult,
    },
    /// The persisted mapping changed; consumers must reload the whole
    /// mapping, never patch incrementally.
    GroupsUpdated { groups: GroupMap },
}

/// Terminal outcome carried by a `saveFileComplete` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SaveResult {
    Success { success: bool, path: String },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<ErrorDetails>,
    },
}

impl SaveResult {
    pub fn success(path: String) -> Self {
        SaveResult::Success {
            success: true,
            path,
        }
    }

    pub fn failure(err: &dyn std::error::Error) -> Self {
        let message = err.to_string();
        SaveResult::Failure {
            error: message.clone(),
            details: Some(ErrorDetails {
                message,
                stack: None,
            }),
        }
    }
}
