//! Disclosure Gate
//!
//! Decides how much of a classified response reaches the end user.
//! Upstream provider errors are reduced to an apology unless developer mode
//! is on or the user asks for details; unexpected errors always carry an
//! expandable detail panel.

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;

pub const UPSTREAM_APOLOGY: &str =
    "The script writers are temporarily overloaded. Please try again in a moment.";

pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred while generating your script.";

/// Expandable technical detail shown under an error banner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "format", content = "body", rename_all = "snake_case")]
pub enum DetailPanel {
    Json(String),
    Raw(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    Content {
        text: String,
    },
    Error {
        message: String,
        detail: Option<DetailPanel>,
    },
}

impl Rendered {
    pub fn is_error(&self) -> bool {
        matches!(self, Rendered::Error { .. })
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        match self {
            Rendered::Error { detail, .. } => detail.as_ref(),
            Rendered::Content { .. } => None,
        }
    }
}

/// Render policy. `dev_mode` is fixed at construction; the user opt-in is
/// supplied per render.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisclosureGate {
    dev_mode: bool,
}

impl DisclosureGate {
    pub fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn render(&self, classification: &Classification, user_opt_in: bool) -> Rendered {
        match classification {
            Classification::Plain(content) => Rendered::Content {
                text: content.to_display_string(),
            },
            Classification::UpstreamError(payload) => {
                let detail = if self.dev_mode || user_opt_in {
                    let pretty = serde_json::to_string_pretty(payload)
                        .unwrap_or_else(|_| payload.to_string());
                    Some(DetailPanel::Json(pretty))
                } else {
                    None
                };

                Rendered::Error {
                    message: UPSTREAM_APOLOGY.to_string(),
                    detail,
                }
            }
            Classification::UnexpectedError(raw) => Rendered::Error {
                message: UNEXPECTED_ERROR_MESSAGE.to_string(),
                detail: Some(DetailPanel::Raw(raw.clone())),
            },
        }
    }
}
