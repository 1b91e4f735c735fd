//! Core data models for the script studio

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StudioError;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Genre {
    Action,
    Comedy,
    Horror,
    Romance,
    #[serde(rename = "Sci-Fi", alias = "SciFi")]
    SciFi,
    Thriller,
    Drama,
}

impl Genre {
    pub const ALL: [Genre; 7] = [
        Genre::Action,
        Genre::Comedy,
        Genre::Horror,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::Drama,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Audience {
    General,
    Children,
    Teens,
    Adults,
    Mature,
}

impl Audience {
    pub const ALL: [Audience; 5] = [
        Audience::General,
        Audience::Children,
        Audience::Teens,
        Audience::Adults,
        Audience::Mature,
    ];
}

//
// ================= Runtime =================
//

/// Movie runtime in minutes, bounded like the form slider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u16", into = "u16")]
pub struct Runtime(u16);

impl Runtime {
    pub const MIN: u16 = 60;
    pub const MAX: u16 = 180;
    pub const DEFAULT: u16 = 120;

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime(Self::DEFAULT)
    }
}

impl TryFrom<u16> for Runtime {
    type Error = StudioError;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&minutes) {
            Ok(Runtime(minutes))
        } else {
            Err(StudioError::InvalidRequest(format!(
                "runtime must be between {} and {} minutes, got {}",
                Self::MIN,
                Self::MAX,
                minutes
            )))
        }
    }
}

impl From<Runtime> for u16 {
    fn from(runtime: Runtime) -> u16 {
        runtime.0
    }
}

//
// ================= Request & Prompt =================
//

/// The four form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRequest {
    #[serde(default)]
    pub idea: String,
    pub genre: Genre,
    pub audience: Audience,
    #[serde(default)]
    pub runtime: Runtime,
}

/// Prompt handed to the orchestrator. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn compose(request: &MovieRequest) -> Self {
        Prompt(format!(
            "Movie idea: {}\nGenre: {}\nTarget audience: {}\nMovie runtime: {} mins\n",
            request.idea,
            request.genre,
            request.audience,
            request.runtime.minutes()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ================= Orchestrator Output =================
//

/// Display content returned by a run: either text or an already structured payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    Text(String),
    Structured(serde_json::Value),
}

impl Content {
    /// Text suitable for display as-is.
    pub fn to_display_string(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub run_id: Uuid,
    pub team: String,
    pub status: RunStatus,
    pub content: Content,
}

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub data: serde_json::Value,
    pub error: Option<String>,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::Drama => "Drama",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Audience::General => "General",
            Audience::Children => "Children",
            Audience::Teens => "Teens",
            Audience::Adults => "Adults",
            Audience::Mature => "Mature",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Genre {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "");
        Genre::ALL
            .into_iter()
            .find(|g| g.to_string().to_lowercase().replace('-', "") == wanted)
            .ok_or_else(|| StudioError::InvalidRequest(format!("unknown genre: {}", s)))
    }
}

impl FromStr for Audience {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Audience::ALL
            .into_iter()
            .find(|a| a.to_string().to_lowercase() == wanted)
            .ok_or_else(|| StudioError::InvalidRequest(format!("unknown audience: {}", s)))
    }
}
