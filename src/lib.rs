//! Movie Script Studio
//!
//! A small web form that turns a movie idea into a screenplay outline and
//! casting suggestions:
//! - A producer-led team of Gemini agents (script writer, casting director)
//! - Casting research through Google search (SerpApi)
//! - Provider errors are classified and disclosed according to developer
//!   mode and a per-request opt-in
//!
//! REQUEST FLOW:
//! FORM → PROMPT → ORCHESTRATOR → CLASSIFY → DISCLOSE → RENDER

pub mod agent;
pub mod api;
pub mod classifier;
pub mod config;
pub mod disclosure;
pub mod error;
pub mod gemini;
pub mod llm;
pub mod models;
pub mod studio;
pub mod tools;
pub mod ui;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::{AgentOutcome, Classification, ResponseClassifier};
pub use disclosure::{DetailPanel, DisclosureGate, Rendered};
pub use studio::ScriptStudio;
