//! Snippet models. Snippets live in the plain settings namespace, never in
//! the encrypted history record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl Snippet {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetFolder {
    pub id: Uuid,
    pub title: String,
    pub snippets: Vec<Snippet>,
}

impl SnippetFolder {
    pub fn new(title: impl Into<String>, snippets: Vec<Snippet>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            snippets,
        }
    }
}

/// Folders written on first launch and after a factory reset.
pub fn example_folders() -> Vec<SnippetFolder> {
    vec![
        SnippetFolder::new(
            "📨 Email",
            vec![
                Snippet::new("Signature", "\nBest regards,\n\nSent from Pastelet"),
                Snippet::new(
                    "Meeting Invite",
                    "Hi team,\n\nI'd like to schedule a quick sync to discuss the project. Are you free at 2 PM?",
                ),
            ],
        ),
        SnippetFolder::new(
            "💻 Code",
            vec![
                Snippet::new("Rust main", "fn main() {\n    println!(\"Hello\");\n}"),
                Snippet::new("Derive", "#[derive(Debug, Clone, PartialEq, Eq)]"),
            ],
        ),
        SnippetFolder::new(
            "¯\\_(ツ)_/¯ Kaomoji",
            vec![
                Snippet::new("Shrug", "¯\\_(ツ)_/¯"),
                Snippet::new("Table Flip", "(╯°□°）╯︵ ┻━┻"),
            ],
        ),
    ]
}
