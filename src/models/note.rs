use serde::{Deserialize, Serialize};

/// Hierarchical facet metadata attached to a note. Every field is optional:
/// general notes (roadmaps, one-shots) carry none of them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
pub struct NoteMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// One entry of the notes catalogue. Field names match the content
/// pipeline's JSON output (camelCase for `excludeFromMain`).
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct Note {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, rename = "excludeFromMain")]
    pub exclude_from_main: bool,
    #[serde(default)]
    pub metadata: NoteMetadata,
}
