use crate::models::Note;
use crate::utils::error::AppError;

/// Immutable notes catalogue, loaded once at process start from the content
/// pipeline's JSON output. Never mutated afterwards; every request borrows it.
#[derive(Clone)]
pub struct ContentStore {
    notes: Vec<Note>,
}

impl ContentStore {
    pub fn load(path: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::ContentError(format!("Failed to read {}: {}", path, e)))?;

        let notes: Vec<Note> = serde_json::from_str(&raw)
            .map_err(|e| AppError::ContentError(format!("Failed to parse {}: {}", path, e)))?;

        log::info!("📚 Loaded {} notes from {}", notes.len(), path);

        Ok(Self { notes })
    }

    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalogue_json() {
        let raw = r#"[
            {
                "slug": "notes/dbms-unit-1",
                "title": "DBMS Unit 1",
                "description": "Relational model basics",
                "tags": ["dbms", "3rd-semester"],
                "published": true,
                "excludeFromMain": false,
                "metadata": {
                    "university": "Medicaps University",
                    "degree": "B Tech",
                    "semester": "3rd Semester",
                    "subject": "DBMS"
                }
            },
            {
                "slug": "notes/placement-roadmap",
                "title": "Placement Roadmap",
                "published": true
            }
        ]"#;

        let notes: Vec<Note> = serde_json::from_str(raw).unwrap();
        let store = ContentStore::from_notes(notes);

        assert_eq!(store.notes().len(), 2);
        assert_eq!(
            store.notes()[0].metadata.university.as_deref(),
            Some("Medicaps University")
        );
        // Missing optional fields default rather than fail
        assert!(store.notes()[1].description.is_empty());
        assert!(!store.notes()[1].exclude_from_main);
        assert!(store.notes()[1].metadata.university.is_none());
    }
}
