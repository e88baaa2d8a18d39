use crate::models::{Note, NoteMetadata};
use serde::Serialize;

/// Notes shown per page. Changing it shifts every page boundary and the
/// total page count.
pub const NOTES_PER_PAGE: usize = 6;

/// Maximum hits returned by the search box.
pub const SEARCH_LIMIT: usize = 50;

// ============================================================================
// FACET HIERARCHY
// ============================================================================

/// Facet levels in hierarchy order. The discriminant order is load-bearing:
/// setting a value at one level clears every level that sorts after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FacetLevel {
    University,
    Degree,
    Semester,
    Subject,
}

impl FacetLevel {
    pub const ALL: [FacetLevel; 4] = [
        FacetLevel::University,
        FacetLevel::Degree,
        FacetLevel::Semester,
        FacetLevel::Subject,
    ];

    /// Key used in the shareable query string.
    pub fn key(self) -> &'static str {
        match self {
            FacetLevel::University => "university",
            FacetLevel::Degree => "degree",
            FacetLevel::Semester => "semester",
            FacetLevel::Subject => "subject",
        }
    }

    /// Metadata value of a note at this level.
    pub fn of(self, metadata: &NoteMetadata) -> Option<&str> {
        match self {
            FacetLevel::University => metadata.university.as_deref(),
            FacetLevel::Degree => metadata.degree.as_deref(),
            FacetLevel::Semester => metadata.semester.as_deref(),
            FacetLevel::Subject => metadata.subject.as_deref(),
        }
    }
}

/// Current filter state plus page. Kept as an ordered tuple so there is a
/// single mutation: set level L, drop everything below L. The selection is
/// therefore always a prefix of the hierarchy (no facet can be set under an
/// unset ancestor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSelection {
    values: [Option<String>; 4],
    page: usize,
}

impl Default for FacetSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl FacetSelection {
    pub fn new() -> Self {
        Self {
            values: [None, None, None, None],
            page: 1,
        }
    }

    /// Build from the shareable query representation. Empty values count as
    /// unset, and a facet below an unset ancestor is dropped so the selection
    /// stays a prefix of the hierarchy. Page has already been defaulted to 1
    /// by the caller when absent or unparseable.
    pub fn from_parts(
        university: Option<String>,
        degree: Option<String>,
        semester: Option<String>,
        subject: Option<String>,
        page: usize,
    ) -> Self {
        let mut selection = Self::new();
        let parts = [university, degree, semester, subject];
        for (slot, value) in selection.values.iter_mut().zip(parts) {
            match value.filter(|v| !v.is_empty()) {
                Some(v) => *slot = Some(v),
                None => break,
            }
        }
        selection.page = page.max(1);
        selection
    }

    /// Set the facet at `level` (`None` deselects). Every level below is
    /// cleared and the page resets to 1 in the same step.
    pub fn set(&mut self, level: FacetLevel, value: Option<String>) {
        self.values[level as usize] = value.filter(|v| !v.is_empty());
        for slot in self.values[level as usize + 1..].iter_mut() {
            *slot = None;
        }
        self.page = 1;
    }

    pub fn get(&self, level: FacetLevel) -> Option<&str> {
        self.values[level as usize].as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// One-way projection into the shareable query string: non-empty facets
    /// only, page always present. A copied link reproduces the exact view.
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        for level in FacetLevel::ALL {
            if let Some(value) = self.get(level) {
                params.push(format!("{}={}", level.key(), urlencoding::encode(value)));
            }
        }
        params.push(format!("page={}", self.page));
        params.join("&")
    }
}

// ============================================================================
// FILTER ENGINE
// ============================================================================

/// Distinct non-empty metadata values at `level`, restricted to notes whose
/// metadata equals the selection at every level strictly above. The dropdown
/// for a level only shows values reachable under the current ancestors; with
/// an unset ancestor nothing matches, which is what keeps the lower dropdowns
/// empty until the ones above are picked.
///
/// Only the semester axis is sorted; the other dropdowns render in catalogue
/// order. That asymmetry is deliberate (semesters read "1st, 2nd, ..." no
/// matter how the content files are ordered).
pub fn compute_options(notes: &[Note], selection: &FacetSelection, level: FacetLevel) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();

    for note in notes {
        let ancestors_match = FacetLevel::ALL
            .iter()
            .take_while(|l| **l < level)
            .all(|l| {
                let selected = selection.get(*l).unwrap_or("");
                l.of(&note.metadata).is_some_and(|value| value == selected)
            });

        if !ancestors_match {
            continue;
        }

        if let Some(value) = level.of(&note.metadata) {
            if !value.is_empty() && !options.iter().any(|o| o == value) {
                options.push(value.to_string());
            }
        }
    }

    if level == FacetLevel::Semester {
        options.sort();
    }

    options
}

/// Every published, non-excluded note matching each set facet exactly
/// (case-sensitive). Unset facets impose no constraint.
pub fn filter_notes<'a>(notes: &'a [Note], selection: &FacetSelection) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|note| {
            note.published
                && !note.exclude_from_main
                && FacetLevel::ALL.iter().all(|level| match selection.get(*level) {
                    Some(want) => level.of(&note.metadata) == Some(want),
                    None => true,
                })
        })
        .collect()
}

/// Contiguous slice for `page` (1-based). A page past the end is an empty
/// slice, not an error; "no results" is a valid display state.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page_size.saturating_mul(page.saturating_sub(1));
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NotesPageResponse {
    pub success: bool,
    pub notes: Vec<Note>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_notes: usize,
    /// Canonical shareable query string for this view.
    pub query: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FacetOptionsResponse {
    pub success: bool,
    pub universities: Vec<String>,
    pub degrees: Vec<String>,
    pub semesters: Vec<String>,
    pub subjects: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub notes: Vec<Note>,
    pub count: usize,
}

/// Filter + paginate one page view.
pub fn browse(notes: &[Note], selection: &FacetSelection) -> NotesPageResponse {
    let filtered = filter_notes(notes, selection);
    let total_notes = filtered.len();

    let page_notes = paginate(&filtered, selection.page(), NOTES_PER_PAGE)
        .iter()
        .map(|note| (*note).clone())
        .collect();

    NotesPageResponse {
        success: true,
        notes: page_notes,
        current_page: selection.page(),
        total_pages: total_pages(total_notes, NOTES_PER_PAGE),
        total_notes,
        query: selection.to_query_string(),
    }
}

/// Option sets for all four dropdowns under the current selection.
pub fn facet_options(notes: &[Note], selection: &FacetSelection) -> FacetOptionsResponse {
    FacetOptionsResponse {
        success: true,
        universities: compute_options(notes, selection, FacetLevel::University),
        degrees: compute_options(notes, selection, FacetLevel::Degree),
        semesters: compute_options(notes, selection, FacetLevel::Semester),
        subjects: compute_options(notes, selection, FacetLevel::Subject),
    }
}

/// Case-insensitive substring search over title, description and tags.
/// Unpublished and excluded notes never surface here either.
pub fn search_notes(notes: &[Note], query: &str) -> SearchResponse {
    let needle = query.trim().to_lowercase();

    let hits: Vec<Note> = if needle.is_empty() {
        Vec::new()
    } else {
        notes
            .iter()
            .filter(|note| note.published && !note.exclude_from_main)
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.description.to_lowercase().contains(&needle)
                    || note.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
            })
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    };

    let count = hits.len();

    SearchResponse {
        success: true,
        notes: hits,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteMetadata;

    fn note(
        slug: &str,
        university: Option<&str>,
        degree: Option<&str>,
        semester: Option<&str>,
        subject: Option<&str>,
    ) -> Note {
        Note {
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            description: String::new(),
            tags: vec![],
            published: true,
            exclude_from_main: false,
            metadata: NoteMetadata {
                university: university.map(String::from),
                degree: degree.map(String::from),
                semester: semester.map(String::from),
                subject: subject.map(String::from),
            },
        }
    }

    fn catalogue() -> Vec<Note> {
        vec![
            note("a-cs-1-math", Some("A"), Some("CS"), Some("1"), Some("Math")),
            note("a-cs-2-phys", Some("A"), Some("CS"), Some("2"), Some("Phys")),
            note("a-ee-1-circ", Some("A"), Some("EE"), Some("1"), Some("Circuits")),
            note("b-cs-1-prog", Some("B"), Some("CS"), Some("1"), Some("Programming")),
            note("no-meta", None, None, None, None),
        ]
    }

    fn selection_of(parts: &[(FacetLevel, &str)]) -> FacetSelection {
        let mut selection = FacetSelection::new();
        for (level, value) in parts {
            selection.set(*level, Some(value.to_string()));
        }
        selection
    }

    #[test]
    fn test_degree_options_restricted_to_selected_university() {
        let notes = catalogue();
        let selection = selection_of(&[(FacetLevel::University, "A")]);

        let degrees = compute_options(&notes, &selection, FacetLevel::Degree);

        assert_eq!(degrees, vec!["CS".to_string(), "EE".to_string()]);
        // No leakage from university B
        assert!(!degrees.iter().any(|d| d == "Programming"));
    }

    #[test]
    fn test_semester_options_are_sorted() {
        let notes = vec![
            note("a-cs-3", Some("A"), Some("CS"), Some("3"), None),
            note("a-cs-1", Some("A"), Some("CS"), Some("1"), None),
            note("a-cs-2", Some("A"), Some("CS"), Some("2"), None),
        ];
        let selection = selection_of(&[
            (FacetLevel::University, "A"),
            (FacetLevel::Degree, "CS"),
        ]);

        let semesters = compute_options(&notes, &selection, FacetLevel::Semester);
        assert_eq!(semesters, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_lower_options_empty_without_ancestor_selection() {
        let notes = catalogue();
        let selection = FacetSelection::new();

        // Universities are unconstrained; everything below needs ancestors.
        let universities = compute_options(&notes, &selection, FacetLevel::University);
        assert_eq!(universities, vec!["A", "B"]);
        assert!(compute_options(&notes, &selection, FacetLevel::Degree).is_empty());
        assert!(compute_options(&notes, &selection, FacetLevel::Subject).is_empty());
    }

    #[test]
    fn test_filter_matches_every_set_facet_exactly() {
        let notes = catalogue();
        let selection = selection_of(&[
            (FacetLevel::University, "A"),
            (FacetLevel::Degree, "CS"),
        ]);

        let filtered = filter_notes(&notes, &selection);

        assert_eq!(filtered.len(), 2);
        for note in &filtered {
            assert_eq!(note.metadata.university.as_deref(), Some("A"));
            assert_eq!(note.metadata.degree.as_deref(), Some("CS"));
        }
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let notes = catalogue();
        let selection = selection_of(&[(FacetLevel::University, "a")]);
        assert!(filter_notes(&notes, &selection).is_empty());
    }

    #[test]
    fn test_unpublished_and_excluded_never_surface() {
        let mut hidden = note("hidden", Some("A"), None, None, None);
        hidden.published = false;
        let mut excluded = note("excluded", Some("A"), None, None, None);
        excluded.exclude_from_main = true;
        let notes = vec![hidden, excluded, note("shown", Some("A"), None, None, None)];

        let filtered = filter_notes(&notes, &FacetSelection::new());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].slug, "shown");
    }

    #[test]
    fn test_setting_a_facet_clears_descendants_and_resets_page() {
        let mut selection = selection_of(&[
            (FacetLevel::University, "A"),
            (FacetLevel::Degree, "CS"),
            (FacetLevel::Semester, "1"),
            (FacetLevel::Subject, "Math"),
        ]);
        selection.set_page(3);

        selection.set(FacetLevel::Degree, Some("EE".to_string()));

        assert_eq!(selection.get(FacetLevel::University), Some("A"));
        assert_eq!(selection.get(FacetLevel::Degree), Some("EE"));
        assert_eq!(selection.get(FacetLevel::Semester), None);
        assert_eq!(selection.get(FacetLevel::Subject), None);
        assert_eq!(selection.page(), 1);
    }

    #[test]
    fn test_deselecting_a_facet_clears_descendants_too() {
        let mut selection = selection_of(&[
            (FacetLevel::University, "A"),
            (FacetLevel::Degree, "CS"),
            (FacetLevel::Semester, "1"),
        ]);

        selection.set(FacetLevel::University, None);

        for level in FacetLevel::ALL {
            assert_eq!(selection.get(level), None);
        }
    }

    #[test]
    fn test_from_parts_drops_facets_under_unset_ancestors() {
        let selection = FacetSelection::from_parts(
            None,
            Some("CS".to_string()),
            Some("1".to_string()),
            None,
            2,
        );

        for level in FacetLevel::ALL {
            assert_eq!(selection.get(level), None);
        }
        assert_eq!(selection.page(), 2);
    }

    #[test]
    fn test_pagination_boundaries() {
        let items: Vec<u32> = (0..13).collect();

        assert_eq!(total_pages(items.len(), NOTES_PER_PAGE), 3);
        assert_eq!(paginate(&items, 1, NOTES_PER_PAGE).len(), 6);
        assert_eq!(paginate(&items, 3, NOTES_PER_PAGE), &[12]);
        // Past the end: empty slice, no error
        assert!(paginate(&items, 4, NOTES_PER_PAGE).is_empty());
        assert!(paginate(&items, 0, NOTES_PER_PAGE).len() == 6); // page 0 treated as 1
    }

    #[test]
    fn test_pagination_covers_every_item_exactly_once() {
        let items: Vec<u32> = (0..25).collect();
        let pages = total_pages(items.len(), NOTES_PER_PAGE);

        let mut seen = 0;
        for page in 1..=pages {
            seen += paginate(&items, page, NOTES_PER_PAGE).len();
        }
        assert_eq!(seen, items.len());
    }

    #[test]
    fn test_query_string_projection() {
        let mut selection = selection_of(&[
            (FacetLevel::University, "Medicaps University"),
            (FacetLevel::Degree, "B Tech"),
        ]);
        selection.set_page(2);

        assert_eq!(
            selection.to_query_string(),
            "university=Medicaps%20University&degree=B%20Tech&page=2"
        );

        // Empty selection still carries the page
        assert_eq!(FacetSelection::new().to_query_string(), "page=1");
    }

    #[test]
    fn test_browse_reports_totals_and_slice() {
        let notes: Vec<Note> = (0..13)
            .map(|i| note(&format!("n{}", i), Some("A"), None, None, None))
            .collect();
        let mut selection = selection_of(&[(FacetLevel::University, "A")]);
        selection.set_page(3);

        let page = browse(&notes, &selection);

        assert_eq!(page.total_notes, 13);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.notes.len(), 1);
        assert_eq!(page.query, "university=A&page=3");

        selection.set_page(4);
        let empty = browse(&notes, &selection);
        assert!(empty.success);
        assert!(empty.notes.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_capped() {
        let mut notes: Vec<Note> = (0..60)
            .map(|i| {
                let mut n = note(&format!("s{}", i), None, None, None, None);
                n.title = format!("Operating Systems {}", i);
                n
            })
            .collect();
        let mut hidden = note("hidden", None, None, None, None);
        hidden.title = "Operating Systems secret".to_string();
        hidden.published = false;
        notes.push(hidden);

        let result = search_notes(&notes, "operating");

        assert_eq!(result.count, SEARCH_LIMIT);
        assert!(result.notes.iter().all(|n| n.published));

        assert_eq!(search_notes(&notes, "  ").count, 0);
    }
}
