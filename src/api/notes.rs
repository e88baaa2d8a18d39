use crate::content::ContentStore;
use crate::services::notes_service::{self, FacetSelection};
use crate::services::notes_service::{FacetOptionsResponse, NotesPageResponse, SearchResponse};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NotesQuery {
    pub university: Option<String>,
    pub degree: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
    /// Kept as a string so a malformed page degrades to 1 instead of a 400.
    pub page: Option<String>,
}

impl NotesQuery {
    fn selection(&self) -> FacetSelection {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(1);

        FacetSelection::from_parts(
            self.university.clone(),
            self.degree.clone(),
            self.semester.clone(),
            self.subject.clone(),
            page,
        )
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/notes",
    tag = "Notes",
    params(NotesQuery),
    responses(
        (status = 200, description = "Filtered, paginated notes. A page past the end returns an empty list, not an error.", body = NotesPageResponse)
    )
)]
pub async fn get_notes(
    content: web::Data<ContentStore>,
    query: web::Query<NotesQuery>,
) -> HttpResponse {
    let selection = query.selection();
    log::info!("📒 GET /notes - {}", selection.to_query_string());

    let response = notes_service::browse(content.notes(), &selection);
    HttpResponse::Ok().json(response)
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/facets",
    tag = "Notes",
    params(NotesQuery),
    responses(
        (status = 200, description = "Dropdown option sets conditioned on the current selection", body = FacetOptionsResponse)
    )
)]
pub async fn get_facets(
    content: web::Data<ContentStore>,
    query: web::Query<NotesQuery>,
) -> HttpResponse {
    let selection = query.selection();
    log::info!("🔽 GET /notes/facets - {}", selection.to_query_string());

    let response = notes_service::facet_options(content.notes(), &selection);
    HttpResponse::Ok().json(response)
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/search",
    tag = "Notes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search hits", body = SearchResponse)
    )
)]
pub async fn search_notes(
    content: web::Data<ContentStore>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let q = query.q.as_deref().unwrap_or("");
    log::info!("🔍 GET /notes/search - q: {}", q);

    let response = notes_service::search_notes(content.notes(), q);
    HttpResponse::Ok().json(response)
}
