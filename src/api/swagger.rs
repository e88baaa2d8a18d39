use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes Service API",
        version = "1.0.0",
        description = "Backend for the Notes Buddy study-notes site.\n\n**Features:**\n- Faceted notes browsing (university → degree → semester → subject)\n- Fixed-size pagination with shareable query strings\n- Notes search\n- Google sign-in with admin allow-list",
        contact(
            name = "Notes Buddy Team"
        )
    ),
    paths(
        // Notes
        crate::api::notes::get_notes,
        crate::api::notes::get_facets,
        crate::api::notes::search_notes,

        // Auth
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::Note,
            crate::models::NoteMetadata,
            crate::models::SessionIdentity,
            crate::services::notes_service::NotesPageResponse,
            crate::services::notes_service::FacetOptionsResponse,
            crate::services::notes_service::SearchResponse,
            crate::services::auth_service::AuthResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Notes", description = "Notes catalogue browsing: cascading facet filters, pagination, and search."),
        (name = "Auth", description = "Google sign-in and session token endpoints."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
