mod api;
mod content;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::auth_service::AuthConfig;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let content_path =
        env::var("NOTES_CONTENT_PATH").unwrap_or_else(|_| "content/notes.json".to_string());

    log::info!("🚀 Starting Notes Service...");
    log::info!("📊 Database: {}", database_url);

    // Load the immutable notes catalogue
    let content = content::ContentStore::load(&content_path).expect("Failed to load notes catalogue");
    let content_data = web::Data::new(content);

    // Initialize MongoDB connection (users collection for sign-in)
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");
    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // Admin allow-list, read once and passed down explicitly
    let auth_config = web::Data::new(AuthConfig {
        admin_emails: env::var("ADMIN_EMAILS").unwrap_or_default(),
    });

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(content_data.clone())
            .app_data(db_data.clone())
            .app_data(auth_config.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Notes catalogue: faceted browsing, dropdown options, search
            .service(
                web::scope("/api/v1/notes")
                    .route("/facets", web::get().to(api::notes::get_facets))
                    .route("/search", web::get().to(api::notes::search_notes))
                    .route("", web::get().to(api::notes::get_notes)),
            )
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/google", web::get().to(api::auth::google_auth))
                    .route("/callback", web::get().to(api::auth::google_callback))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .route("/me", web::get().to(api::auth::get_me)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
