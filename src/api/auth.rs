use crate::database::MongoDB;
use crate::services::auth_service::{self, AuthConfig};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub async fn google_auth() -> HttpResponse {
    log::info!("🔐 GET /auth/google - Generating OAuth URL");

    match auth_service::generate_google_oauth_url() {
        Ok(response) => {
            log::info!("✅ Google OAuth URL generated");
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("❌ Failed to generate Google OAuth URL: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    #[allow(dead_code)]
    state: Option<String>,
    error: Option<String>,
}

pub async fn google_callback(
    db: web::Data<MongoDB>,
    config: web::Data<AuthConfig>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    log::info!("🔐 GET /auth/callback - Processing Google sign-in");

    let frontend_url =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    if let Some(error) = &query.error {
        log::error!("❌ OAuth error: {}", error);
        return HttpResponse::Found()
            .append_header((
                "Location",
                format!("{}/sign-in?error={}", frontend_url, urlencoding::encode(error)),
            ))
            .finish();
    }

    let code = match &query.code {
        Some(c) => c,
        None => {
            log::error!("❌ No authorization code provided");
            return HttpResponse::Found()
                .append_header((
                    "Location",
                    format!("{}/sign-in?error=no_code", frontend_url),
                ))
                .finish();
        }
    };

    match auth_service::handle_google_callback(&db, code, &config.admin_emails).await {
        Ok(response) => {
            log::info!("✅ Google sign-in successful: {}", response.user.email);

            let redirect_url = format!(
                "{}/auth-callback?token={}&email={}&name={}",
                frontend_url,
                response.token,
                urlencoding::encode(&response.user.email),
                urlencoding::encode(&response.user.name)
            );

            HttpResponse::Found()
                .append_header(("Location", redirect_url))
                .finish()
        }
        Err(e) => {
            // Any resolution failure (database included) fails the sign-in;
            // the frontend shows its generic authentication error.
            log::error!("❌ Google sign-in failed: {}", e);
            HttpResponse::Found()
                .append_header((
                    "Location",
                    format!("{}/sign-in?error={}", frontend_url, urlencoding::encode(&e)),
                ))
                .finish()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    log::info!("✓ GET /auth/verify");

    let token = match bearer_token(&req) {
        Some(t) => t,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }))
        }
    };

    match auth_service::verify_token(token) {
        Ok(claims) => {
            log::info!("✅ Token valid for user: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "valid": true,
                "user_id": claims.sub,
                "email": claims.email,
                "exp": claims.exp
            }))
        }
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "valid": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Session identity carried by the token", body = crate::models::SessionIdentity),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /auth/me");

    let token = match bearer_token(&req) {
        Some(t) => t,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }))
        }
    };

    // Existing sessions are pure token passthrough: identity resolution only
    // runs again at the next sign-in.
    match auth_service::verify_token(token) {
        Ok(claims) => {
            let user = auth_service::session_from_claims(&claims);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "user": user
            }))
        }
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
