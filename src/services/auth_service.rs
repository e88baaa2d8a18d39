use crate::database::MongoDB;
use crate::models::{SessionIdentity, UserRecord};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user record id
    pub email: String,
    pub name: String,
    pub image: String,
    pub blocked: bool,
    pub is_admin: bool,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

/// Profile handed back by the identity provider after a successful external
/// authentication. This service never performs the handshake itself beyond
/// the code exchange.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

// Response structures
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: SessionIdentity,
}

#[derive(Debug, Serialize)]
pub struct GoogleAuthUrlResponse {
    pub success: bool,
    pub auth_url: String,
    pub state: String,
}

/// Process-wide auth configuration, read once in main and passed down so the
/// resolution logic itself never touches the environment.
#[derive(Clone)]
pub struct AuthConfig {
    /// Comma-separated admin allow-list (`ADMIN_EMAILS`).
    pub admin_emails: String,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "notes-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "notes-api".to_string())
}

/// Membership in the comma-separated allow-list, entries trimmed, exact
/// match. Parsed on every evaluation so allow-list changes apply at the next
/// sign-in without touching stored records.
pub fn is_admin_email(email: &str, admin_emails: &str) -> bool {
    admin_emails
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .any(|entry| entry == email)
}

/// Runs once per fresh sign-in: find-or-create the user record, backfill the
/// legacy `Blocked` field, derive the admin flag. Requests reusing an
/// existing token never come through here; the token is passed through
/// unchanged.
///
/// Any database failure fails the whole sign-in. No retry, no partial
/// commit; the caller surfaces it as a generic authentication error.
pub async fn resolve_identity(
    db: &MongoDB,
    identity: &ExternalIdentity,
    prior: Option<&Claims>,
    admin_emails: &str,
) -> Result<SessionIdentity, String> {
    let collection = db.collection::<UserRecord>("users");
    let email = &identity.email;

    let existing = collection
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let record = match existing {
        Some(record) => {
            if record.blocked.is_none() {
                // Legacy record from before the Blocked field existed.
                // Backfill false; an operator-set value is never touched,
                // which the $exists guard also enforces on the write side.
                collection
                    .update_one(
                        doc! { "email": email, "Blocked": { "$exists": false } },
                        doc! { "$set": { "Blocked": false } },
                    )
                    .await
                    .map_err(|e| format!("Failed to backfill Blocked flag: {}", e))?;
            }
            record
        }
        None => {
            let new_record = UserRecord {
                _id: Some(ObjectId::new()),
                email: email.clone(),
                name: pick_field(identity.name.as_deref(), prior.map(|c| c.name.as_str()), ""),
                image: pick_field(identity.image.as_deref(), prior.map(|c| c.image.as_str()), ""),
                blocked: Some(false),
                created_at: Some(BsonDateTime::now()),
            };

            // Find-then-insert, not an atomic upsert: a simultaneous first
            // sign-in for the same email loses to the unique email index and
            // fails that attempt.
            collection
                .insert_one(&new_record)
                .await
                .map_err(|e| format!("Failed to create user: {}", e))?;

            log::info!("✅ Created user record for {}", email);

            new_record
        }
    };

    // Fresh profile values win; prior token values, then the stored record,
    // fill the gaps.
    let name = pick_field(identity.name.as_deref(), prior.map(|c| c.name.as_str()), &record.name);
    let image = pick_field(identity.image.as_deref(), prior.map(|c| c.image.as_str()), &record.image);

    Ok(SessionIdentity {
        id: record._id.map(|id| id.to_hex()).unwrap_or_default(),
        email: record.email.clone(),
        name,
        image,
        blocked: record.blocked.unwrap_or(false),
        is_admin: is_admin_email(email, admin_emails),
    })
}

/// Fresh value, else prior token value, else stored value (empty string when
/// nothing is known).
fn pick_field(fresh: Option<&str>, prior: Option<&str>, stored: &str) -> String {
    fresh
        .filter(|v| !v.is_empty())
        .or_else(|| prior.filter(|v| !v.is_empty()))
        .unwrap_or(stored)
        .to_string()
}

// Generate JWT token carrying the resolved session identity
pub fn generate_jwt(identity: &SessionIdentity) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: identity.id.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        image: identity.image.clone(),
        blocked: identity.blocked,
        is_admin: identity.is_admin,
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Session view of an already-issued token. Token passthrough: no database
/// access, no allow-list recomputation until the next sign-in.
pub fn session_from_claims(claims: &Claims) -> SessionIdentity {
    SessionIdentity {
        id: claims.sub.clone(),
        email: claims.email.clone(),
        name: claims.name.clone(),
        image: claims.image.clone(),
        blocked: claims.blocked,
        is_admin: claims.is_admin,
    }
}

// Generate Google OAuth URL
pub fn generate_google_oauth_url() -> Result<GoogleAuthUrlResponse, String> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| "GOOGLE_CLIENT_ID not configured".to_string())?;

    let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI")
        .unwrap_or_else(|_| "http://localhost:3002/api/v1/auth/callback".to_string());

    // Generate state for CSRF protection
    let state = Uuid::new_v4().to_string();

    let params = vec![
        ("client_id", client_id.as_str()),
        ("redirect_uri", redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("state", state.as_str()),
        ("access_type", "offline"),
        ("prompt", "select_account"),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!("https://accounts.google.com/o/oauth2/v2/auth?{}", query_string);

    Ok(GoogleAuthUrlResponse {
        success: true,
        auth_url,
        state,
    })
}

// Handle Google OAuth callback: exchange the code, fetch the profile, then
// run identity resolution and issue the session token.
pub async fn handle_google_callback(
    db: &MongoDB,
    code: &str,
    admin_emails: &str,
) -> Result<AuthResponse, String> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| "GOOGLE_CLIENT_ID not configured".to_string())?;
    let client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
        .map_err(|_| "GOOGLE_CLIENT_SECRET not configured".to_string())?;
    let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI")
        .unwrap_or_else(|_| "http://localhost:3002/api/v1/auth/callback".to_string());

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let token_response = client
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("code", code),
            ("client_id", &client_id),
            ("client_secret", &client_secret),
            ("redirect_uri", &redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| format!("Failed to exchange code: {}", e))?;

    if !token_response.status().is_success() {
        return Err("Failed to exchange authorization code".to_string());
    }

    let tokens: serde_json::Value = token_response
        .json()
        .await
        .map_err(|e| format!("Failed to parse token response: {}", e))?;

    let access_token = tokens["access_token"]
        .as_str()
        .ok_or_else(|| "No access token in response".to_string())?;

    // Get user info
    let user_info_response = client
        .get("https://www.googleapis.com/oauth2/v2/userinfo")
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to get user info: {}", e))?;

    let user_info: serde_json::Value = user_info_response
        .json()
        .await
        .map_err(|e| format!("Failed to parse user info: {}", e))?;

    let email = user_info["email"]
        .as_str()
        .ok_or_else(|| "No email in user info".to_string())?;

    let identity = ExternalIdentity {
        email: email.to_string(),
        name: user_info["name"].as_str().map(String::from),
        image: user_info["picture"].as_str().map(String::from),
    };

    let session = resolve_identity(db, &identity, None, admin_emails).await?;
    let token = generate_jwt(&session)?;

    log::info!(
        "✅ Sign-in resolved for {} (admin: {}, blocked: {})",
        session.email,
        session.is_admin,
        session.blocked
    );

    Ok(AuthResponse {
        success: true,
        token,
        user: session,
    })
}
