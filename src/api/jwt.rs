use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const SESSION_TOKEN_TYPE: &str = "session";

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Uses OnceLock for thread-safe lazy initialization.
/// The service is initialized once on first use and reused for all subsequent requests,
/// so a generated secret stays stable for the lifetime of the process.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Admin session claims (subject = admin email)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for issuing and validating admin sessions
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_hours: u64,
}

impl JwtService {
    pub fn new(secret: &str, session_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_hours,
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        // 获取 JWT secret，如果为空则生成一个安全的随机值
        let jwt_secret = Some(config.auth.jwt_secret.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                use tracing::warn;
                warn!("JWT secret not configured or empty, generating secure random token");
                crate::utils::generate_secure_token(32)
            });

        Self::new(&jwt_secret, config.auth.session_hours)
    }

    pub fn session_hours(&self) -> u64 {
        self.session_hours
    }

    /// Issue a session token for the given admin
    pub fn issue_session(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<(String, SessionClaims), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: email.to_string(),
            name: name.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.session_hours as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    /// Validate a session token (signature, expiry, token type)
    pub fn validate_session(
        &self,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;

        // Verify token type
        if token_data.claims.token_type != SESSION_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}
