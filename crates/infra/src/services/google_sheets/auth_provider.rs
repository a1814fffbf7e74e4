use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

// https://developers.google.com/identity/protocols/oauth2/service-account#httprest

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SHEETS_OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// The fields of a Google service account key file this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
}

#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    // Access token expiry specified in seconds
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_ts: i64,
}

/// Exchanges a signed service-account JWT for a bearer token and caches it
/// until shortly before expiry.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cached: Mutex::new(None),
        }
    }

    /// Loads the service account key from `GOOGLE_CREDS_JSON`,
    /// `GOOGLE_CREDS_JSON_B64`, or the file at `GOOGLE_CREDS_PATH`
    /// (default `service-account.json`), in that order.
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = if let Ok(json) = std::env::var("GOOGLE_CREDS_JSON") {
            json
        } else if let Ok(encoded) = std::env::var("GOOGLE_CREDS_JSON_B64") {
            String::from_utf8(base64::decode(encoded)?)?
        } else {
            let path = std::env::var("GOOGLE_CREDS_PATH")
                .unwrap_or_else(|_| "service-account.json".into());
            std::fs::read_to_string(path)?
        };
        let key: ServiceAccountKey = serde_json::from_str(&raw)?;
        Ok(Self::new(key))
    }

    pub async fn access_token(&self) -> anyhow::Result<String> {
        let now = Utc::now().timestamp_millis();
        let one_minute_in_millis = 1000 * 60;
        if let Some(cached) = self.cached.lock().unwrap().as_ref() {
            // Current access token is still valid for at least one minute
            if now + one_minute_in_millis <= cached.expires_ts {
                return Ok(cached.access_token.clone());
            }
        }

        let assertion = self.signed_assertion(now)?;
        let params = [
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ];
        let client = reqwest::Client::new();
        let res = client.post(TOKEN_ENDPOINT).form(&params).send().await?;
        let tokens = res.json::<TokenResponse>().await?;

        let expires_ts = now + tokens.expires_in * 1000;
        *self.cached.lock().unwrap() = Some(CachedToken {
            access_token: tokens.access_token.clone(),
            expires_ts,
        });
        Ok(tokens.access_token)
    }

    fn signed_assertion(&self, now_millis: i64) -> anyhow::Result<String> {
        let iat = now_millis / 1000;
        let claims = GrantClaims {
            iss: &self.key.client_email,
            scope: SHEETS_OAUTH_SCOPE,
            aud: TOKEN_ENDPOINT,
            iat,
            exp: iat + 3600,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}
