use std::env;

const DEFAULT_SITE_URL: &str = "https://nut-things.com";
const DEFAULT_RESEND_FROM: &str = "onboarding@resend.dev";
const DEFAULT_LOGO_URL: &str =
    "https://eouodqzlcwgnlocjfpho.supabase.co/storage/v1/object/public/product-images/logo/logo.png";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub mail: MailConfig,
    pub revalidate_secret: Option<String>,
    pub site_url: String,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Missing keys only fail when a campaign is actually sent.
    pub api_key: Option<String>,
    pub from: String,
    pub logo_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")?;
        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let mail = MailConfig {
            api_key: non_empty_var("RESEND_API_KEY"),
            from: non_empty_var("RESEND_FROM").unwrap_or_else(|| DEFAULT_RESEND_FROM.to_string()),
            logo_url: non_empty_var("EMAIL_LOGO_URL")
                .unwrap_or_else(|| DEFAULT_LOGO_URL.to_string()),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            mail,
            revalidate_secret: non_empty_var("REVALIDATE_SECRET"),
            site_url: normalize_site_url(
                &non_empty_var("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            ),
            cache_ttl_secs,
        })
    }

    /// Configuration for tests and tooling that never talk to external services.
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            mail: MailConfig {
                api_key: None,
                from: DEFAULT_RESEND_FROM.to_string(),
                logo_url: DEFAULT_LOGO_URL.to_string(),
            },
            revalidate_secret: Some("test-revalidate".to_string()),
            site_url: DEFAULT_SITE_URL.to_string(),
            cache_ttl_secs: 60,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn normalize_site_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_url_drops_trailing_slashes() {
        assert_eq!(normalize_site_url("https://example.com///"), "https://example.com");
        assert_eq!(normalize_site_url("https://example.com"), "https://example.com");
    }
}
