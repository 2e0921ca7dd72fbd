//! Configuration module for the PetLar backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Default chat-assistant webhook URL (overridable via the settings API)
    pub chat_webhook_url: String,
    /// Phone number for the WhatsApp visit deep link, digits only
    pub visit_phone: String,
    /// Emails granted the admin role at signup
    pub admin_emails: Vec<String>,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("PETLAR_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("PETLAR_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid PETLAR_BIND_ADDR format");

        let log_level = env::var("PETLAR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let chat_webhook_url = env::var("PETLAR_CHAT_WEBHOOK_URL")
            .unwrap_or_else(|_| "https://n8n.garbellinitech.com.br/webhook/PetLar".to_string());

        let visit_phone =
            env::var("PETLAR_VISIT_PHONE").unwrap_or_else(|_| "5511999999999".to_string());

        let admin_emails = env::var("PETLAR_ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let session_ttl_hours = env::var("PETLAR_SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        Self {
            db_path,
            bind_addr,
            log_level,
            chat_webhook_url,
            visit_phone,
            admin_emails,
            session_ttl_hours,
        }
    }

    /// Whether an email is on the admin allowlist.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PETLAR_DB_PATH");
        env::remove_var("PETLAR_BIND_ADDR");
        env::remove_var("PETLAR_LOG_LEVEL");
        env::remove_var("PETLAR_CHAT_WEBHOOK_URL");
        env::remove_var("PETLAR_VISIT_PHONE");
        env::remove_var("PETLAR_ADMIN_EMAILS");
        env::remove_var("PETLAR_SESSION_TTL_HOURS");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(config.chat_webhook_url.starts_with("https://"));
        assert_eq!(config.visit_phone, "5511999999999");
        assert!(config.admin_emails.is_empty());
        assert_eq!(config.session_ttl_hours, 24);
    }

    #[test]
    fn test_admin_email_list() {
        let config = Config {
            db_path: PathBuf::from("./data/app.sqlite"),
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            log_level: "info".to_string(),
            chat_webhook_url: String::new(),
            visit_phone: String::new(),
            admin_emails: vec!["admin@petlar.com".to_string()],
            session_ttl_hours: 24,
        };

        assert!(config.is_admin_email("admin@petlar.com"));
        assert!(!config.is_admin_email("user@petlar.com"));
    }
}
