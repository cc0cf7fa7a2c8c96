use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_APP_URL: &str = "http://localhost:5173";
const DEFAULT_COOKIE_JAR: &str = ".vault-krate/cookies.json";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SupabaseConfig {
    pub url: String,
    #[serde(rename = "anonKey")]
    pub anon_key: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub supabase: SupabaseConfig,
    #[serde(rename = "apiBaseUrl")]
    pub api_base_url: String,
    #[serde(rename = "appUrl")]
    pub app_url: String,
    #[serde(rename = "vkSecret")]
    pub vk_secret: String,
    #[serde(rename = "cookieJar")]
    pub cookie_jar: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cookie_jar = var("VK_COOKIE_JAR").map(PathBuf::from).unwrap_or_else(|| {
            var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_COOKIE_JAR)
        });

        Self {
            supabase: SupabaseConfig {
                url: var("VK_SUPABASE_URL").unwrap_or_default(),
                anon_key: var("VK_SUPABASE_ANON_KEY").unwrap_or_default(),
            },
            api_base_url: var("VK_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            app_url: var("VK_APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
            vk_secret: var("VK_SECRET").unwrap_or_default(),
            cookie_jar,
        }
    }

    /// Names of the variables that are required for auth and admin features
    /// but were not provided.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.supabase.url.is_empty() {
            missing.push("VK_SUPABASE_URL");
        }
        if self.supabase.anon_key.is_empty() {
            missing.push("VK_SUPABASE_ANON_KEY");
        }
        if self.vk_secret.is_empty() {
            missing.push("VK_SECRET");
        }
        missing
    }

    pub fn is_secure(&self) -> bool {
        self.api_base_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("HOME", "/home/vk")]);

        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.app_url, "http://localhost:5173");
        assert_eq!(
            config.cookie_jar,
            PathBuf::from("/home/vk/.vault-krate/cookies.json")
        );
        assert!(!config.is_secure());
        assert_eq!(
            config.validate(),
            vec!["VK_SUPABASE_URL", "VK_SUPABASE_ANON_KEY", "VK_SECRET"]
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("VK_API_BASE_URL", "https://api.vault-krate.dev"),
            ("VK_SUPABASE_URL", "https://abc.supabase.co"),
            ("VK_SUPABASE_ANON_KEY", "anon"),
            ("VK_SECRET", "s3cret"),
            ("VK_COOKIE_JAR", "/tmp/jar.json"),
            ("VK_APP_URL", "  "),
        ]);

        assert!(config.is_secure());
        assert!(config.validate().is_empty());
        assert_eq!(config.cookie_jar, PathBuf::from("/tmp/jar.json"));
        assert_eq!(config.app_url, "http://localhost:5173");
    }
}
