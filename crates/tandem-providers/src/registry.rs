//! Provider registry — static specs for the supported LLM backends.
//!
//! Each `ProviderSpec` describes how to connect to a provider: keywords for
//! model matching, the API key env var, the default API base, and prefixing
//! quirks. The matching logic picks a provider for a given model name.

use std::collections::HashMap;

use tandem_core::config::ProviderConfig;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name (e.g. `"openrouter"`).
    pub name: &'static str,
    /// Keywords to match in model names (lowercase).
    pub keywords: &'static [&'static str],
    /// Environment variable for the API key.
    pub env_key: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    /// Prefix to prepend to model names for API routing
    /// (e.g. `Some("deepseek")` → `"deepseek/deepseek-chat"`).
    pub prefix: Option<&'static str>,
    /// Whether this is a gateway/aggregator, usable as fallback.
    pub is_gateway: bool,
    /// If the API key starts with this prefix, auto-detect this provider.
    pub detect_by_key_prefix: Option<&'static str>,
    /// Default API base URL.
    pub default_api_base: Option<&'static str>,
}

// ─────────────────────────────────────────────
// Supported providers (in matching priority order)
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    // 1. OpenRouter — gateway, matched by key prefix "sk-or-"
    ProviderSpec {
        name: "openrouter",
        keywords: &["openrouter"],
        env_key: "OPENROUTER_API_KEY",
        display_name: "OpenRouter",
        prefix: Some("openrouter"),
        is_gateway: true,
        detect_by_key_prefix: Some("sk-or-"),
        default_api_base: Some("https://openrouter.ai/api/v1"),
    },
    // 2. DeepSeek
    ProviderSpec {
        name: "deepseek",
        keywords: &["deepseek"],
        env_key: "DEEPSEEK_API_KEY",
        display_name: "DeepSeek",
        prefix: Some("deepseek"),
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: Some("https://api.deepseek.com/v1"),
    },
    // 3. Groq
    ProviderSpec {
        name: "groq",
        keywords: &["groq", "llama", "mixtral"],
        env_key: "GROQ_API_KEY",
        display_name: "Groq",
        prefix: None,
        is_gateway: false,
        detect_by_key_prefix: Some("gsk_"),
        default_api_base: Some("https://api.groq.com/openai/v1"),
    },
    // 4. vLLM — local/self-hosted, OpenAI-compatible
    ProviderSpec {
        name: "vllm",
        keywords: &["vllm", "local"],
        env_key: "VLLM_API_KEY",
        display_name: "vLLM",
        prefix: None,
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: Some("http://localhost:8000/v1"),
    },
    // 5. OpenAI — also the fallback for "gpt-*" models
    ProviderSpec {
        name: "openai",
        keywords: &["openai", "gpt", "o1", "o3"],
        env_key: "OPENAI_API_KEY",
        display_name: "OpenAI",
        prefix: None,
        is_gateway: false,
        detect_by_key_prefix: None,
        default_api_base: Some("https://api.openai.com/v1"),
    },
];

// ─────────────────────────────────────────────
// Matching
// ─────────────────────────────────────────────

/// Find a spec whose keywords match the (lowercased) model name.
pub fn find_by_model(model: &str) -> Option<&'static ProviderSpec> {
    let lower = model.to_lowercase();
    PROVIDERS
        .iter()
        .find(|spec| spec.keywords.iter().any(|kw| lower.contains(kw)))
}

/// Find a spec by its internal name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Resolve the model name for a provider (apply prefix if not present).
pub fn resolve_model_name(model: &str, spec: &ProviderSpec) -> String {
    match spec.prefix {
        Some(prefix) if !model.starts_with(&format!("{prefix}/")) => {
            format!("{prefix}/{model}")
        }
        _ => model.to_string(),
    }
}

/// Match a model name to a configured provider.
///
/// Priority:
/// 1. Keyword match with a configured API key
/// 2. Auto-detect by API key prefix (e.g. `sk-or-` → OpenRouter)
/// 3. Any configured gateway as fallback
///
/// A provider counts as configured when its config carries an API key or
/// its env var (e.g. `OPENAI_API_KEY`) is set; env keys are merged into
/// the returned config.
pub fn match_provider(
    model: &str,
    providers: &HashMap<String, ProviderConfig>,
) -> Option<(ProviderConfig, &'static ProviderSpec)> {
    // 1. Direct keyword match
    if let Some(spec) = find_by_model(model) {
        if let Some(config) = configured(spec, providers) {
            return Some((config, spec));
        }
    }

    // 2. Detect by key prefix
    for spec in PROVIDERS {
        if let Some(prefix) = spec.detect_by_key_prefix {
            if let Some(config) = configured(spec, providers) {
                if config.api_key.starts_with(prefix) {
                    return Some((config, spec));
                }
            }
        }
    }

    // 3. Gateway fallback
    for spec in PROVIDERS.iter().filter(|s| s.is_gateway) {
        if let Some(config) = configured(spec, providers) {
            return Some((config, spec));
        }
    }

    None
}

/// The provider's config with the env-var key merged in, if configured at all.
fn configured(
    spec: &ProviderSpec,
    providers: &HashMap<String, ProviderConfig>,
) -> Option<ProviderConfig> {
    let mut config = providers.get(spec.name).cloned().unwrap_or_default();
    if config.api_key.is_empty() {
        if let Ok(key) = std::env::var(spec.env_key) {
            config.api_key = key;
        }
    }
    config.is_configured().then_some(config)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
