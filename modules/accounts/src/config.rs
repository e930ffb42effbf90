use serde::{Deserialize, Serialize};

/// Tunables for the accounts module. Defaults match the mobile client's
/// expectations; override per deployment when needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsConfig {
    #[serde(default = "default_avatar_max_bytes")]
    pub avatar_max_bytes: usize,
    #[serde(default = "default_signed_url_ttl_sec")]
    pub signed_url_ttl_sec: u64,
    /// Confirmation codes expire after this many seconds.
    #[serde(default = "default_code_ttl_sec")]
    pub code_ttl_sec: i64,
    /// Minimum gap between two confirmation emails for the same user.
    #[serde(default = "default_resend_cooldown_sec")]
    pub resend_cooldown_sec: i64,
    #[serde(default = "default_family_code_min_len")]
    pub family_code_min_len: usize,
    #[serde(default = "default_family_code_max_len")]
    pub family_code_max_len: usize,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            avatar_max_bytes: default_avatar_max_bytes(),
            signed_url_ttl_sec: default_signed_url_ttl_sec(),
            code_ttl_sec: default_code_ttl_sec(),
            resend_cooldown_sec: default_resend_cooldown_sec(),
            family_code_min_len: default_family_code_min_len(),
            family_code_max_len: default_family_code_max_len(),
        }
    }
}

fn default_avatar_max_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_signed_url_ttl_sec() -> u64 {
    3600
}

fn default_code_ttl_sec() -> i64 {
    600
}

fn default_resend_cooldown_sec() -> i64 {
    60
}

fn default_family_code_min_len() -> usize {
    6
}

fn default_family_code_max_len() -> usize {
    10
}
