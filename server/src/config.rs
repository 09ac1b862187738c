pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";
pub const DEFAULT_MAX_LIST: usize = 5_000;

/// How many fresh slugs `create` tries before giving up with a conflict.
pub const SLUG_ATTEMPTS: usize = 4;
pub const SLUG_PREFIX_MAX_CHARS: usize = 40;
pub const SLUG_SUFFIX_CHARS: usize = 6;

pub fn server_port() -> u16 {
    std::env::var("MEADOW_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn static_dir() -> String {
    std::env::var("MEADOW_STATIC_DIR")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_owned())
}

pub fn max_list() -> usize {
    std::env::var("MEADOW_MAX_LIST")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MAX_LIST)
}

pub fn seed_welcome_enabled() -> bool {
    std::env::var("MEADOW_SEED_WELCOME")
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_on_garbage_and_zero() {
        temp_env::with_var("MEADOW_PORT", Some("nope"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("MEADOW_PORT", Some("0"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("MEADOW_PORT", Some("8080"), || {
            assert_eq!(server_port(), 8080);
        });
    }

    #[test]
    fn seed_flag_accepts_common_spellings() {
        temp_env::with_var("MEADOW_SEED_WELCOME", Some("OFF"), || {
            assert!(!seed_welcome_enabled());
        });
        temp_env::with_var("MEADOW_SEED_WELCOME", Some(" yes "), || {
            assert!(seed_welcome_enabled());
        });
        temp_env::with_var_unset("MEADOW_SEED_WELCOME", || {
            assert!(seed_welcome_enabled());
        });
    }

    #[test]
    fn max_list_rejects_zero() {
        temp_env::with_var("MEADOW_MAX_LIST", Some("0"), || {
            assert_eq!(max_list(), DEFAULT_MAX_LIST);
        });
        temp_env::with_var("MEADOW_MAX_LIST", Some("25"), || {
            assert_eq!(max_list(), 25);
        });
    }
}
