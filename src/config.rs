//! Environment configuration.

use std::env;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Override for the strict setup-failure policy; `None` keeps the build
    /// default.
    pub strict_setup: Option<bool>,
    /// Override for the default cross-fade duration, in milliseconds.
    pub cross_fade_ms: Option<u64>,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            strict_setup: env_flag_opt("WINDOW_STACK_STRICT_SETUP"),
            cross_fade_ms: env_u64_opt("WINDOW_STACK_CROSS_FADE_MS"),
            debug: env_flag("WINDOW_STACK_DEBUG"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_flag_opt(key: &str) -> Option<bool> {
    match env::var(key) {
        Ok(value) if value == "1" => Some(true),
        Ok(value) if value == "0" => Some(false),
        _ => None,
    }
}

fn env_u64_opt(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::EnvConfig;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_leave_overrides_unset() {
        let _lock = env_lock();
        let _g1 = set_env_guard("WINDOW_STACK_STRICT_SETUP", None);
        let _g2 = set_env_guard("WINDOW_STACK_CROSS_FADE_MS", None);
        let _g3 = set_env_guard("WINDOW_STACK_DEBUG", None);

        let config = EnvConfig::from_env();
        assert!(config.strict_setup.is_none());
        assert!(config.cross_fade_ms.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn env_overrides_parse() {
        let _lock = env_lock();
        let _g1 = set_env_guard("WINDOW_STACK_STRICT_SETUP", Some("0"));
        let _g2 = set_env_guard("WINDOW_STACK_CROSS_FADE_MS", Some("350"));
        let _g3 = set_env_guard("WINDOW_STACK_DEBUG", Some("1"));

        let config = EnvConfig::from_env();
        assert_eq!(config.strict_setup, Some(false));
        assert_eq!(config.cross_fade_ms, Some(350));
        assert!(config.debug);
    }

    #[test]
    fn garbage_duration_is_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard("WINDOW_STACK_CROSS_FADE_MS", Some("soon"));
        let config = EnvConfig::from_env();
        assert!(config.cross_fade_ms.is_none());
    }
}
