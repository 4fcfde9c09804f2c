use crate::{Error, Result};

/// Environment variable holding the Gemini credential
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_PORTFOLIO_VALUE: f64 = 10_000.0;

/// Application configuration resolved from the environment once at
/// startup. A missing AI credential is a configuration error here,
/// distinct from a runtime call failure.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub initial_portfolio_value: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = std::env::var(GEMINI_API_KEY_VAR)
            .map_err(|_| Error::MissingConfiguration(GEMINI_API_KEY_VAR))?;

        Ok(Self {
            gemini_api_key,
            initial_portfolio_value: initial_portfolio_value(),
        })
    }
}

/// Starting portfolio value for simulations, overridable via
/// INITIAL_PORTFOLIO_VALUE. A value that is set but unparsable is
/// loudly discarded rather than silently swallowed.
pub fn initial_portfolio_value() -> f64 {
    match std::env::var("INITIAL_PORTFOLIO_VALUE") {
        Ok(raw) => match raw.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "INITIAL_PORTFOLIO_VALUE {:?} is not a number, using default {}",
                    raw,
                    DEFAULT_PORTFOLIO_VALUE
                );
                DEFAULT_PORTFOLIO_VALUE
            }
        },
        Err(_) => DEFAULT_PORTFOLIO_VALUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        std::env::remove_var(GEMINI_API_KEY_VAR);

        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(GEMINI_API_KEY_VAR)));
    }

    // Single test so the env mutations cannot race each other
    #[test]
    fn test_portfolio_value_override_handling() {
        std::env::set_var("INITIAL_PORTFOLIO_VALUE", "12500");
        assert_eq!(initial_portfolio_value(), 12_500.0);

        std::env::set_var("INITIAL_PORTFOLIO_VALUE", "not-a-number");
        assert_eq!(initial_portfolio_value(), DEFAULT_PORTFOLIO_VALUE);

        std::env::remove_var("INITIAL_PORTFOLIO_VALUE");
        assert_eq!(initial_portfolio_value(), DEFAULT_PORTFOLIO_VALUE);
    }
}
