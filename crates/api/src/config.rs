//! Server configuration loaded from environment variables.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// How the role of a newly registered user is decided.
///
/// The upstream deployments diverged here, so the policy is an explicit
/// configuration decision rather than a hardcoded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolePolicy {
    /// Ignore any caller-supplied role and assign `USER`.
    #[default]
    ForceDefault,
    /// Require the caller to supply a role (`USER` or `ADMIN`).
    CallerChoice,
}

impl RolePolicy {
    /// The configuration-file spelling, as reported by the health endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            RolePolicy::ForceDefault => "force-default",
            RolePolicy::CallerChoice => "caller-choice",
        }
    }
}

impl FromStr for RolePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force-default" => Ok(RolePolicy::ForceDefault),
            "caller-choice" => Ok(RolePolicy::CallerChoice),
            other => Err(format!(
                "unknown role policy '{other}' (expected force-default or caller-choice)"
            )),
        }
    }
}

/// Server configuration.
///
/// All fields except the JWT secret have defaults suitable for local
/// development; override via environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8081`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Token signing configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Role assignment policy for registration.
    pub role_policy: RolePolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `8081`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `REGISTRATION_ROLE_POLICY` | `force-default`         |
    ///
    /// # Panics
    ///
    /// Panics on malformed values or a missing `JWT_SECRET` -- we want
    /// misconfiguration to fail at startup, not at first request.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8081".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let role_policy: RolePolicy = std::env::var("REGISTRATION_ROLE_POLICY")
            .unwrap_or_else(|_| "force-default".into())
            .parse()
            .expect("REGISTRATION_ROLE_POLICY must be force-default or caller-choice");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            role_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_policy_parsing() {
        assert_eq!(
            "force-default".parse::<RolePolicy>().unwrap(),
            RolePolicy::ForceDefault
        );
        assert_eq!(
            "caller-choice".parse::<RolePolicy>().unwrap(),
            RolePolicy::CallerChoice
        );
        assert!("open-bar".parse::<RolePolicy>().is_err());
    }

    #[test]
    fn test_role_policy_as_str_round_trips() {
        for policy in [RolePolicy::ForceDefault, RolePolicy::CallerChoice] {
            assert_eq!(policy.as_str().parse::<RolePolicy>().unwrap(), policy);
        }
    }
}
