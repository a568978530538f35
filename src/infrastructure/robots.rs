//! robots.txt gate
//!
//! The policy is fetched once at startup through the same [`PageFetcher`] (and
//! therefore the same headers) as every other request. Hosts that answer a
//! header-less client with 403 would otherwise look like a blanket disallow.

use robotstxt::DefaultMatcher;
use tracing::{info, warn};
use url::Url;

use crate::infrastructure::http_client::{FetchError, PageFetcher};

/// Crawling rules declared by the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// robots.txt body to evaluate
    Rules(String),
    /// 401/403 on robots.txt
    DisallowAll,
    /// Missing robots.txt or any other failure
    Unrestricted,
}

impl RobotsPolicy {
    /// Map a robots.txt fetch outcome to a policy
    pub fn from_fetch_result(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(body) => Self::Rules(body),
            Err(FetchError::HttpStatus { status: 401 | 403, .. }) => Self::DisallowAll,
            Err(_) => Self::Unrestricted,
        }
    }
}

/// Answers `can_fetch(url)` for the rest of the run
#[derive(Debug, Clone)]
pub struct RobotsGate {
    policy: RobotsPolicy,
    agent: String,
}

impl RobotsGate {
    pub fn new(policy: RobotsPolicy, agent: impl Into<String>) -> Self {
        Self {
            policy,
            agent: agent.into(),
        }
    }

    /// Fetch `<base>/robots.txt` and build the gate
    pub async fn load(fetcher: &dyn PageFetcher, base: &Url, agent: &str) -> Self {
        let robots_url = match base.join("/robots.txt") {
            Ok(url) => url,
            Err(e) => {
                warn!("Could not build robots.txt URL for {}: {} - proceeding without rules", base, e);
                return Self::new(RobotsPolicy::Unrestricted, agent);
            }
        };

        let result = fetcher.fetch_html(robots_url.as_str()).await;
        if let Err(e) = &result {
            match e.status() {
                Some(401 | 403) => warn!("robots.txt access denied ({}) - treating as disallow all", e),
                _ => warn!("Could not fetch robots.txt: {} - proceeding carefully", e),
            }
        }

        let policy = RobotsPolicy::from_fetch_result(result);
        info!("robots.txt policy: {}", policy.describe());
        Self::new(policy, agent)
    }

    pub const fn policy(&self) -> &RobotsPolicy {
        &self.policy
    }

    /// Whether the declared agent may fetch `url`
    pub fn can_fetch(&self, url: &str) -> bool {
        self.allowed_for(&self.agent, url)
    }

    /// Whether `agent` may fetch `url`; `*` groups apply when no specific group matches
    pub fn allowed_for(&self, agent: &str, url: &str) -> bool {
        match &self.policy {
            RobotsPolicy::Rules(body) => DefaultMatcher::default().one_agent_allowed_by_robots(body, agent, url),
            RobotsPolicy::DisallowAll => false,
            RobotsPolicy::Unrestricted => true,
        }
    }

    /// Startup check: the run aborts only when the site root is closed to
    /// both the declared agent and the wildcard agent
    pub fn allows_site_root(&self, base: &Url) -> bool {
        let root = base.join("/").map_or_else(|_| base.to_string(), |u| u.to_string());
        self.allowed_for(&self.agent, &root) || self.allowed_for("*", &root)
    }
}

impl RobotsPolicy {
    fn describe(&self) -> &'static str {
        match self {
            Self::Rules(_) => "rules declared",
            Self::DisallowAll => "disallow all",
            Self::Unrestricted => "no restrictions declared",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticPageFetcher;

    const ROBOTS: &str = "User-agent: *\nDisallow: /carrito/\nDisallow: /mi-cuenta/\n";

    #[test]
    fn test_rules_gate_paths() {
        let gate = RobotsGate::new(RobotsPolicy::Rules(ROBOTS.to_string()), "WCMeilisearchBot");
        assert!(gate.can_fetch("https://panuts.com/producto/malbec-reserva/"));
        assert!(!gate.can_fetch("https://panuts.com/carrito/"));
    }

    #[test]
    fn test_specific_group_overrides_wildcard() {
        let body = "User-agent: WCMeilisearchBot\nDisallow: /\n\nUser-agent: *\nAllow: /\n";
        let gate = RobotsGate::new(RobotsPolicy::Rules(body.to_string()), "WCMeilisearchBot");
        let base = Url::parse("https://panuts.com").unwrap();
        assert!(!gate.can_fetch("https://panuts.com/tienda/"));
        assert!(gate.allows_site_root(&base));
    }

    #[test]
    fn test_root_closed_to_everyone_aborts() {
        let gate = RobotsGate::new(RobotsPolicy::Rules("User-agent: *\nDisallow: /\n".into()), "WCMeilisearchBot");
        assert!(!gate.allows_site_root(&Url::parse("https://panuts.com").unwrap()));
    }

    #[test]
    fn test_policy_from_status() {
        let forbidden = Err(FetchError::HttpStatus { status: 403, url: String::new() });
        let missing = Err(FetchError::HttpStatus { status: 404, url: String::new() });
        let timeout = Err(FetchError::Timeout { url: String::new() });

        assert_eq!(RobotsPolicy::from_fetch_result(forbidden), RobotsPolicy::DisallowAll);
        assert_eq!(RobotsPolicy::from_fetch_result(missing), RobotsPolicy::Unrestricted);
        assert_eq!(RobotsPolicy::from_fetch_result(timeout), RobotsPolicy::Unrestricted);
    }

    #[tokio::test]
    async fn test_load_uses_fetcher() {
        let fetcher = StaticPageFetcher::new().with_status("https://panuts.com/robots.txt", 401);
        let base = Url::parse("https://panuts.com").unwrap();

        let gate = RobotsGate::load(&fetcher, &base, "WCMeilisearchBot").await;

        assert_eq!(gate.policy(), &RobotsPolicy::DisallowAll);
        assert!(!gate.can_fetch("https://panuts.com/tienda/"));
        assert_eq!(fetcher.requests(), vec!["https://panuts.com/robots.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_robots_is_unrestricted() {
        let fetcher = StaticPageFetcher::new();
        let base = Url::parse("https://panuts.com").unwrap();

        let gate = RobotsGate::load(&fetcher, &base, "WCMeilisearchBot").await;

        assert_eq!(gate.policy(), &RobotsPolicy::Unrestricted);
        assert!(gate.allows_site_root(&base));
    }
}
