use rand::Rng;

/// Common desktop user agents
const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Identity a session presents to the target site.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub user_agent: String,
    pub accept_language: String,
}

impl Fingerprint {
    /// Pick a random desktop user agent.
    pub fn randomized() -> Self {
        let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
        Self::with_user_agent(USER_AGENTS[idx])
    }

    /// Fixed identity, used when randomisation is disabled.
    pub fn stable() -> Self {
        Self::with_user_agent(USER_AGENTS[0])
    }

    fn with_user_agent(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}
