// src/core/net.rs

use std::{error::Error, time::Duration};

use crate::params::REQUEST_TIMEOUT_SECS;

/// Fetch-by-URL seam. The runner only ever talks to this trait, so tests
/// (and any future non-HTTP source) can swap in their own document source.
pub trait Fetch {
    /// Return the raw document body, or a transport error.
    /// Non-success responses are errors; callers must not feed a failed
    /// fetch into reconciliation.
    fn get(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Plain blocking HTTP(S) client.
pub struct HttpFetch {
    agent: ureq::Agent,
}

impl HttpFetch {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("ac_track/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetch {
    fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let body = self.agent.get(url).call()?.into_string()?;
        Ok(body)
    }
}
