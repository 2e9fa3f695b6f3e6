//! Blocking HTTP download for remote locators.

use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::config::FetchSettings;

use super::error::FetchError;

/// Build the shared HTTP agent from `settings`. The overall deadline bounds a
/// download that trickles in under the per-read timeout.
pub fn agent(settings: &FetchSettings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_millis(settings.connect_timeout_ms))
        .timeout_read(Duration::from_millis(settings.read_timeout_ms))
        .timeout(Duration::from_millis(settings.total_timeout_ms))
        .build()
}

/// Download `url` fully into memory, refusing bodies above `max_bytes`.
pub fn fetch_bytes(agent: &ureq::Agent, url: &Url, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let response = agent.get(url.as_str()).call().map_err(|error| match error {
        ureq::Error::Status(status, _) => FetchError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => FetchError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    })?;

    if let Some(len) = response
        .header("Content-Length")
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        if len > max_bytes {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                limit: max_bytes,
            });
        }
    }

    let mut bytes = Vec::new();
    // One extra byte tells an oversized body apart from one that fits exactly.
    response
        .into_reader()
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|source| FetchError::Io {
            url: url.to_string(),
            source,
        })?;

    if bytes.len() as u64 > max_bytes {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            limit: max_bytes,
        });
    }

    tracing::debug!(url = %url, bytes = bytes.len(), "fetched remote track");
    Ok(bytes)
}
