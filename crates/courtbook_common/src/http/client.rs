// --- File: crates/courtbook_common/src/http/client.rs ---
use reqwest::{redirect, Client};
use std::time::Duration;

const USER_AGENT: &str = concat!("courtbook/", env!("CARGO_PKG_VERSION"));

/// Connecting never takes longer than this, whatever the request timeout.
const MAX_CONNECT_SECS: u64 = 10;

/// Builds the client used for backend round trips.
///
/// `timeout_secs` bounds a whole request (at least one second). Redirects are
/// followed up to five hops when `follow_redirects` is set.
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(timeout_secs.max(1));
    let policy = if follow_redirects {
        redirect::Policy::limited(5)
    } else {
        redirect::Policy::none()
    };
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(MAX_CONNECT_SECS)))
        .redirect(policy)
        .build()
}
