use std::time::Duration;

use reqwest::Client;

const USER_AGENT: &str = concat!("restyle/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client. `timeout` of `None` leaves requests unbounded.
pub fn default_http_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build()
}
