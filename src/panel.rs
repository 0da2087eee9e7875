//! Thin client for the Pterodactyl panel client API (`/api/client`).
//!
//! Headers are rebuilt for every request from the client's immutable fields.
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct PanelClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    user_agent: String,
}

impl PanelClient {
    pub fn new(base_url: &str, api_key: &str, user_agent: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    fn headers(&self) -> [(&'static str, String); 4] {
        [
            ("Accept", "application/json".to_string()),
            ("Content-Type", "application/json".to_string()),
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("User-Agent", self.user_agent.clone()),
        ]
    }

    fn server_url(&self, server_id: &str, suffix: &str) -> String {
        format!("{}/api/client/servers/{server_id}{suffix}", self.base_url)
    }

    /// Fetch the server object, including `attributes` and `meta`.
    pub fn server_details(&self, server_id: &str) -> Result<Value> {
        let url = self.server_url(server_id, "");
        let mut request = self.agent.get(&url);
        for (name, value) in self.headers() {
            request = request.header(name, value);
        }
        request
            .call()
            .with_context(|| format!("GET {url}"))?
            .body_mut()
            .read_json()
            .with_context(|| format!("parse server details from {url}"))
    }

    pub fn has_permission(&self, server_id: &str, node: &str) -> Result<bool> {
        Ok(grants_permission(&self.server_details(server_id)?, node))
    }

    /// Send a console command; `Ok(false)` means the server is offline.
    pub fn send_command(&self, server_id: &str, command: &str) -> Result<bool> {
        let url = self.server_url(server_id, "/command");
        let mut request = self.agent.post(&url);
        for (name, value) in self.headers() {
            request = request.header(name, value);
        }
        match request.send_json(json!({ "command": command })) {
            Ok(_) => Ok(true),
            // The panel answers 502 when the daemon cannot reach a stopped server.
            Err(ureq::Error::StatusCode(502)) => Ok(false),
            Err(err) => Err(err).with_context(|| format!("POST {url}")),
        }
    }

    /// There is no power-state endpoint, so a suspended or installing server
    /// is offline and anything else is probed with a `ping` command.
    pub fn is_online(&self, server_id: &str) -> Result<bool> {
        let details = self.server_details(server_id)?;
        if is_unavailable(&details) {
            return Ok(false);
        }
        self.send_command(server_id, "ping")
    }
}

fn grants_permission(details: &Value, node: &str) -> bool {
    details["meta"]["user_permissions"]
        .as_array()
        .map(|permissions| {
            permissions
                .iter()
                .filter_map(Value::as_str)
                .any(|permission| permission == "*" || permission == node)
        })
        .unwrap_or(false)
}

fn is_unavailable(details: &Value) -> bool {
    let attributes = &details["attributes"];
    attributes["is_suspended"].as_bool().unwrap_or(false)
        || attributes["is_installing"].as_bool().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_built_per_client() {
        let first = PanelClient::new("https://panel.example/", "key-1", "ua/1", DEFAULT_TIMEOUT);
        let second = PanelClient::new("https://panel.example", "key-2", "ua/2", DEFAULT_TIMEOUT);

        assert_eq!(first.headers()[2].1, "Bearer key-1");
        assert_eq!(second.headers()[2].1, "Bearer key-2");
        assert_eq!(first.headers()[3].1, "ua/1");
        assert_eq!(
            first.server_url("abc123", "/command"),
            "https://panel.example/api/client/servers/abc123/command"
        );
    }

    #[test]
    fn permission_check_honors_wildcard() {
        let details = json!({"meta": {"user_permissions": ["control.console", "file.read"]}});
        assert!(grants_permission(&details, "control.console"));
        assert!(!grants_permission(&details, "control.start"));
        assert!(grants_permission(
            &json!({"meta": {"user_permissions": ["*"]}}),
            "control.start"
        ));
        assert!(!grants_permission(&json!({}), "control.start"));
    }

    #[test]
    fn suspended_or_installing_servers_are_unavailable() {
        assert!(is_unavailable(
            &json!({"attributes": {"is_suspended": true, "is_installing": false}})
        ));
        assert!(is_unavailable(&json!({"attributes": {"is_installing": true}})));
        assert!(!is_unavailable(
            &json!({"attributes": {"is_suspended": false, "is_installing": false}})
        ));
    }
}
