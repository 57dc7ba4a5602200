//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# waynebot client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# https:// selects wss:// for the realtime connection.
base_url = "http://localhost:8080"
# ticket_path = "/api/ws/ticket"
# ws_path = "/ws"

[realtime]
# initial_retry_ms = 1000        # 1-600000
# max_retry_ms = 30000           # >= initial_retry_ms
# connect_timeout_secs = 15      # 1-300
# request_timeout_secs = 10      # 1-300
# event_buffer = 256             # 1-65536

[auth]
# Bearer token for ticket requests. WAYNEBOT_TOKEN overrides it.
# token = ""

[logging]
# level = "info"                 # trace, debug, info, warn, error
"##
}
