use crate::schema::WaynebotConfig;

use super::helpers::validate_path;

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &WaynebotConfig) {
    let base = config.server.base_url.trim();
    let host = base
        .strip_prefix("https://")
        .or_else(|| base.strip_prefix("http://"));

    match host {
        None => errors.push(format!(
            "server.base_url = {base:?} must start with http:// or https://"
        )),
        Some(rest) if rest.trim_end_matches('/').is_empty() => {
            errors.push(format!("server.base_url = {base:?} has no host"));
        }
        Some(_) => {}
    }

    validate_path(errors, "server.ticket_path", &config.server.ticket_path);
    validate_path(errors, "server.ws_path", &config.server.ws_path);
}
