use crate::schema::WaynebotConfig;

use super::helpers::validate_range;

pub(crate) fn validate_realtime(errors: &mut Vec<String>, config: &WaynebotConfig) {
    let rt = &config.realtime;
    validate_range(
        errors,
        "realtime.initial_retry_ms",
        rt.initial_retry_ms,
        1,
        600_000,
    );
    if rt.max_retry_ms < rt.initial_retry_ms {
        errors.push(format!(
            "realtime.max_retry_ms = {} is below realtime.initial_retry_ms = {}",
            rt.max_retry_ms, rt.initial_retry_ms
        ));
    }
    validate_range(
        errors,
        "realtime.connect_timeout_secs",
        rt.connect_timeout_secs,
        1,
        300,
    );
    validate_range(
        errors,
        "realtime.request_timeout_secs",
        rt.request_timeout_secs,
        1,
        300,
    );
    validate_range(errors, "realtime.event_buffer", rt.event_buffer, 1, 65_536);
}
