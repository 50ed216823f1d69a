use tracing::info;

/// Logs one `name = value` line per header pair, in wire order.
pub fn dump_headers(headers: &[(String, String)]) {
    for (name, value) in headers {
        info!("\t{}", header_line(name, value));
    }
}

pub fn header_line(name: &str, value: &str) -> String {
    format!("{} = {}", name, value)
}
