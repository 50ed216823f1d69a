use std::io::{self, Write};

use serde_json::{Map, Value};
use tracing::{debug, info};

/// Re-indents `raw` with two spaces if it holds a JSON object.
pub fn pretty_json(raw: &str) -> Option<String> {
    let object: Map<String, Value> = serde_json::from_str(raw).ok()?;
    serde_json::to_string_pretty(&object).ok()
}

/// Logs every query parameter at debug level. In verbose mode the first
/// value of each key is also printed to `out`, pretty-printed when it
/// decodes as JSON and verbatim otherwise.
pub fn inspect_query<W: Write>(
    params: &[(String, Vec<String>)],
    verbose: bool,
    out: &mut W,
) -> io::Result<()> {
    for (key, values) in params {
        debug!("Parameter {} is {:?}", key, values);
    }

    if !verbose {
        return Ok(());
    }

    for (key, values) in params {
        let Some(first) = values.first() else {
            continue;
        };
        info!("Parameter {} is", key);
        match pretty_json(first) {
            Some(pretty) => {
                debug!("It is JSON - pretty print");
                writeln!(out, "{}", pretty)?;
            }
            None => {
                debug!("Not JSON format printing plain");
                writeln!(out, "{}", first)?;
            }
        }
    }

    Ok(())
}
