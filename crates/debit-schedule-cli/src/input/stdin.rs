use serde_json::Value;
use std::io::{self, Read};

/// Read a piped request body from stdin.
/// Returns None when stdin is a terminal or the pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let body = buffer.trim();
    if body.is_empty() {
        return Ok(None);
    }

    tracing::debug!(bytes = body.len(), "read request body from stdin");
    Ok(Some(serde_json::from_str(body)?))
}
