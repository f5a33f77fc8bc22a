use std::io::{self, Read};

/// Piped stdin contents, or `None` when stdin is a terminal or empty.
pub fn read_piped() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
