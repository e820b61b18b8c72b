use sha2::{Digest, Sha256};
use url::Url;

/// Filesystem-safe, deterministic export name: `glit-{user}--{short_hash(url)}.json`.
///
/// The user part is the last path segment of the profile URL.
pub fn deterministic_export_filename(profile_url: &str) -> String {
    let user = Url::parse(profile_url.trim())
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .unwrap_or_default();
    let sanitized = sanitize(&user);
    let hash = short_hash(profile_url.trim());
    format!("glit-{sanitized}--{hash}.json")
}

fn sanitize(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            c
        } else {
            '_'
        };
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut cleaned = compacted.trim_matches(&['_', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "user".to_string();
    }
    cleaned.truncate(64);
    cleaned
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
