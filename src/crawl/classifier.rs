// src/crawl/classifier.rs
// =============================================================================
// Decides which discovered links are worth crawling.
//
// A link is eligible when:
// 1. It parses as an http/https URL
// 2. Its host is exactly the seed's host (www.example.com != example.com)
// 3. Its path doesn't end in a non-content file extension (.png, .css, .pdf...)
//
// Everything here is a pure function: no I/O, no shared state.
// =============================================================================

use url::Url;

// File extensions that never lead to an HTML page worth reading
//
// Matched case-insensitively against the end of the URL path only, so
// "/download?file=a.pdf" is still eligible but "/files/A.PDF" is not.
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    // stylesheets and scripts
    "css", "js", //
    // images and fonts
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "bmp", "woff", "woff2", "ttf", "eot",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", //
    // archives and binaries
    "zip", "gz", "tar", "rar", "7z", "exe", "dmg", //
    // audio and video
    "mp3", "mp4", "avi", "mov", "wav", "webm",
];

// Checks whether `candidate` should be crawled for a crawl rooted at `seed`
//
// Returns false for empty or unparseable candidates
pub fn is_eligible(candidate: &str, seed: &Url) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => is_eligible_url(&url, seed),
        Err(_) => false,
    }
}

// Same as is_eligible, for callers that already hold a parsed URL
pub fn is_eligible_url(candidate: &Url, seed: &Url) -> bool {
    if candidate.scheme() != "http" && candidate.scheme() != "https" {
        return false;
    }

    // Same-origin constraint: exact host match, no subdomain generalization
    match (candidate.host_str(), seed.host_str()) {
        (Some(host), Some(seed_host)) if host == seed_host => {}
        _ => return false,
    }

    !has_skipped_extension(candidate.path())
}

fn has_skipped_extension(path: &str) -> bool {
    let path = path.to_ascii_lowercase();

    SKIPPED_EXTENSIONS.iter().any(|ext| {
        path.len() > ext.len()
            && path.ends_with(ext)
            && path.as_bytes()[path.len() - ext.len() - 1] == b'.'
    })
}

// Turns a URL into the key used by the visited set
//
// Parsing lowercases the scheme and host and fills in an empty path ("/");
// the fragment is dropped because it never changes what the server returns.
pub fn normalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    url.set_fragment(None);
    Some(url.into())
}
