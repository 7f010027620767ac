//! URL source classification.
//!
//! Decides which metadata strategy applies to a URL. Video platform URLs are
//! recognised by domain (watch links, playlist links, `youtu.be` short links,
//! channels and any other path on the domain); everything else is generic.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Matches the video platform's domains, with or without a scheme.
static VIDEO_PLATFORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.|m\.|music\.)?(youtube\.com|youtu\.be)/.+$")
        .expect("video platform regex should compile")
});

/// Which extraction strategy a URL is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A video platform URL, resolved through the platform API.
    VideoPlatform,
    /// Anything else, resolved by scraping Open Graph tags.
    Generic,
}

/// The result of classifying a URL.
///
/// Both ids may be absent even for [`SourceKind::VideoPlatform`], e.g. for a
/// channel page or a short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSource {
    pub kind: SourceKind,
    pub video_id: Option<String>,
    pub playlist_id: Option<String>,
}

impl ClassifiedSource {
    fn generic() -> Self {
        Self {
            kind: SourceKind::Generic,
            video_id: None,
            playlist_id: None,
        }
    }
}

/// Classify a raw URL string.
pub fn classify(raw: &str) -> ClassifiedSource {
    let raw = raw.trim();
    if !VIDEO_PLATFORM_RE.is_match(raw) {
        return ClassifiedSource::generic();
    }

    let parsed = Url::parse(raw).or_else(|_| Url::parse(&format!("https://{raw}")));
    let (video_id, playlist_id) = match parsed {
        Ok(url) => (query_value(&url, "v"), query_value(&url, "list")),
        Err(_) => (None, None),
    };

    ClassifiedSource {
        kind: SourceKind::VideoPlatform,
        video_id,
        playlist_id,
    }
}

/// First non-empty value of a query parameter.
fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
