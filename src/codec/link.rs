//! Share links: `<base>?config=<encoded>`

use url::{Url, form_urlencoded};

use crate::core::Configuration;

const CONFIG_PARAM: &str = "config";

/// Attach an encoded configuration to `base_url`, replacing any previous one
pub(crate) fn share_link(base_url: &str, encoded: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != CONFIG_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(CONFIG_PARAM, encoded);
    Ok(url)
}

/// The encoded configuration carried by `input`
///
/// `input` may be a full link, a bare `?config=...` query, or the encoded
/// string itself. A link without a `config` parameter yields `None`.
fn encoded_from_link(input: &str) -> Option<String> {
    let input = input.trim();
    let find = |query: &str| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == CONFIG_PARAM)
            .map(|(_, v)| v.into_owned())
    };

    if let Ok(url) = Url::parse(input) {
        return url.query().and_then(find);
    }
    match input.split_once('?') {
        Some((_, query)) => find(query),
        None => Some(input.to_string()),
    }
}

/// Configuration restored from a link; anything unreadable yields the default
pub(crate) fn config_from_link(input: &str) -> Configuration {
    match encoded_from_link(input) {
        Some(encoded) => super::decode(&encoded).unwrap_or_default(),
        None => {
            tracing::debug!("link has no {CONFIG_PARAM} parameter, using defaults");
            Configuration::default()
        }
    }
}
