//! Dataset client for the episode JSON resource.
//!
//! This module fetches the published episode list over HTTP and parses it
//! into [`Episode`] records. Every call performs a fresh request; sharing a
//! single load across the application is the job of [`crate::store`].

use crate::error::Result;
use crate::types::{Dataset, Episode};
use log::{debug, error, info};
use std::time::Duration;

const USER_AGENT: &str = concat!("episode-browser/", env!("CARGO_PKG_VERSION"));

/// Parse a dataset document and return its `episodes` array.
///
/// # Examples
///
/// ```
/// let body = r#"{"episodes": [{"rank": 1, "title": "Rose", "series": 1,
///     "era": "Modern", "doctor": {"actor": "Christopher Eccleston",
///     "incarnation": "Ninth Doctor"}}]}"#;
/// let episodes = episode_browser::api::parse_episodes(body)?;
/// assert_eq!(episodes[0].title, "Rose");
/// # Ok::<(), episode_browser::error::AppError>(())
/// ```
pub fn parse_episodes(body: &str) -> Result<Vec<Episode>> {
    let dataset: Dataset = serde_json::from_str(body)?;
    Ok(dataset.episodes)
}

/// Fetch the episode dataset from `url`.
///
/// Performs exactly one GET request. Network errors, non-success HTTP
/// statuses and malformed JSON all come back as an error, which is also
/// logged here. There is no retry.
///
/// # Arguments
///
/// * `url` - Location of the dataset JSON
/// * `timeout` - Request timeout
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use std::time::Duration;
/// let url = episode_browser::config::DEFAULT_SOURCE_URL;
/// let episodes = episode_browser::api::fetch_episodes(url, Duration::from_secs(30)).await?;
/// println!("{} episodes", episodes.len());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_episodes(url: &str, timeout: Duration) -> Result<Vec<Episode>> {
    debug!("Fetching episode dataset from {}", url);

    let result = request_episodes(url, timeout).await;

    match &result {
        Ok(episodes) => info!("Loaded {} episodes", episodes.len()),
        Err(e) => error!("Error while fetching data from {}: {}", url, e),
    }

    result
}

async fn request_episodes(url: &str, timeout: Duration) -> Result<Vec<Episode>> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    debug!("Received {} bytes of episode data", body.len());

    parse_episodes(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::Era;

    const BODY: &str = r#"{
        "episodes": [
            {"rank": 1, "title": "Rose", "series": 1, "era": "Modern",
             "broadcast_date": "2005-03-26", "director": "Keith Boak",
             "writer": "Russell T Davies",
             "doctor": {"actor": "Christopher Eccleston", "incarnation": "Ninth Doctor"},
             "companion": {"actor": "Billie Piper", "character": "Rose Tyler"},
             "cast": [{"actor": "Camille Coduri", "character": "Jackie Tyler"}],
             "plot": "Shop assistant Rose meets the Doctor."},
            {"rank": 2, "title": "An Unearthly Child", "series": 1, "era": "Classic",
             "broadcast_date": "1963-11-23",
             "doctor": {"actor": "William Hartnell", "incarnation": "First Doctor"}}
        ]
    }"#;

    #[test]
    fn test_parse_episodes() {
        let episodes = parse_episodes(BODY).unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].title, "Rose");
        assert_eq!(episodes[1].era, Era::Classic);
        assert!(episodes[1].companion.is_none());
    }

    #[test]
    fn test_parse_episodes_missing_array() {
        let err = parse_episodes(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(err.is_data_load_failure());
    }

    #[test]
    fn test_parse_episodes_invalid_json() {
        let err = parse_episodes("<html>404</html>").unwrap_err();
        assert!(err.is_data_load_failure());
    }

    #[test]
    fn test_parse_episodes_tolerates_null_fields() {
        let body = r#"{"episodes": [
            {"rank": 1, "title": "Rose", "series": 1, "era": "Modern",
             "director": null, "writer": null,
             "doctor": {"actor": "Christopher Eccleston", "incarnation": "Ninth Doctor"},
             "companion": {"actor": null, "character": "Rose Tyler"}},
            {"rank": 2, "title": null, "series": 3, "era": "Modern",
             "doctor": {"actor": "David Tennant", "incarnation": "Tenth Doctor"}}
        ]}"#;
        let episodes = parse_episodes(body).unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].companion_actor(), None);
        assert_eq!(episodes[0].director, "");
        assert_eq!(episodes[1].title, "");
    }

    #[test]
    fn test_parse_episodes_empty_list() {
        let episodes = parse_episodes(r#"{"episodes": []}"#).unwrap();
        assert!(episodes.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_episodes_unreachable_host() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let result =
            fetch_episodes("http://127.0.0.1:9/episodes.json", Duration::from_secs(2)).await;
        let err = result.unwrap_err();
        assert!(err.is_data_load_failure());
    }
}
