//! Google Books volumes lookup over blocking HTTP.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::trace;

use crate::domain::{BookLookup, Isbn13, LookupError, VolumeMetadata};

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<VolumeInfo> for VolumeMetadata {
    fn from(info: VolumeInfo) -> Self {
        Self {
            title: info.title,
            description: info.description,
            thumbnail: info.image_links.and_then(|links| links.thumbnail),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Extracts the first volume from a volumes response body.
///
/// A missing or empty `items` list yields `Ok(None)`.
pub fn parse_volumes(body: &str) -> Result<Option<VolumeMetadata>, LookupError> {
    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|volume| volume.volume_info.into()))
}

pub struct GoogleBooksClient {
    client: Client,
    base_url: Url,
}

impl GoogleBooksClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let base_url = Url::parse(base_url).map_err(|e| LookupError::Transport(e.to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `<base>?q=isbn:<id>`
    pub fn lookup_url(&self, isbn: &Isbn13) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&format!("q=isbn:{isbn}")));
        url
    }
}

impl BookLookup for GoogleBooksClient {
    fn lookup(&self, isbn: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
        let url = self.lookup_url(isbn);
        trace!(%url, "looking up candidate");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        parse_volumes(&response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_item() {
        let body = r#"{
            "kind": "books#volumes",
            "totalItems": 2,
            "items": [
                {
                    "volumeInfo": {
                        "title": "First",
                        "description": "Opening lines",
                        "imageLinks": {
                            "smallThumbnail": "http://books.example/s.jpg",
                            "thumbnail": "http://books.example/t.jpg"
                        }
                    }
                },
                { "volumeInfo": { "title": "Second" } }
            ]
        }"#;

        let metadata = parse_volumes(body).unwrap().unwrap();
        assert_eq!(metadata.title.as_deref(), Some("First"));
        assert_eq!(metadata.description.as_deref(), Some("Opening lines"));
        assert_eq!(metadata.thumbnail.as_deref(), Some("http://books.example/t.jpg"));
    }

    #[test]
    fn test_parse_no_items() {
        assert_eq!(parse_volumes(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap(), None);
        assert_eq!(parse_volumes(r#"{"items":[]}"#).unwrap(), None);
        assert_eq!(parse_volumes(r#"{"items":null}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_sparse_volume() {
        let metadata = parse_volumes(r#"{"items":[{}]}"#).unwrap().unwrap();
        assert_eq!(metadata, VolumeMetadata::default());

        let metadata = parse_volumes(r#"{"items":[{"volumeInfo":{"imageLinks":{}}}]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(metadata.thumbnail, None);
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        assert!(matches!(parse_volumes("<html>"), Err(LookupError::Decode(_))));
    }

    #[test]
    fn test_lookup_url() {
        let client = GoogleBooksClient::new(DEFAULT_API_URL, Duration::from_secs(5)).unwrap();
        let isbn = Isbn13::parse("9784091234568").unwrap();
        assert_eq!(
            client.lookup_url(&isbn).as_str(),
            "https://www.googleapis.com/books/v1/volumes?q=isbn:9784091234568"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(GoogleBooksClient::new("not a url", Duration::from_secs(5)).is_err());
    }
}
