pub const FALLBACK_TITLE: &str = "Unknown title";
pub const FALLBACK_CAPTION: &str = "No description available";
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder.png?height=300&width=200";
pub const CAPTION_LIMIT: usize = 100;
pub const ELLIPSIS: &str = "...";

/// Raw volume metadata as returned by the lookup service.
///
/// Every field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// A display-ready book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub caption: String,
}

impl Book {
    /// Maps service metadata into a book, filling in fallbacks for missing fields.
    ///
    /// Blank strings count as missing; other text is kept as given.
    pub fn from_metadata(id: impl Into<String>, metadata: &VolumeMetadata) -> Self {
        let title = non_empty(&metadata.title)
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let image_url = non_empty(&metadata.thumbnail)
            .map(str::to_string)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        let caption = non_empty(&metadata.description)
            .map(truncate_caption)
            .unwrap_or_else(|| FALLBACK_CAPTION.to_string());

        Self {
            id: id.into(),
            title,
            image_url,
            caption,
        }
    }

    /// Image location to show, substituting the placeholder when the URL is unusable.
    pub fn display_image_url(&self) -> &str {
        match reqwest::Url::parse(&self.image_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => &self.image_url,
            _ => PLACEHOLDER_IMAGE,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// First `CAPTION_LIMIT` characters of a description followed by an ellipsis.
pub fn truncate_caption(description: &str) -> String {
    let mut caption: String = description.chars().take(CAPTION_LIMIT).collect();
    caption.push_str(ELLIPSIS);
    caption
}
