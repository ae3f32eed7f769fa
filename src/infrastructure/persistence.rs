use crate::domain::LikedBooks;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct FileRepository;

impl FileRepository {
    /// Writes the liked books, in order, as CSV with a header row.
    pub fn export_liked_csv(liked: &LikedBooks, filename: &str) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(filename)?;
        writer.write_record(["id", "title", "image_url", "caption"])?;
        for book in liked.books() {
            writer.write_record([&book.id, &book.title, &book.image_url, &book.caption])?;
        }
        writer.flush()?;
        Ok(filename.to_string())
    }
}
