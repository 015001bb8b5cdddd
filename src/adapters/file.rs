use crate::core::PageSource;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Serves a page already in memory, such as a saved copy of the schedule.
#[derive(Debug, Clone)]
pub struct StaticPageSource {
    html: String,
    origin: String,
}

impl StaticPageSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            origin: "inline page".to_string(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let html = fs::read_to_string(&path)?;
        Ok(Self {
            html,
            origin: path.as_ref().display().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PageSource for StaticPageSource {
    async fn fetch_page(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AzbaError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all("<p>Liste des zones activées</p>".as_bytes())
            .unwrap();

        let source = StaticPageSource::from_file(temp_file.path()).unwrap();
        assert!(source.fetch_page().await.unwrap().contains("activées"));
        assert_eq!(source.describe(), temp_file.path().display().to_string());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = StaticPageSource::from_file("/nonexistent/azba.html").unwrap_err();
        assert!(matches!(err, AzbaError::IoError(_)));
    }
}
