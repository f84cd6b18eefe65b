//! Extract query: upload a rich document for server-side text extraction

use super::{Query, QueryType};
use crate::client::request::Request;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Streams a file to the `update/extract` handler
#[derive(Debug, Clone)]
pub struct ExtractQuery {
    file: PathBuf,
    literals: Vec<(String, String)>,
    commit: bool,
    extract_only: bool,
}

impl ExtractQuery {
    pub fn new(file: impl AsRef<Path>) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            literals: Vec::new(),
            commit: false,
            extract_only: false,
        }
    }

    /// Literal field value stored with the extracted document
    pub fn literal(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.literals.push((field.into(), value.into()));
        self
    }

    pub fn commit(mut self, commit: bool) -> Self {
        self.commit = commit;
        self
    }

    pub fn extract_only(mut self, extract_only: bool) -> Self {
        self.extract_only = extract_only;
        self
    }
}

impl Query for ExtractQuery {
    fn query_type(&self) -> QueryType {
        QueryType::Extract
    }

    fn handler(&self) -> &str {
        "update/extract"
    }

    fn build_request(&self) -> Result<Request> {
        let mut request = Request::post(self.handler())
            .header("Content-Type: application/octet-stream")
            .file_upload(&self.file);

        for (field, value) in &self.literals {
            request.add_param(format!("literal.{}", field), value);
        }
        if self.commit {
            request.add_param("commit", "true");
        }
        if self.extract_only {
            request.add_param("extractOnly", "true");
        }

        Ok(request.param("wt", "json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_request() {
        let request = ExtractQuery::new("/tmp/report.pdf")
            .literal("id", "report-1")
            .commit(true)
            .build_request()
            .unwrap();

        assert_eq!(request.file_upload.as_deref(), Some(Path::new("/tmp/report.pdf")));
        assert_eq!(
            request.uri(),
            "update/extract?literal.id=report-1&commit=true&wt=json"
        );
        assert!(request.raw_data.is_none());
    }
}
