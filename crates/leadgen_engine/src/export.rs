use leadgen_core::{ExportFileList, ExportFormat, ExportRequest, ExportResult, Message};

use crate::client::ApiClient;
use crate::types::ApiError;

impl ApiClient {
    /// Requests an export; the returned `download_url` is made absolute.
    pub async fn export(
        &self,
        format: ExportFormat,
        request: &ExportRequest,
    ) -> Result<ExportResult, ApiError> {
        let mut result: ExportResult = self
            .post(&["export", format.path_segment()], Some(request))
            .await?;
        result.download_url = self.download_url(&result.filename);
        Ok(result)
    }

    /// Download location for an export file, with the filename percent-encoded.
    pub fn download_url(&self, filename: &str) -> String {
        match self.endpoint(&["export", "download", filename]) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}/export/download/{}", self.base_url(), filename),
        }
    }

    pub async fn list_export_files(&self) -> Result<ExportFileList, ApiError> {
        self.get(&["export", "files"]).await
    }

    pub async fn delete_export_file(&self, filename: &str) -> Result<Message, ApiError> {
        self.delete(&["export", "delete", filename]).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{ApiClient, ApiSettings};

    #[test]
    fn download_url_encodes_filename() {
        let api = ApiClient::new(&ApiSettings::default()).unwrap();
        assert_eq!(
            api.download_url("leads 2024/05.xlsx"),
            "http://localhost:5000/api/export/download/leads%202024%2F05.xlsx"
        );
    }
}
