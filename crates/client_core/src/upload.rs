use std::path::Path;

use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use shared::{domain::CountyId, protocol::FileUploadJson};

use crate::hash::sha256_hex;

/// A county file staged for upload. The hash is advisory; the server
/// recomputes it and reports the comparison as `hash_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub county_id: CountyId,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub hash: String,
}

impl FileUpload {
    pub fn new(
        county_id: CountyId,
        filename: impl Into<String>,
        bytes: Vec<u8>,
        hash: Option<String>,
    ) -> Self {
        let hash = hash.unwrap_or_else(|| sha256_hex(&bytes));
        Self {
            county_id,
            filename: filename.into(),
            bytes,
            hash,
        }
    }

    pub async fn from_path(
        county_id: CountyId,
        path: impl AsRef<Path>,
        hash: Option<String>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read upload '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self::new(county_id, filename, bytes, hash))
    }

    pub fn sent(&self) -> FileUploadJson {
        FileUploadJson {
            county_id: self.county_id,
            filename: self.filename.clone(),
            hash: self.hash.clone(),
        }
    }

    fn form(&self, file_field: &'static str) -> Result<Form> {
        if self.bytes.is_empty() {
            bail!("refusing to upload empty file '{}'", self.filename);
        }
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.filename.clone())
            .mime_str("text/csv")?;
        Ok(Form::new()
            .text("county", self.county_id.to_string())
            .part(file_field, part)
            .text("hash", self.hash.clone()))
    }
}

pub fn ballot_manifest_form(upload: &FileUpload) -> Result<Form> {
    upload.form("bmi_file")
}

pub fn cvr_export_form(upload: &FileUpload) -> Result<Form> {
    upload.form("cvr_file")
}

pub fn upload_sent(upload: &FileUpload) -> FileUploadJson {
    upload.sent()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_hash_when_none_given() {
        let upload = FileUpload::new(CountyId(1), "m.csv", b"abc".to_vec(), None);
        assert_eq!(
            upload.hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let given = FileUpload::new(CountyId(1), "m.csv", b"abc".to_vec(), Some("beef".into()));
        assert_eq!(given.hash, "beef");
    }

    #[test]
    fn empty_file_cannot_build_form() {
        let upload = FileUpload::new(CountyId(1), "empty.csv", Vec::new(), None);
        assert!(ballot_manifest_form(&upload).is_err());
        assert!(cvr_export_form(&upload).is_err());
    }

    #[tokio::test]
    async fn reads_file_name_and_bytes_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "rla_upload_{}.csv",
            std::process::id()
        ));
        tokio::fs::write(&path, b"county,batch\n1,2\n").await.expect("write");
        let upload = FileUpload::from_path(CountyId(4), &path, None)
            .await
            .expect("read");
        assert_eq!(upload.bytes, b"county,batch\n1,2\n");
        assert!(upload.filename.starts_with("rla_upload_"));
        assert_eq!(upload.sent().county_id, CountyId(4));
        tokio::fs::remove_file(&path).await.expect("cleanup");
    }
}
