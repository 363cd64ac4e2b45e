/// Multipart field carrying an uploaded route file.
pub const UPLOAD_FIELD: &str = "geojson_file";
/// Multipart field carrying a sample identifier.
pub const SAMPLE_FIELD: &str = "demo_file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Input for one optimization job: exactly one of an upload or a sample id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Upload(UploadedFile),
    Sample { identifier: String },
}

impl JobRequest {
    /// Prefers the upload when present, otherwise falls back to the sample
    /// identifier, which may be empty. The backend rejects an empty one.
    pub fn from_inputs(upload: Option<UploadedFile>, sample: impl Into<String>) -> Self {
        match upload {
            Some(file) => JobRequest::Upload(file),
            None => JobRequest::Sample {
                identifier: sample.into(),
            },
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            JobRequest::Upload(_) => UPLOAD_FIELD,
            JobRequest::Sample { .. } => SAMPLE_FIELD,
        }
    }

    /// True for a sample request without an identifier.
    pub fn is_blank(&self) -> bool {
        matches!(self, JobRequest::Sample { identifier } if identifier.trim().is_empty())
    }

    /// Short description for logs; never includes file contents.
    pub fn describe(&self) -> String {
        match self {
            JobRequest::Upload(file) => {
                format!("upload {} ({} bytes)", file.file_name, file.bytes.len())
            }
            JobRequest::Sample { identifier } => format!("sample {identifier:?}"),
        }
    }
}
