use bytes::Bytes;

use crate::naming;

/// A file received from the upload form. Lives only as long as the request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Name the converted file is offered under.
    pub fn download_name(&self) -> String {
        naming::output_file_name(&self.file_name)
    }

    pub fn has_accepted_extension(&self) -> bool {
        naming::has_input_extension(&self.file_name)
    }
}

/// A converted file ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn mp4(file_name: String, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: naming::OUTPUT_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
