use bytes::Bytes;

const MAX_EXTENSION_LEN: usize = 5;

/// Audio bytes and metadata submitted by a client for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAudio {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedAudio {
    pub fn new(filename: String, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename,
            content_type,
            data,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension of the client filename, if it is short and alphanumeric.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty()
            || ext.is_empty()
            || ext.len() > MAX_EXTENSION_LEN
            || !ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Extension to store the upload under: the filename's when usable,
    /// otherwise one implied by an `audio/*` content type.
    pub fn audio_extension(&self) -> Option<String> {
        self.extension().or_else(|| {
            self.content_type
                .as_deref()
                .and_then(extension_for_content_type)
                .map(str::to_string)
        })
    }
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "audio/webm" => Some("webm"),
        "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => Some("wav"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/ogg" => Some("ogg"),
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some("m4a"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        _ => None,
    }
}
