use std::sync::Arc;

use mkvconv_transcoder::ConverterConfig;

/// Shared application state passed to all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<ConverterConfig>,
}

impl AppState {
    pub fn new(converter: ConverterConfig) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }
}
