// Deserializable sender configuration

use super::{SenderBuilder, WebResourceSender, DEFAULT_BUFFER_SIZE};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sender options as they appear in a configuration file
///
/// Converted with [`SenderSettings::into_sender`], which applies the same
/// validation as [`SenderBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SenderSettings {
    #[serde(default)]
    pub gzip: bool,
    #[serde(default)]
    pub gzip_min_length: Option<u64>,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// `Expires` offset in seconds
    #[serde(default)]
    pub expires_secs: Option<u64>,
    #[serde(default)]
    pub cache_control: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for SenderSettings {
    fn default() -> Self {
        Self {
            gzip: false,
            gzip_min_length: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            expires_secs: None,
            cache_control: None,
        }
    }
}

impl SenderSettings {
    pub fn builder(&self) -> Result<SenderBuilder> {
        let mut builder = SenderBuilder::new().with_buffer_size(self.buffer_size)?;
        if self.gzip {
            builder = builder.with_gzip();
        }
        if let Some(min_length) = self.gzip_min_length {
            builder = builder.with_gzip_min_length(min_length);
        }
        if let Some(secs) = self.expires_secs {
            builder = builder.with_expires(Duration::from_secs(secs))?;
        }
        if let Some(cache_control) = &self.cache_control {
            builder = builder.with_cache_control_value(cache_control.as_str());
        }
        Ok(builder)
    }

    pub fn into_sender(self) -> Result<WebResourceSender> {
        Ok(self.builder()?.build())
    }
}
