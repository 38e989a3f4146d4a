//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! services, so request handling never reads process-wide environment
//! variables; that keeps behaviour consistent across multi-threaded
//! runtimes and test harnesses.

use crate::error::{TemplateError, TemplateResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    template_data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::InvalidInput` when the data directory path
    /// is empty.
    pub fn new(template_data_dir: PathBuf) -> TemplateResult<Self> {
        if template_data_dir.as_os_str().is_empty() {
            return Err(TemplateError::InvalidInput(
                "template_data_dir cannot be empty".into(),
            ));
        }

        Ok(Self { template_data_dir })
    }

    pub fn template_data_dir(&self) -> &Path {
        &self.template_data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_path() {
        let config = CoreConfig::new(PathBuf::from("/template_data")).unwrap();
        assert_eq!(config.template_data_dir(), Path::new("/template_data"));
    }

    #[test]
    fn test_config_rejects_empty_path() {
        let result = CoreConfig::new(PathBuf::new());
        assert!(matches!(result, Err(TemplateError::InvalidInput(_))));
    }
}
