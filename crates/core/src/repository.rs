//! File-backed template storage for the store service.
//!
//! Each user owns at most one template, stored as a single JSON document at
//! `<data_dir>/<s1>/<s2>/<user_uuid>/template.json` (sharded by the first
//! four hex characters of the user id). The at-most-one rule is structural:
//! writes are an upsert keyed by the user, so two clients racing a
//! create-or-update decision cannot produce two stored templates.

use crate::config::CoreConfig;
use crate::error::{TemplateError, TemplateResult};
use crate::template::{PrescriptionTemplate, StoredTemplate};
use chrono::Utc;
use rxpad_uuid::{UserUuid, Uuid};
use std::fs;
use std::path::PathBuf;

const TEMPLATE_FILE_NAME: &str = "template.json";

/// Pure template storage operations - no API concerns
#[derive(Clone, Debug)]
pub struct TemplateRepository {
    config: CoreConfig,
}

impl TemplateRepository {
    /// Creates a repository over the configured data directory.
    ///
    /// Minimal I/O happens here; directories are created when first
    /// written to.
    pub fn new(config: CoreConfig) -> Self {
        Self { config }
    }

    fn user_dir(&self, user: &UserUuid) -> PathBuf {
        user.sharded_dir(self.config.template_data_dir())
    }

    fn template_path(&self, user: &UserUuid) -> PathBuf {
        self.user_dir(user).join(TEMPLATE_FILE_NAME)
    }

    /// Lists the user's stored templates.
    ///
    /// The result has zero or one entries. An unreadable or unparsable
    /// template file is logged as a warning and treated as absent; a
    /// listing never fails.
    pub fn list(&self, user: &UserUuid) -> Vec<StoredTemplate> {
        let path = self.template_path(user);
        if !path.is_file() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to read template {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<StoredTemplate>(&contents) {
            Ok(stored) => vec![stored],
            Err(e) => {
                tracing::warn!("failed to parse template {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Writes the user's template, creating it if none exists and
    /// overwriting it otherwise.
    ///
    /// Identity and `created_at` are preserved across overwrites;
    /// `updated_at` always moves forward. Returns the stored template and
    /// whether this write created it.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateError` when directory creation, serialisation, or
    /// the file write fails.
    pub fn upsert(
        &self,
        user: &UserUuid,
        template: PrescriptionTemplate,
    ) -> TemplateResult<(StoredTemplate, bool)> {
        let existing = self.list(user).into_iter().next();
        let created = existing.is_none();
        let now = Utc::now();

        let stored = StoredTemplate {
            id: existing
                .as_ref()
                .map(|t| t.id.clone())
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            components: template.components,
            color: template.color,
            created_at: existing.map(|t| t.created_at).unwrap_or(now),
            updated_at: now,
        };

        let dir = self.user_dir(user);
        fs::create_dir_all(&dir).map_err(TemplateError::TemplateDirCreation)?;

        let json =
            serde_json::to_string_pretty(&stored).map_err(TemplateError::Serialization)?;
        fs::write(self.template_path(user), json).map_err(TemplateError::FileWrite)?;

        if created {
            tracing::info!("created template {} for user {}", stored.id, user);
        } else {
            tracing::info!("updated template {} for user {}", stored.id, user);
        }

        Ok((stored, created))
    }

    /// Deletes the user's template by id.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::TemplateNotFound` when the user has no
    /// stored template or the id does not match it.
    pub fn delete(&self, user: &UserUuid, template_id: &str) -> TemplateResult<()> {
        let existing = self
            .list(user)
            .into_iter()
            .next()
            .ok_or_else(|| TemplateError::TemplateNotFound(template_id.to_owned()))?;

        if existing.id != template_id {
            return Err(TemplateError::TemplateNotFound(template_id.to_owned()));
        }

        fs::remove_file(self.template_path(user)).map_err(TemplateError::FileDelete)?;
        tracing::info!("deleted template {} for user {}", template_id, user);
        Ok(())
    }
}
