use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use crate::core::Model;
use crate::error::AppError;

use super::builtin::builtin_models;

/// Immutable model catalog, loaded once at startup
#[derive(Debug, Clone)]
pub(crate) struct Catalog {
    models: Vec<Model>,
}

impl Catalog {
    pub(crate) fn builtin() -> Self {
        Self {
            models: builtin_models(),
        }
    }

    pub(crate) fn from_models(models: Vec<Model>) -> Self {
        Self {
            models: models.into_iter().filter(is_usable).collect(),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let models: Vec<Model> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| AppError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_models(models))
    }

    /// Load the catalog file if given, falling back to the builtin catalog
    pub(crate) fn load(path: Option<&Path>) -> Self {
        let start = Instant::now();

        let Some(path) = path else {
            let db = Self::builtin();
            tracing::debug!(models = db.models.len(), "using builtin catalog");
            return db;
        };

        match Self::load_from_file(path) {
            Ok(db) if !db.models.is_empty() => {
                tracing::info!(
                    "Loaded {} models from {} ({:.2}ms)",
                    db.models.len(),
                    path.display(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
                db
            }
            Ok(_) => {
                tracing::warn!("{} has no usable models, using builtin catalog", path.display());
                Self::builtin()
            }
            Err(e) => {
                tracing::warn!("{e}, using builtin catalog");
                Self::builtin()
            }
        }
    }

    pub(crate) fn models(&self) -> &[Model] {
        &self.models
    }

    /// Case-insensitive lookup by id
    pub(crate) fn find(&self, id: &str) -> Result<&Model, AppError> {
        self.models
            .iter()
            .find(|m| m.id.eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| AppError::UnknownModel { id: id.to_string() })
    }
}

fn is_usable(model: &Model) -> bool {
    let rate_ok = |r: f64| r.is_finite() && r >= 0.0;
    let ok = !model.id.trim().is_empty()
        && rate_ok(model.input_cost)
        && rate_ok(model.output_cost)
        && model.cache_cost.is_none_or(rate_ok);
    if !ok {
        tracing::warn!(model = %model.id, "dropping catalog entry with invalid rates");
    }
    ok
}
