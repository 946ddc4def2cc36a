//! Configuration
//!
//! Options of an importance evaluation run and JSON persistence shared by
//! configs and ensembles.
use crate::errors::InfluenceError;
use crate::propagator::UpdateMethod;
use crate::ranking::{DocumentStrength, ImportanceValuesSign};
use crate::utils::validate_positive_int_parameter;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_update_method() -> UpdateMethod {
    UpdateMethod::SinglePoint
}
fn default_num_threads() -> Option<usize> {
    None
}
fn default_log_period() -> usize {
    0
}
fn default_document_strength() -> DocumentStrength {
    DocumentStrength::Raw
}
fn default_importance_values_sign() -> ImportanceValuesSign {
    ImportanceValuesSign::All
}
fn default_top_size() -> Option<usize> {
    None
}

/// Configuration of a document importance evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportanceConfig {
    /// Leaves recomputed at every leaf estimation iteration.
    #[serde(default = "default_update_method")]
    pub update_method: UpdateMethod,
    /// Worker threads, all available cores when not set.
    #[serde(default = "default_num_threads")]
    pub num_threads: Option<usize>,
    /// Log progress every N training documents, 0 disables it.
    #[serde(default = "default_log_period")]
    pub log_period: usize,
    /// Per evaluation document scores, or scores averaged over all of them.
    #[serde(default = "default_document_strength")]
    pub document_strength: DocumentStrength,
    /// Which scores to keep in the ranking.
    #[serde(default = "default_importance_values_sign")]
    pub importance_values_sign: ImportanceValuesSign,
    /// Maximum training documents per ranking, all when not set.
    #[serde(default = "default_top_size")]
    pub top_size: Option<usize>,
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        ImportanceConfig {
            update_method: default_update_method(),
            num_threads: default_num_threads(),
            log_period: default_log_period(),
            document_strength: default_document_strength(),
            importance_values_sign: default_importance_values_sign(),
            top_size: default_top_size(),
        }
    }
}

impl ImportanceConfig {
    /// Set the update method.
    /// * `update_method` - Leaves recomputed at every iteration.
    pub fn set_update_method(mut self, update_method: UpdateMethod) -> Self {
        self.update_method = update_method;
        self
    }

    /// Set the number of threads.
    /// * `num_threads` - Worker threads for both evaluation phases.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Set the log period.
    /// * `log_period` - Log progress every N training documents, 0 disables it.
    pub fn set_log_period(mut self, log_period: usize) -> Self {
        self.log_period = log_period;
        self
    }

    /// Set the document strength.
    pub fn set_document_strength(mut self, document_strength: DocumentStrength) -> Self {
        self.document_strength = document_strength;
        self
    }

    /// Set the importance values sign.
    pub fn set_importance_values_sign(mut self, importance_values_sign: ImportanceValuesSign) -> Self {
        self.importance_values_sign = importance_values_sign;
        self
    }

    /// Set the top size.
    /// * `top_size` - Maximum training documents per ranking.
    pub fn set_top_size(mut self, top_size: Option<usize>) -> Self {
        self.top_size = top_size;
        self
    }

    pub fn validate(&self) -> Result<(), InfluenceError> {
        if let UpdateMethod::TopKLeaves { top_size } = self.update_method {
            validate_positive_int_parameter(top_size, "update_method.top_size")?;
        }
        if let Some(num_threads) = self.num_threads {
            validate_positive_int_parameter(num_threads, "num_threads")?;
        }
        if let Some(top_size) = self.top_size {
            validate_positive_int_parameter(top_size, "top_size")?;
        }
        Ok(())
    }
}

/// IO
pub trait ModelIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), InfluenceError> {
        fs::write(path, self.json_dump()?).map_err(|e| InfluenceError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, InfluenceError> {
        serde_json::to_string(self).map_err(|e| InfluenceError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, InfluenceError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| InfluenceError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, InfluenceError> {
        let json_str = fs::read_to_string(path).map_err(|e| InfluenceError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ModelIO for ImportanceConfig {}
