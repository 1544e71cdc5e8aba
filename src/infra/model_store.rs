// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// Reads (and, for fixtures, writes) the three artifacts that
// make up a trained price model. All are JSON files in one
// directory:
//
//   models/
//     price_model.json       ← array of 39 weights
//     price_model_bias.json  ← a single number
//     scalers.json           ← {"price": {"mean": [..], "std": [..],
//                                         "numeric_features": [..]}}
//
// Loading happens once at start-up; the result is a validated,
// immutable Model.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::ml::model::{Model, Scaler};

pub const WEIGHTS_FILE: &str = "price_model.json";
pub const BIAS_FILE:    &str = "price_model_bias.json";
pub const SCALERS_FILE: &str = "scalers.json";

/// Key of the price scaler inside `scalers.json`.
pub const PRICE_SCALER: &str = "price";

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self) -> Result<Model> {
        let weights: Vec<f64> = self.read_json(WEIGHTS_FILE)?;
        let bias: f64 = self.read_json(BIAS_FILE)?;
        let mut scalers: BTreeMap<String, Scaler> = self.read_json(SCALERS_FILE)?;

        let scaler = scalers.remove(PRICE_SCALER).ok_or_else(|| {
            anyhow!("'{}' has no '{}' scaler", self.dir.join(SCALERS_FILE).display(), PRICE_SCALER)
        })?;

        tracing::debug!(
            features = ?scaler.numeric_features(),
            weights = weights.len(),
            "Read model artifacts"
        );

        Model::new(weights, bias, scaler)
            .with_context(|| format!("Invalid model artifacts in '{}'", self.dir.display()))
    }

    /// Write a model in the same layout `load` reads.
    pub fn save(&self, model: &Model) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let scalers = BTreeMap::from([(PRICE_SCALER.to_string(), model.scaler().clone())]);
        self.write_json(WEIGHTS_FILE, &model.weights())?;
        self.write_json(BIAS_FILE, &model.bias())?;
        self.write_json(SCALERS_FILE, &scalers)?;

        tracing::debug!("Saved model artifacts to '{}'", self.dir.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))
    }
}
