//! Layer catalog cache
//!
//! The catalog document is a JSON object with a `Maps` array of layer descriptors. It is
//! pulled once and served from memory until a forced refresh or [`LayerCatalog::mark_stale`].
//! Lookups pull on demand and only answer when exactly one layer matches.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Layer;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read layer catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid layer catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("layer source unavailable: {0}")]
    Unavailable(String),
}

/// Where catalog documents come from.
#[async_trait]
pub trait LayerSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Layer>, CatalogError>;
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(rename = "Maps")]
    maps: Vec<Layer>,
}

/// Parse a catalog document.
///
/// # Errors
///
/// [`CatalogError::Parse`] when the text is not JSON or has no `Maps` array.
pub fn parse_catalog(json: &str) -> Result<Vec<Layer>, CatalogError> {
    let doc: CatalogDocument = serde_json::from_str(json)?;
    Ok(doc.maps)
}

/// Source backed by an in-memory document.
#[derive(Debug, Clone)]
pub struct StaticLayerSource {
    json: String,
}

impl StaticLayerSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl LayerSource for StaticLayerSource {
    async fn fetch(&self) -> Result<Vec<Layer>, CatalogError> {
        parse_catalog(&self.json)
    }
}

/// Source that re-reads a catalog file on every fetch.
#[derive(Debug, Clone)]
pub struct FileLayerSource {
    path: PathBuf,
}

impl FileLayerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LayerSource for FileLayerSource {
    async fn fetch(&self) -> Result<Vec<Layer>, CatalogError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_catalog(&text)
    }
}

/// Cached catalog over a [`LayerSource`].
#[derive(Debug)]
pub struct LayerCatalog<S> {
    source: S,
    layers: Vec<Layer>,
    pulled: bool,
}

impl<S: LayerSource> LayerCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            layers: Vec::new(),
            pulled: false,
        }
    }

    /// Fetch the catalog unless a pull already succeeded and `force` is false.
    ///
    /// A failed fetch keeps the previously cached layers and leaves the catalog stale.
    ///
    /// # Errors
    ///
    /// Whatever the source reports.
    pub async fn pull(&mut self, force: bool) -> Result<&[Layer], CatalogError> {
        if self.pulled && !force {
            tracing::trace!("layer catalog already pulled");
            return Ok(&self.layers);
        }
        if force {
            tracing::info!("forcing layer catalog refresh");
        }

        match self.source.fetch().await {
            Ok(layers) => {
                tracing::info!(count = layers.len(), "pulled layer catalog");
                self.layers = layers;
                self.pulled = true;
                Ok(&self.layers)
            }
            Err(err) => {
                tracing::warn!(error = %err, cached = self.layers.len(), "layer catalog pull failed");
                self.pulled = false;
                Err(err)
            }
        }
    }

    pub fn mark_stale(&mut self) {
        self.pulled = false;
    }

    pub fn is_stale(&self) -> bool {
        !self.pulled
    }

    /// Currently cached layers, without pulling.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    async fn unique(
        &mut self,
        matches: impl Fn(&Layer) -> bool,
    ) -> Result<Option<&Layer>, CatalogError> {
        self.pull(false).await?;
        let mut found = self.layers.iter().filter(|l| matches(l));
        Ok(match (found.next(), found.next()) {
            (Some(layer), None) => Some(layer),
            _ => None,
        })
    }

    /// # Errors
    ///
    /// Only when a pull was needed and failed.
    pub async fn layer_by_id(&mut self, layer_id: &str) -> Result<Option<&Layer>, CatalogError> {
        self.unique(|l| l.layer_id == layer_id).await
    }

    /// # Errors
    ///
    /// Only when a pull was needed and failed.
    pub async fn layer_by_classname(
        &mut self,
        classname: &str,
    ) -> Result<Option<&Layer>, CatalogError> {
        self.unique(|l| l.classname == classname).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_wiki_style_aliases_and_keeps_extra_keys() {
        let layers = parse_catalog(
            r#"{"Maps":[{"rawName":"Narva_RAAS_v1","levelId":"Narva","mapName":"Narva","gameMode":"RAAS","biome":"Forest"}]}"#,
        )
        .unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].layer_id, "Narva_RAAS_v1");
        assert_eq!(layers[0].classname, "Narva");
        assert_eq!(layers[0].level_name.as_deref(), Some("Narva"));
        assert_eq!(layers[0].game_mode.as_deref(), Some("RAAS"));
        assert_eq!(layers[0].extra["biome"], "Forest");
    }

    #[test]
    fn test_document_without_maps_is_rejected() {
        assert!(matches!(
            parse_catalog(r#"{"Layers":[]}"#),
            Err(CatalogError::Parse(_))
        ));
        assert!(parse_catalog("not json").is_err());
    }
}
