// Destination store: the immutable master lists behind every explore screen
use crate::catalog_xml::catalog_from_xml_str;
use crate::destination::{Destination, DestinationCatalog};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// Error types for loading a catalog
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("XML parse error: {0}")]
    XmlParse(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Catalog has no destinations")]
    EmptyCatalog,

    #[error("Invalid destination {city:?}: {reason}")]
    InvalidDestination { city: String, reason: String },
}

// Sample file paths, relative to the crate root
pub const SAMPLE_JSON_PATH: &str = "samples/destinations.json";
pub const SAMPLE_XML_PATH: &str = "samples/destinations.xml";

const BUILTIN_CATALOG_JSON: &str = include_str!("../samples/destinations.json");

/// Somewhere a catalog can be loaded from.
#[async_trait]
pub trait DestinationSource: Send + Sync {
    async fn load(&self) -> Result<DestinationCatalog, StoreError>;

    // Short label for log lines
    fn describe(&self) -> String;
}

// The dataset compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

#[async_trait]
impl DestinationSource for BuiltinSource {
    async fn load(&self) -> Result<DestinationCatalog, StoreError> {
        catalog_from_json_str(BUILTIN_CATALOG_JSON)
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DestinationSource for JsonFileSource {
    async fn load(&self) -> Result<DestinationCatalog, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        catalog_from_json_str(&content)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[derive(Debug, Clone)]
pub struct XmlFileSource {
    path: PathBuf,
}

impl XmlFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DestinationSource for XmlFileSource {
    async fn load(&self) -> Result<DestinationCatalog, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        catalog_from_xml_str(&content)
    }

    fn describe(&self) -> String {
        format!("xml:{}", self.path.display())
    }
}

pub fn catalog_from_json_str(json: &str) -> Result<DestinationCatalog, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::JsonParse(e.to_string()))
}

/// Immutable destination, hotel and restaurant lists.
///
/// Built once per session and shared behind an `Arc`; nothing mutates it
/// after construction, so readers never lock.
#[derive(Debug, Clone)]
pub struct DestinationStore {
    destinations: Vec<Destination>,
    hotels: Vec<Destination>,
    restaurants: Vec<Destination>,
}

impl DestinationStore {
    pub fn from_catalog(catalog: DestinationCatalog) -> Result<Self, StoreError> {
        if catalog.destinations.is_empty() {
            return Err(StoreError::EmptyCatalog);
        }

        let all = catalog
            .destinations
            .iter()
            .chain(&catalog.hotels)
            .chain(&catalog.restaurants);
        for entry in all {
            if entry.city.name.trim().is_empty() {
                return Err(StoreError::InvalidDestination {
                    city: entry.city.name.clone(),
                    reason: "blank city name".to_string(),
                });
            }
        }

        Ok(Self {
            destinations: catalog.destinations,
            hotels: catalog.hotels,
            restaurants: catalog.restaurants,
        })
    }

    pub async fn load<S>(source: &S) -> Result<Self, StoreError>
    where
        S: DestinationSource + ?Sized,
    {
        debug!(source = %source.describe(), "Loading destination catalog");
        let store = Self::from_catalog(source.load().await?)?;

        info!(
            source = %source.describe(),
            destinations = store.destinations.len(),
            hotels = store.hotels.len(),
            restaurants = store.restaurants.len(),
            "Destination store ready"
        );
        Ok(store)
    }

    // Store backed by the bundled dataset
    pub fn builtin() -> Result<Self, StoreError> {
        Self::from_catalog(catalog_from_json_str(BUILTIN_CATALOG_JSON)?)
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn hotels(&self) -> &[Destination] {
        &self.hotels
    }

    pub fn restaurants(&self) -> &[Destination] {
        &self.restaurants
    }

    // First destination whose city name matches exactly; absence is not an error
    pub fn find_destination_by_city(&self, city_name: &str) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| destination.city.name == city_name)
    }
}
