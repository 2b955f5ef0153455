// Destination catalog and suggestion engine for the Crane travel app

pub mod calendar;
pub mod catalog_xml;
pub mod destination;
pub mod engine;
pub mod logging;
pub mod store;
pub mod suggestions;

// Re-export key types for convenience
pub use calendar::CalendarState;
pub use destination::{City, Destination, DestinationCatalog};
pub use engine::{
    EngineStatsReport, Publication, SuggestionEngine, SuggestionTask, Suggestions, Trigger,
};
pub use store::{
    BuiltinSource, DestinationSource, DestinationStore, JsonFileSource, StoreError,
    XmlFileSource,
};
pub use suggestions::{ConfigError, EngineConfig, SeedStrategy, MAX_PEOPLE};
