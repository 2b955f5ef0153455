use serde::{Deserialize, Serialize};
use std::fmt;

// A city as shown on the explore screens
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn new(name: &str, country: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            latitude,
            longitude,
        }
    }

    // Text used both for rendering and for the destination text filter
    pub fn name_to_display(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// A destination, hotel or restaurant entry.
///
/// The three categories share one shape; only the list a value lives in
/// tells them apart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Destination {
    pub city: City,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Destination {
    pub fn new(city: City, description: &str) -> Self {
        Self {
            city,
            description: description.to_string(),
            image_url: None,
        }
    }

    pub fn city_name(&self) -> &str {
        &self.city.name
    }

    pub fn name_to_display(&self) -> String {
        self.city.name_to_display()
    }

    // Lookups compare on the city name only
    pub fn is_same_city(&self, other: &Destination) -> bool {
        self.city.name == other.city.name
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name_to_display(), self.description)
    }
}

// Serialized form of a full dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DestinationCatalog {
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub hotels: Vec<Destination>,
    #[serde(default)]
    pub restaurants: Vec<Destination>,
}

impl DestinationCatalog {
    pub fn total_entries(&self) -> usize {
        self.destinations.len() + self.hotels.len() + self.restaurants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_joins_city_and_country() {
        let city = City::new("Madrid", "ES", 40.416775, -3.703790);
        assert_eq!(city.name_to_display(), "Madrid, ES");
    }

    #[test]
    fn test_same_city_ignores_description() {
        let a = Destination::new(City::new("Rome", "IT", 41.902782, 12.496366), "Nonstop - 2h 38m+");
        let b = Destination::new(City::new("Rome", "IT", 41.902782, 12.496366), "1 stop - 7h 12m+");
        assert!(a.is_same_city(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_catalog_json_defaults_missing_categories() {
        let json = r#"{
            "destinations": [
                {"city": {"name": "Bali", "country": "ID", "latitude": -8.3405, "longitude": 115.092}, "description": "Nonstop - 12h 5m+"}
            ]
        }"#;
        let catalog: DestinationCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.destinations.len(), 1);
        assert!(catalog.hotels.is_empty());
        assert!(catalog.restaurants.is_empty());
        assert_eq!(catalog.total_entries(), 1);
        assert_eq!(catalog.destinations[0].image_url, None);
    }
}
