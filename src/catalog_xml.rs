// XML representation of a destination catalog
use crate::destination::{City, Destination, DestinationCatalog};
use crate::store::StoreError;
use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};

// Structures for XML deserialization
#[derive(Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
#[serde(rename = "Catalog")]
pub struct XmlCatalog {
    pub destinations: XmlEntries,
    pub hotels: XmlEntries,
    pub restaurants: XmlEntries,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlEntries {
    #[serde(rename = "Entry")]
    pub entries: Vec<XmlEntry>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlEntry {
    #[serde(rename = "@city")]
    pub city: String,
    #[serde(rename = "@country")]
    pub country: String,
    #[serde(rename = "@latitude")]
    pub latitude: String,
    #[serde(rename = "@longitude")]
    pub longitude: String,
    #[serde(rename = "@description")]
    pub description: String,
    #[serde(rename = "@imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl TryFrom<XmlEntry> for Destination {
    type Error = StoreError;

    fn try_from(item: XmlEntry) -> Result<Self, Self::Error> {
        let latitude = parse_coordinate(&item.city, "latitude", &item.latitude)?;
        let longitude = parse_coordinate(&item.city, "longitude", &item.longitude)?;

        Ok(Destination {
            city: City {
                name: item.city,
                country: item.country,
                latitude,
                longitude,
            },
            description: item.description,
            image_url: item.image_url.filter(|url| !url.is_empty()),
        })
    }
}

impl From<&Destination> for XmlEntry {
    fn from(item: &Destination) -> Self {
        XmlEntry {
            city: item.city.name.clone(),
            country: item.city.country.clone(),
            latitude: item.city.latitude.to_string(),
            longitude: item.city.longitude.to_string(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

impl TryFrom<XmlCatalog> for DestinationCatalog {
    type Error = StoreError;

    fn try_from(item: XmlCatalog) -> Result<Self, Self::Error> {
        Ok(DestinationCatalog {
            destinations: convert_entries(item.destinations)?,
            hotels: convert_entries(item.hotels)?,
            restaurants: convert_entries(item.restaurants)?,
        })
    }
}

impl From<&DestinationCatalog> for XmlCatalog {
    fn from(item: &DestinationCatalog) -> Self {
        let entries = |list: &[Destination]| XmlEntries {
            entries: list.iter().map(XmlEntry::from).collect(),
        };

        XmlCatalog {
            destinations: entries(&item.destinations),
            hotels: entries(&item.hotels),
            restaurants: entries(&item.restaurants),
        }
    }
}

fn convert_entries(entries: XmlEntries) -> Result<Vec<Destination>, StoreError> {
    entries
        .entries
        .into_iter()
        .map(Destination::try_from)
        .collect()
}

fn parse_coordinate(city: &str, field: &str, value: &str) -> Result<f64, StoreError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| StoreError::InvalidDestination {
            city: city.to_string(),
            reason: format!("{} {:?}: {}", field, value, e),
        })
}

// Parse an XML catalog document
pub fn catalog_from_xml_str(xml: &str) -> Result<DestinationCatalog, StoreError> {
    let catalog: XmlCatalog =
        from_str(xml).map_err(|e| StoreError::XmlParse(e.to_string()))?;

    catalog.try_into()
}

pub fn catalog_to_xml_string(catalog: &DestinationCatalog) -> Result<String, StoreError> {
    quick_xml::se::to_string(&XmlCatalog::from(catalog))
        .map_err(|e| StoreError::Conversion(e.to_string()))
}
