use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// School record as produced by the static export tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    #[serde(rename = "school_name")]
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "public_email", default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_form_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl School {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Trimmed public email, `None` when absent or blank
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn contact_form_url(&self) -> Option<&str> {
        non_blank(self.contact_form_url.as_deref())
    }

    pub fn website_url(&self) -> Option<&str> {
        non_blank(self.website_url.as_deref())
    }

    pub fn has_email(&self) -> bool {
        self.email().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Latitude/longitude pair in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Entry of the suburb centroid list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuburbCentroid {
    pub suburb: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl SuburbCentroid {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Postcode (4 digit string) to centroid
pub type PostcodeTable = HashMap<String, Coordinate>;

/// Everything loaded for one region
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub region: String,
    pub schools: Vec<School>,
    pub postcodes: PostcodeTable,
    pub suburbs: Vec<SuburbCentroid>,
}

impl Dataset {
    pub fn is_loaded(&self) -> bool {
        !self.schools.is_empty()
    }
}

/// Where a search radius is centred, and how the user named it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCenter {
    pub coordinate: Coordinate,
    pub label: String,
}

impl ResolvedCenter {
    pub fn postcode(code: &str, coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: format!("Postcode {}", code),
        }
    }

    pub fn suburb(name: &str, coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: format!("Suburb {}", name),
        }
    }

    /// Suburb name when the center was resolved from the suburb table
    pub fn suburb_name(&self) -> Option<&str> {
        self.label.strip_prefix("Suburb ")
    }
}

/// Sector restriction applied before distance filtering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SectorFilter {
    #[default]
    All,
    Only(String),
}

impl SectorFilter {
    /// Parse a user-supplied sector, treating blank or `all` as no restriction
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            SectorFilter::All
        } else {
            SectorFilter::Only(value.to_string())
        }
    }

    #[inline]
    pub fn matches(&self, sector: &str) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::Only(wanted) => sector.trim().eq_ignore_ascii_case(wanted),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SectorFilter::All => "all sectors",
            SectorFilter::Only(sector) => sector,
        }
    }
}

impl fmt::Display for SectorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs of one radius search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub center: ResolvedCenter,
    pub radius_km: f64,
    pub sector: SectorFilter,
}

/// A school with its distance from the search center
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub school: School,
    /// Rounded to 2 decimal places, used for display and export
    pub distance_km: f64,
    /// Unrounded haversine distance, used for threshold and ordering
    pub exact_distance_km: f64,
}

/// Rows within the radius, ascending by distance
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub criteria: SearchCriteria,
    pub rows: Vec<ResultRow>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
