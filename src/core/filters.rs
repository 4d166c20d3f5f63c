use crate::models::{ResultRow, School, SectorFilter};

/// Check if a school passes the sector restriction
///
/// This is Stage 1 of the search pipeline.
#[inline]
pub fn matches_sector(school: &School, sector: &SectorFilter) -> bool {
    sector.matches(&school.sector)
}

/// Check if a distance is inside the search radius (inclusive)
#[inline]
pub fn within_radius(distance_km: f64, radius_km: f64) -> bool {
    distance_km <= radius_km
}

/// Narrowing applied to a search result to build the display rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryFilter {
    #[default]
    None,
    EmailsOnly,
}

impl SecondaryFilter {
    pub fn from_emails_only(emails_only: bool) -> Self {
        if emails_only {
            SecondaryFilter::EmailsOnly
        } else {
            SecondaryFilter::None
        }
    }

    #[inline]
    pub fn keeps(&self, row: &ResultRow) -> bool {
        match self {
            SecondaryFilter::None => true,
            SecondaryFilter::EmailsOnly => row.school.has_email(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(sector: &str, email: Option<&str>) -> School {
        School {
            name: "Test School".to_string(),
            sector: sector.to_string(),
            suburb: "Newcastle".to_string(),
            postcode: "2300".to_string(),
            phone: None,
            email: email.map(str::to_string),
            contact_form_url: None,
            website_url: None,
            latitude: -32.93,
            longitude: 151.78,
        }
    }

    fn row(email: Option<&str>) -> ResultRow {
        ResultRow {
            school: school("government", email),
            distance_km: 1.0,
            exact_distance_km: 1.0,
        }
    }

    #[test]
    fn test_sector_all_keeps_everything() {
        assert!(matches_sector(&school("catholic", None), &SectorFilter::All));
    }

    #[test]
    fn test_sector_is_case_insensitive() {
        let filter = SectorFilter::parse("Catholic");
        assert!(matches_sector(&school("CATHOLIC", None), &filter));
        assert!(!matches_sector(&school("independent", None), &filter));
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        assert!(within_radius(10.0, 10.0));
        assert!(!within_radius(10.000_001, 10.0));
    }

    #[test]
    fn test_emails_only_treats_blank_as_absent() {
        let filter = SecondaryFilter::EmailsOnly;
        assert!(filter.keeps(&row(Some("office@school.edu.au"))));
        assert!(!filter.keeps(&row(Some("   "))));
        assert!(!filter.keeps(&row(None)));
        assert!(SecondaryFilter::None.keeps(&row(None)));
    }
}
