use crate::core::error::SearchError;
use crate::models::{PostcodeTable, ResolvedCenter, SuburbCentroid};

/// Turns a free-text location into a search center
///
/// Resolution order, first match wins:
/// 1. exactly four ASCII digits: postcode table lookup
/// 2. case-insensitive exact suburb name
/// 3. case-insensitive substring of a suburb name
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'a> {
    postcodes: &'a PostcodeTable,
    suburbs: &'a [SuburbCentroid],
}

impl<'a> LocationResolver<'a> {
    pub fn new(postcodes: &'a PostcodeTable, suburbs: &'a [SuburbCentroid]) -> Self {
        Self { postcodes, suburbs }
    }

    pub fn resolve(&self, query: &str) -> Result<ResolvedCenter, SearchError> {
        resolve(query, self.postcodes, self.suburbs)
    }
}

/// Resolve a query against the postcode and suburb tables
pub fn resolve(
    query: &str,
    postcodes: &PostcodeTable,
    suburbs: &[SuburbCentroid],
) -> Result<ResolvedCenter, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::Input("Enter a postcode or suburb.".to_string()));
    }

    if is_postcode(query) {
        return postcodes
            .get(query)
            .map(|coordinate| ResolvedCenter::postcode(query, *coordinate))
            .ok_or_else(|| {
                SearchError::NotFound(format!("No coordinate found for postcode {}.", query))
            });
    }

    let lower = query.to_lowercase();

    if let Some(exact) = suburbs.iter().find(|s| s.suburb.to_lowercase() == lower) {
        return Ok(ResolvedCenter::suburb(&exact.suburb, exact.coordinate()));
    }

    // Substring containment, not word matching: "spring" resolves to "Alice Springs"
    if let Some(partial) = suburbs.iter().find(|s| s.suburb.to_lowercase().contains(&lower)) {
        return Ok(ResolvedCenter::suburb(&partial.suburb, partial.coordinate()));
    }

    Err(SearchError::NotFound(format!(
        "Could not resolve location \"{}\" to a suburb or postcode.",
        query
    )))
}

#[inline]
fn is_postcode(query: &str) -> bool {
    query.len() == 4 && query.bytes().all(|b| b.is_ascii_digit())
}
