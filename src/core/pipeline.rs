use crate::core::{
    distance::{distance_km, round_km},
    filters::{matches_sector, within_radius},
};
use crate::models::{ResultRow, School, SearchCriteria, SearchResult};

/// Run the radius search over a dataset
///
/// # Pipeline Stages
/// 1. Sector filter
/// 2. Haversine distance from the center
/// 3. Radius threshold on the unrounded distance (inclusive)
/// 4. Stable sort ascending by distance
/// 5. Round distances to 2 decimal places for display
pub fn search(schools: &[School], criteria: SearchCriteria) -> SearchResult {
    let center = criteria.center.coordinate;

    let mut rows: Vec<ResultRow> = schools
        .iter()
        // Stage 1: Sector
        .filter(|school| matches_sector(school, &criteria.sector))
        // Stage 2 & 3: Distance and radius
        .filter_map(|school| {
            let exact = distance_km(center, school.coordinate());
            within_radius(exact, criteria.radius_km).then(|| ResultRow {
                school: school.clone(),
                distance_km: exact,
                exact_distance_km: exact,
            })
        })
        .collect();

    // Stage 4: sort_by is stable, equal distances keep dataset order
    rows.sort_by(|a, b| {
        a.exact_distance_km
            .partial_cmp(&b.exact_distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Stage 5
    for row in &mut rows {
        row.distance_km = round_km(row.exact_distance_km);
    }

    tracing::debug!(
        "Search around {} ({} km, {}): {} of {} schools",
        criteria.center.label,
        criteria.radius_km,
        criteria.sector,
        rows.len(),
        schools.len()
    );

    SearchResult { criteria, rows }
}
