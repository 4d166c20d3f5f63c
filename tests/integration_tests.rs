// Integration tests for School Radius

use actix_web::{http::StatusCode, test, web, App};
use school_radius::config::Settings;
use school_radius::core::{pipeline::search, SearchError};
use school_radius::models::{
    Coordinate, Dataset, ResolvedCenter, School, SearchCriteria, SectorFilter, SuburbCentroid,
};
use school_radius::routes::{self, AppState};
use school_radius::services::{
    DataLoadError, DatasetCache, DatasetLoader, DisabledClipboard, MemoryClipboard, SessionStore,
};
use school_radius::SearchSession;
use serde_json::{json, Value};
use std::sync::Arc;

const SCHOOLS_JSON: &str = r#"[
  {"school_name":"Newcastle High School","sector":"government","suburb":"Hamilton","postcode":"2303","phone":"02 4961 0000","public_email":"newcastle-h.school@det.nsw.edu.au","contact_form_url":"","website_url":"https://newcastle-h.schools.nsw.gov.au","lat":-32.924,"lon":151.749},
  {"school_name":"St Mary's \"Star of the Sea\"","sector":"Catholic","suburb":"Newcastle","postcode":"2300","phone":"","public_email":"","contact_form_url":"https://example.org/contact","website_url":"","lat":-32.928,"lon":151.781},
  {"school_name":"Merewether Primary","sector":"government","suburb":"Merewether","postcode":"2291","phone":"","public_email":"merewether-p.school@det.nsw.edu.au","contact_form_url":"","website_url":"","lat":-32.946,"lon":151.752},
  {"school_name":"Maitland Grammar","sector":"independent","suburb":"East Maitland","postcode":"2323","phone":"","public_email":"office@mgs.nsw.edu.au","contact_form_url":"","website_url":"","lat":-32.749,"lon":151.587}
]"#;
const POSTCODES_JSON: &str = r#"{"2300":{"lat":-32.928,"lon":151.781},"2323":{"lat":-32.749,"lon":151.587}}"#;
const SUBURBS_JSON: &str = r#"[{"suburb":"Hamilton","lat":-32.924,"lon":151.749},{"suburb":"Newcastle","lat":-32.928,"lon":151.781},{"suburb":"East Maitland","lat":-32.749,"lon":151.587}]"#;

fn create_school(name: &str, lat: f64, lon: f64, email: Option<&str>) -> School {
    School {
        name: name.to_string(),
        sector: "public".to_string(),
        suburb: "Equator".to_string(),
        postcode: "0000".to_string(),
        phone: None,
        email: email.map(str::to_string),
        contact_form_url: None,
        website_url: None,
        latitude: lat,
        longitude: lon,
    }
}

fn write_region(dir: &std::path::Path, region: &str) {
    let region_dir = dir.join(region);
    std::fs::create_dir_all(&region_dir).unwrap();
    std::fs::write(region_dir.join("schools.min.json"), SCHOOLS_JSON).unwrap();
    std::fs::write(region_dir.join("postcode_centroids.min.json"), POSTCODES_JSON).unwrap();
    std::fs::write(region_dir.join("suburb_centroids.min.json"), SUBURBS_JSON).unwrap();
}

#[::core::prelude::v1::test]
fn test_integration_end_to_end_search() {
    let schools = vec![
        create_school("A", 0.0, 0.0, Some("")),
        create_school("B", 0.0, 1.0, Some("b@x.com")),
    ];
    let criteria = SearchCriteria {
        center: ResolvedCenter::postcode("0000", Coordinate::new(0.0, 0.0)),
        radius_km: 200.0,
        sector: SectorFilter::parse("all"),
    };

    let result = search(&schools, criteria);

    assert_eq!(result.len(), 2);
    assert_eq!(result.rows[0].school.name, "A");
    assert_eq!(result.rows[0].distance_km, 0.0);
    assert_eq!(result.rows[1].school.name, "B");
    assert!((result.rows[1].distance_km - 111.19).abs() < 0.01);
    assert!(result.rows.iter().all(|r| r.distance_km <= 200.0));
}

#[::core::prelude::v1::test]
fn test_integration_session_curation_flow() {
    let mut dataset = Dataset {
        region: "nsw".to_string(),
        schools: serde_json::from_str(SCHOOLS_JSON).unwrap(),
        postcodes: serde_json::from_str(POSTCODES_JSON).unwrap(),
        suburbs: serde_json::from_str::<Vec<SuburbCentroid>>(SUBURBS_JSON).unwrap(),
    };
    dataset.suburbs.push(SuburbCentroid {
        suburb: "Newcastle West".to_string(),
        latitude: -32.925,
        longitude: 151.76,
    });
    let mut session = SearchSession::new("New South Wales", Arc::new(dataset));

    let result = session.search("NEWCASTLE", 10.0, SectorFilter::All).unwrap();
    assert_eq!(result.criteria.center.label, "Suburb Newcastle");
    assert_eq!(result.len(), 3);
    assert_eq!(result.rows[0].school.name, "St Mary's \"Star of the Sea\"");

    // Sector filter is case-insensitive
    let result = session.search("2300", 50.0, SectorFilter::parse("catholic")).unwrap();
    assert_eq!(result.len(), 1);

    session.search("2300", 50.0, SectorFilter::All).unwrap();
    assert_eq!(session.display().len(), 4);

    session.toggle(0);
    session.toggle(1);
    let state = session.selection_state();
    assert!(state.indeterminate);
    assert!(!state.all_checked);

    let clipboard = MemoryClipboard::default();
    let report = session.copy_emails(&clipboard).unwrap();
    assert_eq!(
        clipboard.contents().as_deref(),
        Some("Newcastle High School <newcastle-h.school@det.nsw.edu.au>")
    );
    assert_eq!(report.text.count(), 1);

    session.set_emails_only(true);
    assert_eq!(session.display().len(), 3);
    assert_eq!(session.selection().count(), 0);

    let export = session.export_csv().unwrap();
    assert_eq!(export.filename, "schools-nsw-postcode-2300-50km.csv");
    assert_eq!(export.body.lines().count(), 4);
}

#[::core::prelude::v1::test]
fn test_integration_copy_with_selection_lacking_emails() {
    let dataset = Dataset {
        region: "nsw".to_string(),
        schools: serde_json::from_str(SCHOOLS_JSON).unwrap(),
        postcodes: serde_json::from_str(POSTCODES_JSON).unwrap(),
        suburbs: serde_json::from_str(SUBURBS_JSON).unwrap(),
    };
    let mut session = SearchSession::new("NSW", Arc::new(dataset));
    session.search("2300", 1.0, SectorFilter::All).unwrap();
    assert_eq!(session.display().len(), 1);

    session.select_all();
    assert!(session.selection_state().all_checked);

    let err = session.copy_emails(&DisabledClipboard).unwrap_err();
    assert_eq!(err, SearchError::EmptySelection);

    session.clear_selection();
    let err = session.copy_emails(&DisabledClipboard).unwrap_err();
    assert_eq!(err, SearchError::EmptyResult);
}

#[tokio::test]
async fn test_integration_http_dataset_load() {
    let mut server = mockito::Server::new_async().await;
    let schools = server
        .mock("GET", "/data/nsw/schools.min.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SCHOOLS_JSON)
        .create_async()
        .await;
    let postcodes = server
        .mock("GET", "/data/nsw/postcode_centroids.min.json")
        .with_status(200)
        .with_body(POSTCODES_JSON)
        .create_async()
        .await;
    let suburbs = server
        .mock("GET", "/data/nsw/suburb_centroids.min.json")
        .with_status(200)
        .with_body(SUBURBS_JSON)
        .create_async()
        .await;

    let loader = DatasetLoader::new(&format!("{}/data/", server.url()), 5).unwrap();
    let dataset = loader.load("nsw").await.unwrap();

    schools.assert_async().await;
    postcodes.assert_async().await;
    suburbs.assert_async().await;

    assert_eq!(dataset.schools.len(), 4);
    assert_eq!(dataset.postcodes.len(), 2);
    assert_eq!(dataset.suburbs.len(), 3);
}

#[tokio::test]
async fn test_integration_http_dataset_failure() {
    let mut server = mockito::Server::new_async().await;
    let _schools = server
        .mock("GET", "/qld/schools.min.json")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let _postcodes = server
        .mock("GET", "/qld/postcode_centroids.min.json")
        .with_status(404)
        .create_async()
        .await;
    let _suburbs = server
        .mock("GET", "/qld/suburb_centroids.min.json")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let loader = DatasetLoader::new(&server.url(), 5).unwrap();
    let err = loader.load("qld").await.unwrap_err();

    assert!(matches!(
        err,
        DataLoadError::Status { .. } | DataLoadError::Parse { .. }
    ));
}

fn app_state(dir: &std::path::Path) -> AppState {
    let mut settings = Settings::default();
    settings.data.base = dir.to_string_lossy().to_string();
    settings
        .regions
        .insert("nsw".to_string(), "New South Wales".to_string());

    let loader = DatasetLoader::new(&settings.data.base, 5).unwrap();
    AppState {
        settings: Arc::new(settings),
        datasets: Arc::new(DatasetCache::new(loader, 4, 60)),
        sessions: SessionStore::new(16, 60),
        clipboard: Arc::new(DisabledClipboard),
        flavour: None,
    }
}

#[actix_web::test]
async fn test_integration_http_api() {
    let dir = tempfile::tempdir().unwrap();
    write_region(dir.path(), "nsw");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(dir.path())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({"region": "NSW"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["regionName"], "New South Wales");
    assert_eq!(body["schoolCount"], 4);
    let id = body["sessionId"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/sessions/{}/search", id))
        .set_json(json!({"location": "Hamilton", "radiusKm": 5, "sector": "all"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["centerLabel"], "Suburb Hamilton");
    assert_eq!(view["rows"][0]["schoolName"], "Newcastle High School");
    assert_eq!(view["rows"][0]["distanceKm"], 0.0);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/sessions/{}/selection/toggle", id))
        .set_json(json!({"index": 0}))
        .to_request();
    let state: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(state["count"], 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/sessions/{}/copy", id))
        .to_request();
    let copy: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(copy["copied"], false);
    assert_eq!(copy["mode"], "selected");
    assert_eq!(
        copy["text"],
        "Newcastle High School <newcastle-h.school@det.nsw.edu.au>"
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/sessions/{}/export.csv", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("schools-nsw-suburb-hamilton-5km.csv"));

    // A failed search clears the previous result
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/sessions/{}/search", id))
        .set_json(json!({"location": "9999", "radiusKm": 5}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/sessions/{}/export.csv", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_integration_rejected_search_clears_result() {
    let dir = tempfile::tempdir().unwrap();
    write_region(dir.path(), "nsw");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(dir.path())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({"region": "nsw"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["sessionId"].as_str().unwrap().to_string();

    let rejected = [
        json!({"location": "Hamilton", "radiusKm": 5000}),
        json!({"location": "Hamilton", "radiusKm": -1}),
        json!({"location": "Hamilton", "radiusKm": 0}),
        json!({"location": "x".repeat(200), "radiusKm": 5}),
    ];

    for body in rejected {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/search", id))
            .set_json(json!({"location": "Hamilton", "radiusKm": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/selection/all", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/search", id))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {}", body);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{}/export.csv", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT, "body {}", body);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/copy", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT, "body {}", body);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{}/selection", id))
            .to_request();
        let selection: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(selection["count"], 0);
        assert_eq!(selection["total"], 0);
    }
}

#[actix_web::test]
async fn test_integration_unknown_session_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    write_region(dir.path(), "nsw");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(dir.path())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/sessions/{}/search", uuid::Uuid::new_v4()))
        .set_json(json!({"location": "Hamilton", "radiusKm": 5000}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_integration_unknown_region() {
    let dir = tempfile::tempdir().unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(dir.path())))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({"region": "tas"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
