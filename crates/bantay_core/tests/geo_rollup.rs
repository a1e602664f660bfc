use bantay_core::{
    choropleth, parse_boundaries, rollup_by_region, scale_color, CaseReport, RegionTotals,
};
use chrono::NaiveDate;

#[test]
fn choropleth_joins_rollup_onto_boundaries() {
    let boundaries = parse_boundaries(BOUNDARIES_GEOJSON).unwrap();
    let reports = vec![
        report("central luzon", 7, 1),
        report("BICOL", 12_000, 30),
        report("bicol", 500, 2),
        report("Zamboanga Peninsula", 99, 9),
    ];

    let shaded = choropleth(&boundaries, &reports);
    assert_eq!(shaded.len(), 3);

    assert_eq!(shaded[0].boundary.name, "Central Luzon");
    assert_eq!(shaded[0].totals, RegionTotals { cases: 7, deaths: 1 });
    assert_eq!(scale_color(shaded[0].totals.cases), "#FFFFFF");

    // No reports for this boundary, so it zero-fills.
    assert_eq!(shaded[1].boundary.name, "CALABARZON");
    assert_eq!(shaded[1].totals, RegionTotals::default());

    assert_eq!(shaded[2].boundary.name, "Bicol");
    assert_eq!(shaded[2].totals, RegionTotals { cases: 12_500, deaths: 32 });
    assert_eq!(scale_color(shaded[2].totals.cases), "#FFA500");
}

#[test]
fn regions_without_boundaries_drop_out_of_the_join() {
    let boundaries = parse_boundaries(BOUNDARIES_GEOJSON).unwrap();
    let reports = vec![report("Nowhere", 1_000_000, 5)];

    let shaded = choropleth(&boundaries, &reports);
    assert!(shaded.iter().all(|entry| entry.totals == RegionTotals::default()));
}

#[test]
fn rollup_is_invariant_under_permutation() {
    let mut reports = vec![
        report("Bicol", 3, 0),
        report("Ilocos", 11, 1),
        report("bicol", 4, 2),
        report("CALABARZON", 70, 0),
        report("ilocos", 2, 0),
        report("Bicol", 1, 1),
    ];

    let baseline = rollup_by_region(&reports);

    reports.reverse();
    assert_eq!(rollup_by_region(&reports), baseline);

    reports.rotate_left(2);
    assert_eq!(rollup_by_region(&reports), baseline);

    assert_eq!(baseline["bicol"], RegionTotals { cases: 8, deaths: 3 });
    assert_eq!(baseline["ilocos"], RegionTotals { cases: 13, deaths: 1 });
}

fn report(region: &str, cases: u32, deaths: u32) -> CaseReport {
    CaseReport::new(
        "somewhere".to_string(),
        region.to_string(),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        cases,
        deaths,
    )
}

const BOUNDARIES_GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "name": "Central Luzon" },
            "geometry": { "type": "Polygon", "coordinates": [] }
        },
        {
            "type": "Feature",
            "properties": { "name": "CALABARZON" },
            "geometry": { "type": "Polygon", "coordinates": [] }
        },
        {
            "type": "Feature",
            "properties": { "name": "Bicol" },
            "geometry": { "type": "Polygon", "coordinates": [] }
        }
    ]
}"#;
