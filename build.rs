use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/climate_maps.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let maps = catalog.get("maps").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'maps' field\n\
             The catalog must have a top-level 'maps' array.\n"
        );
    });

    let maps = maps.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'maps' must be an array\n\
             Got: {maps}\n"
        );
    });

    let projected = validate_maps(maps);

    println!(
        "cargo:warning=Validated catalog: {} maps, {projected} projected",
        maps.len()
    );
}

fn validate_maps(maps: &[serde_json::Value]) -> usize {
    let mut projected = 0;

    for (i, map) in maps.iter().enumerate() {
        let data_type = map
            .get("data_type")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        validate_map_fields(map, data_type, i);
        if validate_projection(map, data_type) {
            projected += 1;
        }
    }

    projected
}

fn validate_map_fields(map: &serde_json::Value, data_type: &str, index: usize) {
    for field in ["data_type", "year_range", "variable", "resolution", "tiles_url"] {
        assert!(
            map.get(field).is_some(),
            "\n\nCATALOG BUILD ERROR: Map '{data_type}' (index {index}) missing '{field}' field\n"
        );
    }

    let year_range = map.get("year_range").and_then(|v| v.as_array());
    assert!(
        year_range.is_some_and(|r| r.len() == 2),
        "\n\nCATALOG BUILD ERROR: Map '{data_type}' year_range must be [start, end]\n"
    );
}

/// Scenario and model must be set together or not at all
fn validate_projection(map: &serde_json::Value, data_type: &str) -> bool {
    let has = |field: &str| map.get(field).is_some_and(|v| !v.is_null());
    let scenario = has("climate_scenario");
    let model = has("climate_model");

    assert!(
        scenario == model,
        "\n\nCATALOG BUILD ERROR: Map '{data_type}' must set climate_scenario and climate_model together\n"
    );

    scenario
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/climate_maps.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
