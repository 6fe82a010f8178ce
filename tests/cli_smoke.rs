//! End-to-end tests of the command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("climate-facets").unwrap();
    cmd.env_remove("CLIMATEMAPS_API_URL");
    cmd
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("grid"));
}

#[test]
fn test_catalog_list() {
    cli()
        .args(["catalog", "list", "--variable", "T_MAX", "--year-range", "2081-2100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tmax_2081_2100_10m_ssp370_ensemble_mean_diff"))
        .stdout(predicate::str::contains("tmin_").not());
}

#[test]
fn test_catalog_show_json() {
    cli()
        .args(["catalog", "show", "tmax_1970_2000_10m", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"data_type\": \"tmax_1970_2000_10m\""));
}

#[test]
fn test_catalog_show_unknown_layer_fails() {
    cli()
        .args(["catalog", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_catalog_export_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    cli()
        .args(["catalog", "export"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    cli()
        .arg("--catalog")
        .arg(&path)
        .args(["resolve", "variable=T_MIN&yearRange=1961-1990"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tmin_1970_2000_10m"));
}

#[test]
fn test_resolve_future_layer() {
    cli()
        .args([
            "resolve",
            "variable=T_MAX&yearRange=2081-2100&scenario=SSP370&difference=true",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("tmax_2081_2100_10m_ssp370_ensemble_mean_diff"))
        .stdout(predicate::str::contains("_raster_"));
}

#[test]
fn test_resolve_accepts_full_url() {
    cli()
        .args([
            "resolve",
            "https://climatemaps.example/?variable=PRECIPITATION&yearRange=2041-2060&scenario=SSP126&difference=false&lat=10&lon=20&zoom=3",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("prec_2041_2060_10m_ssp126_ensemble_mean"));
}

#[test]
fn test_options_marks_selection() {
    cli()
        .args(["options", "variable=T_MAX&yearRange=1970-2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1970-2000]"))
        .stdout(predicate::str::contains("[T_MAX]"));
}

#[test]
fn test_grid_requires_page() {
    cli().args(["grid", "variable=T_MAX"]).assert().failure();
}

#[test]
fn test_scenario_year_range_grid() {
    cli()
        .args(["grid", "variable=T_MAX", "--page", "scenario-year-range-grid", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SSP585 2081-2100\ttmax_2081_2100_10m_ssp585_ensemble_mean_diff"));
}

#[test]
fn test_missing_catalog_file_fails() {
    cli()
        .args(["--catalog", "/nonexistent/catalog.json", "options"])
        .assert()
        .failure();
}

#[test]
fn test_monthly_grid_starts_in_december() {
    cli()
        .args(["grid", "variable=PRECIPITATION", "--page", "monthly-grid", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cell\tdata_type\nDecember\tprec_1970_2000_10m\nJanuary\t"));
}
