//! `countries` and `show` against a mock countries API.

use std::net::TcpListener;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Twelve countries, `C1`..`C12`, with population `n * 1000`.
fn numbered_countries() -> Value {
    let records: Vec<Value> = (1..=12)
        .map(|n| {
            json!({
                "name": { "common": format!("C{n}"), "official": format!("Republic of C{n}") },
                "population": n * 1000,
                "region": if n % 2 == 0 { "Europe" } else { "Asia" },
                "capital": [format!("Capital {n}")]
            })
        })
        .collect();
    Value::Array(records)
}

async fn mock_api(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn logged_in_home() -> TempDir {
    let home = TempDir::new().expect("create temp globedash home");
    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .args(["login", "--email", "a@b.com"])
        .assert()
        .success();
    home
}

#[tokio::test]
async fn test_countries_prints_first_page_and_summary() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(numbered_countries()).await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .arg("countries")
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1 to 10 of 12 entries"))
        .stdout(predicate::str::contains("Page 1 of 2"))
        .stdout(predicate::str::contains("C10"))
        .stdout(predicate::str::contains("C11").not());
}

#[tokio::test]
async fn test_countries_second_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(numbered_countries()).await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .args(["countries", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 11 to 12 of 12 entries"))
        .stdout(predicate::str::contains("Page 2 of 2"))
        .stdout(predicate::str::contains("C12"));
}

#[tokio::test]
async fn test_countries_page_past_end_is_clamped() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(numbered_countries()).await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .args(["countries", "--page", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 2 of 2"));
}

#[tokio::test]
async fn test_countries_search_and_population_sort() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(numbered_countries()).await;
    let home = logged_in_home();

    let output = cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .args(["countries", "--search", "c1", "--sort", "population", "--desc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Showing 1 to 4 of 4 entries"), "{stdout}");
    assert!(stdout.contains("Population ▼"), "{stdout}");
    let c12 = stdout.find("C12").unwrap();
    let c1 = stdout.find("C1 ").unwrap();
    assert!(c12 < c1, "{stdout}");
}

#[tokio::test]
async fn test_countries_no_match() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(numbered_countries()).await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .args(["countries", "--search", "zz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No countries found"));
}

#[tokio::test]
async fn test_countries_server_error_shows_empty_table() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .arg("countries")
        .assert()
        .success()
        .stdout(predicate::str::contains("No countries found"));
}

#[tokio::test]
async fn test_countries_requires_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(numbered_countries()))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .arg("countries")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn test_show_prints_details() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(json!([
        {
            "name": { "common": "France", "official": "French Republic" },
            "flags": { "png": "https://flagcdn.com/w320/fr.png" },
            "population": 67391582,
            "region": "Europe",
            "subregion": "Western Europe",
            "capital": ["Paris"],
            "currencies": { "EUR": { "name": "Euro", "symbol": "€" } },
            "languages": { "fra": "French" },
            "maps": { "googleMaps": "https://goo.gl/maps/g7QxxSFsWyTPKuzd7" }
        }
    ]))
    .await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .args(["show", "french republic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("French Republic"))
        .stdout(predicate::str::contains("Capital: Paris"))
        .stdout(predicate::str::contains("Languages: French"))
        .stdout(predicate::str::contains("Google Maps: https://goo.gl/maps/g7QxxSFsWyTPKuzd7"))
        .stdout(predicate::str::contains("Coat of Arms: Nothing Available"));
}

#[tokio::test]
async fn test_show_unknown_country_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = mock_api(numbered_countries()).await;
    let home = logged_in_home();

    cargo_bin_cmd!("globedash")
        .env("GLOBEDASH_HOME", home.path())
        .env("GLOBEDASH_API_URL", server.uri())
        .args(["show", "Atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No country named 'Atlantis'"));
}
