//! Integration tests for both collectors against a mocked AQS API

use std::{fs, path::Path};

use aqs_county::{
    aqs::{AqsClient, Credentials},
    commands::{resumable::collect_by_state, single_output::collect_all, CollectParams},
    AqsError, FailurePolicy, Year, YearRange,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

const CRITERIA: [&str; 7] = [
    "14129", "42101", "42401", "42602", "44201", "81102", "88101",
];

/// Answers annual-summary requests with one row echoing the request fields.
struct EchoAnnual;

impl Respond for EchoAnnual {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let field = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default()
        };

        ResponseTemplate::new(200).set_body_json(json!({
            "Header": [{"status": "Success"}],
            "Data": [{
                "state_code": field("state"),
                "county_code": field("county"),
                "parameter_code": field("param"),
                "year": field("bdate")[..4].to_string(),
                "arithmetic_mean": 1.5
            }]
        }))
    }
}

async fn mount_reference(server: &MockServer, param_codes: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/list/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": [
                {"code": "01", "value_represented": "Alabama"},
                {"code": "02", "value_represented": "Alaska"},
                {"code": "CC", "value_represented": "Canada"},
                {"code": "MX", "value_represented": "Mexico"}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;

    let params: Vec<_> = param_codes
        .iter()
        .map(|c| json!({"code": c, "value_represented": format!("param {}", c)}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/list/parametersByClass"))
        .and(query_param("pc", "CRITERIA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Data": params })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_counties(server: &MockServer, state: &str, counties: &[&str], expected: u64) {
    let rows: Vec<_> = counties
        .iter()
        .map(|c| json!({"code": c, "value_represented": format!("county {}", c)}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/list/countiesByState"))
        .and(query_param("state", state))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Data": rows })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_non_us_guards(server: &MockServer) {
    for code in ["CC", "MX"] {
        Mock::given(method("GET"))
            .and(path("/list/countiesByState"))
            .and(query_param("state", code))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Data": []})))
            .expect(0)
            .mount(server)
            .await;
    }
}

fn client(server: &MockServer) -> AqsClient {
    AqsClient::with_base_url(Credentials::new("test@example.com", "key"), server.uri()).unwrap()
}

fn params(dir: &Path, first: u16, last: u16, on_failure: FailurePolicy) -> CollectParams {
    CollectParams {
        years: YearRange::new(Year::new(first), Year::new(last)).unwrap(),
        output_dir: dir.to_path_buf(),
        param_class: "CRITERIA".to_string(),
        on_failure,
    }
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

#[tokio::test]
async fn test_collect_by_state_writes_one_file_per_us_state() {
    let server = MockServer::start().await;
    mount_reference(&server, &CRITERIA).await;
    mount_counties(&server, "01", &["001", "003"], 1).await;
    mount_counties(&server, "02", &["013"], 1).await;
    mount_non_us_guards(&server).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .respond_with(EchoAnnual)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let written = collect_by_state(
        &mut client,
        &params(dir.path(), 2019, 2020, FailurePolicy::Skip),
        "",
    )
    .await
    .unwrap();

    assert_eq!(
        written,
        vec![
            dir.path().join("AQS_county_data_Alabama_2019_2020.csv"),
            dir.path().join("AQS_county_data_Alaska_2019_2020.csv"),
        ]
    );

    // 2 years x 2 counties x 2 parameter groups
    let (headers, rows) = read_rows(&written[0]);
    assert_eq!(
        headers,
        vec!["state_code", "county_code", "parameter_code", "year", "arithmetic_mean"]
    );
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| r[0] == "01"));
    assert_eq!(rows[0][1..4], ["001", "14129,42101,42401,42602", "2019"]);
    assert_eq!(rows[1][1..4], ["001", "44201,81102,88101", "2019"]);
    assert_eq!(rows[2][1..4], ["003", "14129,42101,42401,42602", "2019"]);
    assert_eq!(rows[4][3], "2020");

    let (_, alaska) = read_rows(&written[1]);
    assert_eq!(alaska.len(), 4);
    assert!(alaska.iter().all(|r| r[0] == "02"));
}

#[tokio::test]
async fn test_collect_by_state_resumes_from_named_state() {
    let server = MockServer::start().await;
    mount_reference(&server, &CRITERIA).await;
    mount_counties(&server, "01", &["001"], 0).await;
    mount_counties(&server, "02", &["013", "020"], 1).await;
    mount_non_us_guards(&server).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .and(query_param("state", "02"))
        .respond_with(EchoAnnual)
        .expect(4)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let written = collect_by_state(
        &mut client,
        &params(dir.path(), 2021, 2021, FailurePolicy::Skip),
        "ALASKA",
    )
    .await
    .unwrap();

    assert_eq!(written, vec![dir.path().join("AQS_county_data_Alaska_2021.csv")]);
    assert!(!dir.path().join("AQS_county_data_Alabama_2021.csv").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_collect_by_state_unknown_start_state() {
    let server = MockServer::start().await;
    mount_reference(&server, &CRITERIA).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .respond_with(EchoAnnual)
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let result = collect_by_state(
        &mut client,
        &params(dir.path(), 2021, 2021, FailurePolicy::Skip),
        "Canada",
    )
    .await;

    match result {
        Err(AqsError::UnknownState { name }) => assert_eq!(name, "Canada"),
        other => panic!("Expected UnknownState, got {:?}", other),
    }
}

#[tokio::test]
async fn test_collect_by_state_skips_failed_requests() {
    let server = MockServer::start().await;
    mount_reference(&server, &["44201", "88101"]).await;
    mount_counties(&server, "01", &["001", "003"], 1).await;
    mount_counties(&server, "02", &["013"], 1).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .and(query_param("county", "003"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .and(query_param("county", "001"))
        .respond_with(EchoAnnual)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .and(query_param("county", "013"))
        .respond_with(EchoAnnual)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let written = collect_by_state(
        &mut client,
        &params(dir.path(), 2019, 2019, FailurePolicy::Skip),
        "",
    )
    .await
    .unwrap();

    assert_eq!(written.len(), 2);
    let (_, alabama) = read_rows(&written[0]);
    assert_eq!(alabama.len(), 1);
    assert_eq!(alabama[0][1], "001");
    assert_eq!(alabama[0][2], "44201,88101");
}

#[tokio::test]
async fn test_collect_by_state_aborts_on_failure() {
    let server = MockServer::start().await;
    mount_reference(&server, &CRITERIA).await;
    mount_counties(&server, "01", &["001"], 1).await;
    mount_counties(&server, "02", &["013"], 0).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let result = collect_by_state(
        &mut client,
        &params(dir.path(), 2019, 2019, FailurePolicy::Abort),
        "",
    )
    .await;

    assert!(matches!(
        result,
        Err(AqsError::Status { status: 429, .. })
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_collect_by_state_state_without_counties() {
    let server = MockServer::start().await;
    mount_reference(&server, &["44201"]).await;
    mount_counties(&server, "01", &[], 1).await;
    mount_counties(&server, "02", &["013"], 1).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .respond_with(EchoAnnual)
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let written = collect_by_state(
        &mut client,
        &params(dir.path(), 2019, 2019, FailurePolicy::Skip),
        "",
    )
    .await
    .unwrap();

    assert_eq!(written, vec![dir.path().join("AQS_county_data_Alaska_2019.csv")]);
}

#[tokio::test]
async fn test_collect_by_state_reference_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/states"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let result = collect_by_state(
        &mut client,
        &params(dir.path(), 2019, 2019, FailurePolicy::Skip),
        "",
    )
    .await;

    assert!(matches!(
        result,
        Err(AqsError::Status { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_collect_all_writes_single_indexed_file() {
    let server = MockServer::start().await;
    mount_reference(&server, &["44201", "88101", "42101"]).await;
    mount_counties(&server, "01", &["001", "003"], 1).await;
    mount_counties(&server, "02", &["013"], 1).await;
    mount_non_us_guards(&server).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .respond_with(EchoAnnual)
        .expect(18)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let path = collect_all(&mut client, &params(dir.path(), 2019, 2020, FailurePolicy::Skip))
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("AQS_county_data_2019_2020.csv"));

    // (2 counties + 1 county) x 2 years x 3 parameters
    let (headers, rows) = read_rows(&path);
    assert_eq!(headers[0], "");
    assert_eq!(headers[1], "state_code");
    assert_eq!(rows.len(), 18);
    assert_eq!(rows[0][0], "0");
    assert_eq!(rows[17][0], "17");

    // parameter-major within a state and year
    assert_eq!(rows[0][2..4], ["001", "44201"]);
    assert_eq!(rows[1][2..4], ["003", "44201"]);
    assert_eq!(rows[2][2..4], ["001", "88101"]);
    assert_eq!(rows[12][1], "02");
}

#[tokio::test]
async fn test_collect_all_skips_failed_requests() {
    let server = MockServer::start().await;
    mount_reference(&server, &["44201", "88101"]).await;
    mount_counties(&server, "01", &["001", "003"], 1).await;
    Mock::given(method("GET"))
        .and(path("/list/countiesByState"))
        .and(query_param("state", "02"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .and(query_param("county", "003"))
        .respond_with(ResponseTemplate::new(400))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .and(query_param("county", "001"))
        .respond_with(EchoAnnual)
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let path = collect_all(&mut client, &params(dir.path(), 2019, 2019, FailurePolicy::Skip))
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("AQS_county_data_2019.csv"));
    let (headers, rows) = read_rows(&path);
    assert_eq!(headers[0], "");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][..4], ["0", "01", "001", "44201"]);
    assert_eq!(rows[1][..4], ["1", "01", "001", "88101"]);
    assert!(rows.iter().all(|r| r[2] != "003" && r[1] != "02"));
}

#[tokio::test]
async fn test_collect_all_aborts_on_failure() {
    let server = MockServer::start().await;
    mount_reference(&server, &["44201", "88101"]).await;
    mount_counties(&server, "01", &["001", "003"], 1).await;
    mount_counties(&server, "02", &["013"], 0).await;
    Mock::given(method("GET"))
        .and(path("/annualData/byCounty"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = client(&server);
    let result =
        collect_all(&mut client, &params(dir.path(), 2019, 2019, FailurePolicy::Abort)).await;

    assert!(matches!(
        result,
        Err(AqsError::Status { status: 429, .. })
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
