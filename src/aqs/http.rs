//! HTTP client for the EPA AQS data API.
//!
//! Every endpoint takes `email` and `key` as query parameters followed by its
//! own fields. A 200 response is parsed into its `Data` array; any other status
//! is printed and returned as [`QueryOutcome::Status`] without reading the body.

use std::{fmt, io::Write, time::Duration};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    aqs::types::{AqsEnvelope, CodeRow, CodeTable, QueryOutcome, Record, RecordSet},
    core::Throttle,
    AqsError, Result, AQS_BASE_URL,
};


pub const STATES_ENDPOINT: &str = "list/states";
pub const COUNTIES_ENDPOINT: &str = "list/countiesByState";
pub const PARAMS_BY_CLASS_ENDPOINT: &str = "list/parametersByClass";
pub const ANNUAL_BY_COUNTY_ENDPOINT: &str = "annualData/byCounty";

const USER_AGENT: &str = "aqs-county/0.1";

/// Email/key pair sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub key: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            key: key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("key", &"***")
            .finish()
    }
}

/// Connection settings for [`AqsClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Minimum time between the start of consecutive requests
    pub min_interval: Duration,
    /// Per-request timeout; `None` keeps the reqwest default
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: AQS_BASE_URL.to_string(),
            min_interval: Duration::ZERO,
            timeout: None,
        }
    }
}

pub struct AqsClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    throttle: Throttle,
    status_out: Box<dyn Write + Send>,
}

impl AqsClient {
    pub fn new(credentials: Credentials, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            credentials,
            throttle: Throttle::new(options.min_interval),
            status_out: Box::new(std::io::stdout()),
        })
    }

    /// Send `status: <code>` lines to `out` instead of stdout.
    pub fn with_status_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.status_out = Box::new(out);
        self
    }

    /// Unthrottled client against `base_url`, mainly for pointing at a mock server.
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        Self::new(
            credentials,
            ClientOptions {
                base_url: base_url.into(),
                ..ClientOptions::default()
            },
        )
    }

    /// GET `endpoint` with credentials plus `fields` and parse its `Data` array.
    async fn query<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> Result<QueryOutcome<Vec<T>>> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params: Vec<(&str, &str)> = Vec::with_capacity(fields.len() + 2);
        params.push(("email", self.credentials.email.as_str()));
        params.push(("key", self.credentials.key.as_str()));
        params.extend_from_slice(fields);

        self.throttle.wait().await;
        tracing::debug!(%url, ?fields, "AQS request");

        // reqwest errors carry the request URL, which holds the key
        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AqsError::Http(e.without_url()))?;
        let status = res.status();

        if status != StatusCode::OK {
            writeln!(self.status_out, "status: {}", status.as_u16())?;
            self.status_out.flush()?;
            return Ok(QueryOutcome::Status(status.as_u16()));
        }

        let body = res
            .text()
            .await
            .map_err(|e| AqsError::Http(e.without_url()))?;
        let envelope: AqsEnvelope<T> = serde_json::from_str(&body)?;
        let data = envelope.data.ok_or_else(|| AqsError::MissingData {
            endpoint: endpoint.to_string(),
        })?;

        tracing::debug!(endpoint, rows = data.len(), "AQS response");
        Ok(QueryOutcome::Data(data))
    }

    /// Full state code table, including the trailing non-US entries.
    pub async fn get_state_codes(&mut self) -> Result<QueryOutcome<CodeTable>> {
        let outcome = self.query::<CodeRow>(STATES_ENDPOINT, &[]).await?;
        Ok(outcome.map(CodeTable))
    }

    /// County codes within `state`.
    pub async fn get_county_codes(&mut self, state: &str) -> Result<QueryOutcome<Vec<String>>> {
        let outcome = self
            .query::<CodeRow>(COUNTIES_ENDPOINT, &[("state", state)])
            .await?;
        Ok(outcome.map(|rows| CodeTable(rows).codes()))
    }

    /// Parameter codes in parameter class `pc` (e.g. `CRITERIA`).
    pub async fn get_param_codes_by_class(
        &mut self,
        pc: &str,
    ) -> Result<QueryOutcome<Vec<String>>> {
        let outcome = self
            .query::<CodeRow>(PARAMS_BY_CLASS_ENDPOINT, &[("pc", pc)])
            .await?;
        Ok(outcome.map(|rows| CodeTable(rows).codes()))
    }

    /// Annual summary rows for one parameter (or comma-joined parameter group)
    /// in one county.
    ///
    /// `bdate` and `edate` must fall in the same calendar year; AQS rejects
    /// the request otherwise.
    pub async fn aqs_api_annual_county(
        &mut self,
        param: &str,
        bdate: &str,
        edate: &str,
        state: &str,
        county: &str,
    ) -> Result<QueryOutcome<RecordSet>> {
        let outcome = self
            .query::<Record>(
                ANNUAL_BY_COUNTY_ENDPOINT,
                &[
                    ("param", param),
                    ("bdate", bdate),
                    ("edate", edate),
                    ("state", state),
                    ("county", county),
                ],
            )
            .await?;
        Ok(outcome.map(RecordSet))
    }
}
