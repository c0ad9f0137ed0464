use crate::model::{DecodeError, RawRecord, Region, parse_records, parse_regions};

use std::{sync::LazyLock, time::Duration};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const REGION_LIST_FILE: &str = "states.json";

static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build HTTP client, using defaults: {e}");
            reqwest::Client::new()
        })
});

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    Status { status: u16, url: String },
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Joins the payload file name onto the API base, tolerating a missing trailing slash.
pub fn endpoint(base_url: &str, file: &str) -> String {
    if base_url.ends_with('/') {
        format!("{base_url}{file}")
    } else {
        format!("{base_url}/{file}")
    }
}

pub fn region_file(code: &str) -> String {
    format!("{}.json", code.to_lowercase())
}

async fn get_text(url: &str) -> Result<String, FetchError> {
    log::debug!("GET {url}");

    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response.text().await?)
}

pub async fn fetch_regions(base_url: &str) -> Result<Vec<Region>, FetchError> {
    let url = endpoint(base_url, REGION_LIST_FILE);
    let text = get_text(&url).await?;

    let regions = parse_regions(&text)?;
    log::info!("Fetched {} regions", regions.len());
    Ok(regions)
}

pub async fn fetch_region(base_url: &str, code: &str) -> Result<Vec<RawRecord>, FetchError> {
    let url = endpoint(base_url, &region_file(code));
    let text = get_text(&url).await?;

    let records = parse_records(&text)?;
    log::info!("Fetched {} records for {code}", records.len());
    Ok(records)
}
