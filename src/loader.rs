use gloo_net::http::Request;

use crate::config::GlobeConfig;
use crate::error::LoadError;
use crate::model::GlobeData;

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let failed = |message: String| LoadError::Fetch {
        url: url.to_string(),
        message,
    };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;
    if !resp.ok() {
        return Err(failed(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| failed(e.to_string()))
}

/// Fetches and decodes the marker records and the land topology.
pub async fn load_globe_data(config: &GlobeConfig) -> Result<GlobeData, LoadError> {
    let markers = fetch_text(&config.markers_url).await?;
    let land = fetch_text(&config.land_url).await?;
    let data = GlobeData::from_sources(&markers, &land, &config.land_object)?;
    log::info!(
        "loaded {} markers from {}, land from {}",
        data.markers.len(),
        config.markers_url,
        config.land_url
    );
    Ok(data)
}
