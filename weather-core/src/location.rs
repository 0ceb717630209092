//! Current-position lookup behind a permission decision.
//!
//! A [`LocationProvider`] pairs the session's [`Permission`] with a
//! [`PositionSource`]. The source is only consulted once permission is granted.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    config::{PermissionPolicy, SourceKind},
    error::LocationError,
    model::Coordinates,
};

/// The user's answer for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    /// Map a stored policy to a decision. `Ask` has no answer yet.
    pub fn from_policy(policy: PermissionPolicy) -> Option<Self> {
        match policy {
            PermissionPolicy::Granted => Some(Permission::Granted),
            PermissionPolicy::Denied => Some(Permission::Denied),
            PermissionPolicy::Ask => None,
        }
    }
}

#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Always reports the same coordinates.
#[derive(Debug, Clone)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Approximate position from the public IP address (ip-api.com JSON shape).
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    url: String,
    http: Client,
}

impl IpGeolocation {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl PositionSource for IpGeolocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let unavailable = |e: reqwest::Error| LocationError::Unavailable(e.to_string());

        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(unavailable)?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "IP lookup returned status {status}"
            )));
        }

        let body: IpApiResponse = res.json().await.map_err(unavailable)?;

        if body.status != "success" {
            return Err(LocationError::Unavailable(
                body.message.unwrap_or_else(|| "IP lookup failed".to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .map_err(|e| LocationError::Unavailable(e.to_string())),
            _ => Err(LocationError::Unavailable(
                "IP lookup response has no coordinates".to_string(),
            )),
        }
    }
}

/// Produces one position per request, or a denial.
#[derive(Debug, Clone)]
pub struct LocationProvider {
    permission: Permission,
    source: Arc<dyn PositionSource>,
}

impl LocationProvider {
    pub fn new(permission: Permission, source: Arc<dyn PositionSource>) -> Self {
        Self { permission, source }
    }

    /// Build the configured source. The permission must already be decided.
    pub fn from_config(config: &Config, permission: Permission) -> anyhow::Result<Self> {
        let source: Arc<dyn PositionSource> = match config.location.source {
            SourceKind::Fixed => Arc::new(FixedPosition(config.fixed_coordinates()?)),
            SourceKind::Ip => Arc::new(IpGeolocation::new(config.ip_lookup_url())),
        };

        Ok(Self::new(permission, source))
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if self.permission == Permission::Denied {
            tracing::info!("location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let result = self.source.current_position().await;
        match &result {
            Ok(coords) => tracing::info!(%coords, "location resolved"),
            Err(err) => tracing::warn!(error = %err, "location lookup failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixed(lat: f64, lon: f64) -> Arc<dyn PositionSource> {
        Arc::new(FixedPosition(Coordinates::new(lat, lon).unwrap()))
    }

    #[test]
    fn permission_from_policy() {
        assert_eq!(
            Permission::from_policy(PermissionPolicy::Granted),
            Some(Permission::Granted)
        );
        assert_eq!(
            Permission::from_policy(PermissionPolicy::Denied),
            Some(Permission::Denied)
        );
        assert_eq!(Permission::from_policy(PermissionPolicy::Ask), None);
    }

    #[tokio::test]
    async fn denied_permission_never_reads_the_source() {
        let provider = LocationProvider::new(Permission::Denied, fixed(1.0, 2.0));

        let err = provider.current_position().await.unwrap_err();
        assert_eq!(err, LocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn granted_permission_returns_source_position() {
        let provider = LocationProvider::new(Permission::Granted, fixed(40.0, -75.0));

        let coords = provider.current_position().await.expect("position");
        assert_eq!(coords, Coordinates::new(40.0, -75.0).unwrap());
    }

    #[test]
    fn from_config_requires_fixed_coordinates() {
        let mut cfg = Config::default();
        cfg.location.source = SourceKind::Fixed;

        assert!(LocationProvider::from_config(&cfg, Permission::Granted).is_err());

        cfg.location.latitude = Some(10.0);
        cfg.location.longitude = Some(20.0);
        assert!(LocationProvider::from_config(&cfg, Permission::Granted).is_ok());
    }

    #[tokio::test]
    async fn ip_lookup_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .and(query_param("fields", "status,message,lat,lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 52.52,
                "lon": 13.405
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = IpGeolocation::new(&format!("{}/json/", server.uri()));
        let coords = source.current_position().await.expect("position");

        assert_eq!(coords.latitude(), 52.52);
        assert_eq!(coords.longitude(), 13.405);
    }

    #[tokio::test]
    async fn ip_lookup_failure_status_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "reserved range"
            })))
            .mount(&server)
            .await;

        let source = IpGeolocation::new(&format!("{}/json/", server.uri()));
        let err = source.current_position().await.unwrap_err();

        assert_eq!(err, LocationError::Unavailable("reserved range".into()));
    }

    #[tokio::test]
    async fn ip_lookup_http_error_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = IpGeolocation::new(&format!("{}/json/", server.uri()));
        let err = source.current_position().await.unwrap_err();

        assert!(matches!(err, LocationError::Unavailable(msg) if msg.contains("503")));
    }
}
