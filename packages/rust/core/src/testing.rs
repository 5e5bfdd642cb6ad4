//! In-memory VPIS stand-in for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use occupancy_shared::{OccupancyError, Result, VpisConfig};
use occupancy_vpis::{CatalogFetcher, HttpTransport, RawResponse};
use url::Url;

pub(crate) const BASE: &str = "https://vpis.test";

struct Route {
    status: u16,
    content_type: Option<String>,
    final_url: Option<String>,
    body: String,
}

/// Serves canned responses by exact URL; anything else is a 404.
#[derive(Default)]
pub(crate) struct FakeVpis {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
}

impl FakeVpis {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn xml(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status: 200,
                content_type: Some("application/xml".into()),
                final_url: None,
                body: body.to_string(),
            },
        );
        self
    }

    pub(crate) fn html(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status: 200,
                content_type: Some("text/html".into()),
                final_url: None,
                body: body.to_string(),
            },
        );
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status,
                content_type: None,
                final_url: None,
                body: String::new(),
            },
        );
        self
    }

    /// `from` answers as if redirected to `to`.
    pub(crate) fn redirect(mut self, from: &str, to: &str) -> Self {
        self.routes.insert(
            from.to_string(),
            Route {
                status: 200,
                content_type: Some("text/html".into()),
                final_url: Some(to.to_string()),
                body: String::new(),
            },
        );
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub(crate) fn fetcher(self) -> CatalogFetcher<FakeVpis> {
        CatalogFetcher::new(self, VpisConfig::default().with_base_url(BASE))
    }
}

impl HttpTransport for FakeVpis {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(url.to_string());
        }

        let Some(route) = self.routes.get(url.as_str()) else {
            return Ok(RawResponse {
                status: 404,
                content_type: None,
                final_url: url.clone(),
                body: Vec::new(),
            });
        };

        let final_url = match &route.final_url {
            Some(to) => Url::parse(to).map_err(|e| OccupancyError::network(to, e.to_string()))?,
            None => url.clone(),
        };

        Ok(RawResponse {
            status: route.status,
            content_type: route.content_type.clone(),
            final_url,
            body: route.body.clone().into_bytes(),
        })
    }
}

/// Control document listing Iserlohn and Hagen (but not the other three).
pub(crate) fn control_xml() -> String {
    format!(
        r#"<vpis>
  <locations href="{BASE}/location/is">Iserlohn</locations>
  <locations href="{BASE}/location/ha">Hagen</locations>
  <locations href="{BASE}/location/iah">Hagen IAH</locations>
</vpis>"#
    )
}

pub(crate) fn fixture(name: &str) -> String {
    let path = format!("../../../fixtures/vpis/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
}
