//! Fetching from VPIS, the university timetabling web application.
//!
//! VPIS has no single parametrized endpoint. Reaching the activities of a
//! location is a chain of requests:
//!
//! 1. Fetch the control document and find the location's sub-resource URL.
//! 2. GET that URL, following redirects; the *effective* URL is what matters.
//! 3. Optionally rewrite the semester token inside it and append a day
//!    parameter, then GET the result.
//!
//! The query-string shape of step 3 is not documented by VPIS; it is
//! derived by substituting into a previously observed URL.

mod html;
mod transport;
mod xml;

use std::sync::LazyLock;

use occupancy_shared::{Location, OccupancyError, Result, Term, VpisConfig};
use regex::Regex;
use tracing::{debug, info, instrument};
use url::Url;

pub use html::extract_course_names;
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
pub use xml::{ControlDocument, ControlEntry, parse_control_document, parse_room_listing};

/// Content type every XML endpoint must declare.
const XML_CONTENT_TYPE: &str = "application/xml";

/// Placeholder in the configured course-listing path.
const SEMESTER_PLACEHOLDER: &str = ";SEMESTER;";

/// Query parameter selecting a calendar day.
const DAY_PARAM: &str = "Tag";

/// Semester token embedded in activity URLs.
static SEMESTER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[WS]S[0-9]{4}").expect("semester regex"));

// ---------------------------------------------------------------------------
// CatalogFetcher
// ---------------------------------------------------------------------------

/// Performs the chained VPIS requests over an [`HttpTransport`].
pub struct CatalogFetcher<T = ReqwestTransport> {
    transport: T,
    config: VpisConfig,
}

impl CatalogFetcher<ReqwestTransport> {
    /// Fetcher over a real HTTP client.
    pub fn from_config(config: VpisConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> CatalogFetcher<T> {
    pub fn new(transport: T, config: VpisConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &VpisConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and parse the control document.
    #[instrument(skip_all)]
    pub async fn fetch_control_document(&self) -> Result<ControlDocument> {
        let url = parse_url(&self.config.control_url())?;
        let xml = self.fetch_xml(&url).await?;
        let doc = parse_control_document(&xml)?;

        info!(entries = doc.entries.len(), "control document fetched");
        Ok(doc)
    }

    /// Fetch the raw activities XML behind a location URL from the control document.
    #[instrument(skip_all, fields(url = %location_url))]
    pub async fn fetch_activities(
        &self,
        location_url: &str,
        semester: Option<Term>,
        day: Option<&str>,
    ) -> Result<String> {
        let url = parse_url(location_url)?;
        let redirected = self.fetch_ok(&url).await?;
        debug!(final_url = %redirected.final_url, "location URL resolved");

        let target = activities_url(&redirected.final_url, semester, day)?;
        info!(%target, "fetching activities");
        self.fetch_xml(&target).await
    }

    /// Fetch a location's room listing; returns raw room identifiers.
    #[instrument(skip_all, fields(url = %location_url))]
    pub async fn fetch_room_listing(&self, location_url: &str) -> Result<Vec<String>> {
        let url = parse_url(location_url)?;
        let xml = self.fetch_xml(&url).await?;
        parse_room_listing(&xml)
    }

    /// Fetch the HTML course listing of one location and term; returns raw course names.
    #[instrument(skip_all, fields(location = %location, term = %term))]
    pub async fn fetch_course_listing(
        &self,
        location: Location,
        term: Term,
    ) -> Result<Vec<String>> {
        let url = self.course_listing_url(location, term)?;
        let response = self.fetch_ok(&url).await?;
        let names = extract_course_names(&response.text());

        debug!(courses = names.len(), "course listing parsed");
        Ok(names)
    }

    /// URL of the HTML course listing for one location and term.
    pub fn course_listing_url(&self, location: Location, term: Term) -> Result<Url> {
        let path = self
            .config
            .courses_path
            .replace(SEMESTER_PLACEHOLDER, &term.to_string());
        let mut url = parse_url(&format!("{}{path}", self.config.base_url))?;
        url.query_pairs_mut()
            .append_pair("Fachbereich", location.short_code())
            .append_pair("sort", "fachname")
            .append_pair("Template", "None");
        Ok(url)
    }

    /// GET `url` and fail with a transport error unless the status is a success.
    async fn fetch_ok(&self, url: &Url) -> Result<RawResponse> {
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(OccupancyError::http_status(url.as_str(), response.status));
        }
        Ok(response)
    }

    /// GET `url`, require success and an XML content type, return the body.
    async fn fetch_xml(&self, url: &Url) -> Result<String> {
        let response = self.fetch_ok(url).await?;

        let is_xml = response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains(XML_CONTENT_TYPE));
        if !is_xml {
            return Err(OccupancyError::Format {
                url: url.to_string(),
                content_type: response.content_type,
            });
        }

        Ok(response.text())
    }
}

// ---------------------------------------------------------------------------
// URL rewriting
// ---------------------------------------------------------------------------

/// Derive the final activities URL from the effective location URL.
///
/// With a semester, every `SSyyyy`/`WSyyyy` token is replaced; with a day,
/// `Tag=<day>` is appended to the query.
pub fn activities_url(effective: &Url, semester: Option<Term>, day: Option<&str>) -> Result<Url> {
    let mut url = match semester {
        Some(term) => {
            let original = effective.as_str();
            if !SEMESTER_TOKEN_RE.is_match(original) {
                debug!(url = original, "no semester token to rewrite");
            }
            let rewritten = SEMESTER_TOKEN_RE.replace_all(original, term.to_string().as_str());
            parse_url(&rewritten)?
        }
        None => effective.clone(),
    };

    if let Some(day) = day {
        url.query_pairs_mut().append_pair(DAY_PARAM, day);
    }

    Ok(url)
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| OccupancyError::validation(format!("invalid URL '{raw}': {e}")))
}
