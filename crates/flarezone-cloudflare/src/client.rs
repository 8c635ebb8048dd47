//! Client API v4 service

use flarezone_core::{
    Credentials, Error, Fields, NewZone, Page, Result, ServiceConfig, SettingUpdate, ZoneService,
};
use reqwest::Method;
use serde_json::{Value, json};

use crate::{PROVIDER, build_client};
use crate::types::{ApiEnvelope, parse_envelope};

/// Cloudflare client API service for one account
///
/// Authenticates every request with the account email and global API key.
/// One method call is one HTTP request; failures are returned as is.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
pub struct CloudflareService {
    api_base: String,
    email: String,
    /// ⚠️ NEVER log this value
    api_key: String,
    per_page: u32,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for CloudflareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareService")
            .field("api_base", &self.api_base)
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl CloudflareService {
    /// Create a service acting as `credentials`
    ///
    /// Fails with `Error::Config` on invalid configuration or credentials.
    pub fn new(config: &ServiceConfig, credentials: &Credentials) -> Result<Self> {
        config.validate()?;
        Self::with_client(config, credentials, build_client(config)?)
    }

    /// Create a service sharing an existing HTTP client
    pub(crate) fn with_client(
        config: &ServiceConfig,
        credentials: &Credentials,
        client: reqwest::blocking::Client,
    ) -> Result<Self> {
        credentials.validate()?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            email: credentials.email.clone(),
            api_key: credentials.api_key.clone(),
            per_page: config.per_page,
            client,
        })
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiEnvelope> {
        let url = format!("{}{}", self.api_base, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.api_key)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        tracing::debug!("Response Status: {}", status);

        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        parse_envelope(status.as_u16(), &body)
    }

    fn page_query(&self, page: u32) -> [(&'static str, String); 2] {
        [("page", page.to_string()), ("per_page", self.per_page.to_string())]
    }
}

/// Request body for zone creation
pub(crate) fn create_zone_body(zone: &NewZone) -> Value {
    let mut body = json!({
        "name": zone.name,
        "jump_start": zone.jump_start,
    });
    if let Some(organization) = &zone.organization {
        body["organization"] = json!({ "id": organization });
    }
    body
}

/// First match of a by-name zone listing
pub(crate) fn first_zone(page: Page<Fields>, name: &str) -> Result<Fields> {
    let zone = page
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(format!("Zone not found: {}", name)))?;

    let id = zone.get("id").cloned().unwrap_or_default();
    tracing::debug!("Found zone {}: {}", name, id);
    Ok(zone)
}

impl ZoneService for CloudflareService {
    fn get_zones(&self, page: u32) -> Result<Page<Fields>> {
        self.request(Method::GET, "/zones", &self.page_query(page), None)?
            .into_page(page)
    }

    fn get_zone_by_name(&self, name: &str) -> Result<Fields> {
        let page = self
            .request(Method::GET, "/zones", &[("name", name.to_string())], None)?
            .into_page(1)?;

        first_zone(page, name)
    }

    fn create_zone(&self, zone: &NewZone) -> Result<Fields> {
        let body = create_zone_body(zone);
        self.request(Method::POST, "/zones", &[], Some(&body))?
            .into_object()
    }

    fn delete_zone(&self, zone_id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("/zones/{}", zone_id), &[], None)?;
        Ok(())
    }

    fn get_zone_settings(&self, zone_id: &str, page: u32) -> Result<Page<Fields>> {
        if page > 1 {
            // Settings are not paginated; the first page is the only page.
            return Ok(Page::new(Vec::new(), page, 1));
        }
        self.request(Method::GET, &format!("/zones/{}/settings", zone_id), &[], None)?
            .into_page(page)
    }

    fn set_zone_settings(&self, zone_id: &str, items: &[SettingUpdate]) -> Result<()> {
        let body = json!({ "items": items });
        self.request(
            Method::PATCH,
            &format!("/zones/{}/settings", zone_id),
            &[],
            Some(&body),
        )?;
        Ok(())
    }

    fn get_dns_records(&self, zone_id: &str, page: u32) -> Result<Page<Fields>> {
        self.request(
            Method::GET,
            &format!("/zones/{}/dns_records", zone_id),
            &self.page_query(page),
            None,
        )?
        .into_page(page)
    }

    fn create_dns_record(&self, zone_id: &str, fields: &Fields) -> Result<Fields> {
        let body = Value::Object(fields.clone());
        self.request(
            Method::POST,
            &format!("/zones/{}/dns_records", zone_id),
            &[],
            Some(&body),
        )?
        .into_object()
    }

    fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        fields: &Fields,
    ) -> Result<Fields> {
        let body = Value::Object(fields.clone());
        self.request(
            Method::PATCH,
            &format!("/zones/{}/dns_records/{}", zone_id, record_id),
            &[],
            Some(&body),
        )?
        .into_object()
    }

    fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            &format!("/zones/{}/dns_records/{}", zone_id, record_id),
            &[],
            None,
        )?;
        Ok(())
    }

    fn service_name(&self) -> &'static str {
        PROVIDER
    }
}
