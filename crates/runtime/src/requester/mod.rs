//! REST requests against a node server.
//!
//! A [`RequestDescriptor`] names the route, query, body, and extra headers of
//! one call. [`Requester::send`] turns it into an HTTP request against the
//! dialect's base URL and classifies the response strictly by status:
//!
//! | Status | Outcome |
//! |--------|---------|
//! | 204 | `Ok(None)`, a valid empty result |
//! | 200 | body parsed as JSON, translated if it carries `loadType`, then typed |
//! | other | logged, `Ok(None)` |
//!
//! A 200 with a body that does not parse is a hard [`Error::Parse`].

#[cfg(test)]
mod tests;

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tidelink_protocol::LOAD_TYPE_FIELD;
use tracing::{debug, warn};
use url::Url;

use crate::config::DriverConfig;
use crate::error::{Error, Result};

/// Rewrites a response carrying a `loadType` into the canonical taxonomy.
pub type Translator = fn(Value) -> Value;

/// HTTP method of a node route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Get,
	Post,
	Put,
	Patch,
	Delete,
}

impl Method {
	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}

	fn to_reqwest(self) -> reqwest::Method {
		match self {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One REST call, relative to the dialect's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
	pub method: Method,
	/// Path appended to the base URL, e.g. `/loadtracks`.
	pub path: String,
	/// Query pairs. When non-empty they replace any query in `path`.
	pub params: Vec<(String, String)>,
	/// Structured body, sent as JSON.
	pub data: Option<Value>,
	/// Raw body, used only when `data` is absent.
	pub body: Option<String>,
	/// Caller headers. They may override `User-Agent` but never `Authorization`.
	pub headers: Vec<(String, String)>,
	/// The call requires an established session.
	pub use_session_id: bool,
}

impl RequestDescriptor {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			params: Vec::new(),
			data: None,
			body: None,
			headers: Vec::new(),
			use_session_id: false,
		}
	}

	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));
		self
	}

	pub fn data(mut self, data: Value) -> Self {
		self.data = Some(data);
		self
	}

	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn with_session_id(mut self) -> Self {
		self.use_session_id = true;
		self
	}
}

/// Issues descriptor-driven REST calls for one driver.
#[derive(Clone)]
pub struct Requester {
	driver: &'static str,
	client: Client,
	base_url: String,
	auth: String,
	user_agent: String,
	translator: Translator,
}

impl fmt::Debug for Requester {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Requester")
			.field("driver", &self.driver)
			.field("base_url", &self.base_url)
			.field("user_agent", &self.user_agent)
			.finish_non_exhaustive()
	}
}

impl Requester {
	pub fn new(driver: &'static str, client: Client, config: &DriverConfig, translator: Translator) -> Self {
		Self {
			driver,
			client,
			base_url: config.http_url.clone(),
			auth: config.node.auth.clone(),
			user_agent: config.manager.user_agent.clone(),
			translator,
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Full URL of `descriptor`, with its params as the query string.
	pub fn url_for(&self, descriptor: &RequestDescriptor) -> Result<Url> {
		let raw = format!("{}{}", self.base_url, descriptor.path);
		let mut url = Url::parse(&raw).map_err(|e| Error::InvalidConfig(format!("{raw}: {e}")))?;
		if !descriptor.params.is_empty() {
			url.set_query(None);
			url.query_pairs_mut().extend_pairs(&descriptor.params);
		}
		Ok(url)
	}

	/// Merged headers: user agent, then caller headers, then authorization.
	pub fn headers_for(&self, descriptor: &RequestDescriptor) -> Result<HeaderMap> {
		let mut headers = HeaderMap::new();
		headers.insert(USER_AGENT, header_value("User-Agent", &self.user_agent)?);

		for (name, value) in &descriptor.headers {
			let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidConfig(format!("header name '{name}': {e}")))?;
			let value = header_value(name.as_str(), value)?;
			headers.insert(name, value);
		}

		headers.insert(AUTHORIZATION, header_value("Authorization", &self.auth)?);

		if descriptor.data.is_some() && !headers.contains_key(CONTENT_TYPE) {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}
		Ok(headers)
	}

	/// Sends `descriptor` and decodes a 200 body as `T`.
	///
	/// Returns `Ok(None)` for 204 and for any status other than 200.
	pub async fn send<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<Option<T>> {
		let url = self.url_for(descriptor)?;
		let headers = self.headers_for(descriptor)?;

		let mut request = self.client.request(descriptor.method.to_reqwest(), url.clone()).headers(headers.clone());
		if let Some(data) = &descriptor.data {
			request = request.body(serde_json::to_vec(data)?);
		} else if let Some(body) = &descriptor.body {
			request = request.body(body.clone());
		}

		let response = request.send().await?;
		let status = response.status();

		if status == StatusCode::NO_CONTENT {
			debug!(driver = self.driver, method = %descriptor.method, path = %url.path(), "No content");
			return Ok(None);
		}
		if status != StatusCode::OK {
			warn!(
				driver = self.driver,
				method = %descriptor.method,
				url = %url,
				status = status.as_u16(),
				headers = ?redacted(&headers),
				"Node server answered with unexpected status"
			);
			return Ok(None);
		}

		let bytes = response.bytes().await?;
		let value: Value = serde_json::from_slice(&bytes)?;
		let tagged = value.get(LOAD_TYPE_FIELD).is_some_and(|tag| !tag.is_null());
		let value = if tagged { (self.translator)(value) } else { value };

		debug!(driver = self.driver, method = %descriptor.method, path = %url.path(), query = url.query().unwrap_or_default(), "Request completed");
		Ok(Some(serde_json::from_value(value)?))
	}
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
	HeaderValue::from_str(value).map_err(|e| Error::InvalidConfig(format!("header '{name}': {e}")))
}

/// Header pairs for diagnostics, with the credential masked.
fn redacted(headers: &HeaderMap) -> Vec<(String, String)> {
	headers
		.iter()
		.map(|(name, value)| {
			let shown = if name == AUTHORIZATION {
				"<redacted>".to_string()
			} else {
				value.to_str().unwrap_or("<binary>").to_string()
			};
			(name.to_string(), shown)
		})
		.collect()
}
