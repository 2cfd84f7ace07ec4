use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::blocking::Client;
use tracing::{debug, warn};

/// form fields of one request, in the order they are sent
pub type Form = Vec<(&'static str, String)>;

/// form field the scene file travels in
const ATTACHMENT_FIELD: &str = "data";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawResponse {
    Body(String),
    Unreachable,
}

/// posts a form to the farm
/// network level failures never escape, they become `RawResponse::Unreachable`
pub trait Transport {
    fn post(&self, form: &Form, attachment: Option<&[u8]>) -> RawResponse;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, form: &Form, attachment: Option<&[u8]>) -> RawResponse {
        (**self).post(form, attachment)
    }
}

pub struct HttpTransport {
    http_client: Client,
    url: String,
}

impl HttpTransport {
    /// the farm runs on the local network with a self-signed certificate,
    /// so certificate and hostname checks are switched off
    pub fn new(url: &str, timeout: Duration) -> reqwest::Result<Self> {
        warn!("tls certificate validation disabled for {}", url);
        let http_client = Client::builder()
            .danger_accept_invalid_certs(true)
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http_client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn post(&self, form: &Form, attachment: Option<&[u8]>) -> RawResponse {
        let mut fields = form.clone();
        if let Some(bytes) = attachment {
            fields.retain(|(name, _)| *name != ATTACHMENT_FIELD);
            fields.push((ATTACHMENT_FIELD, STANDARD.encode(bytes)));
        }
        let request = match self.http_client.post(&self.url).form(&fields).build() {
            Ok(request) => request,
            Err(e) => {
                warn!("could not build request: {}", e);
                return RawResponse::Unreachable;
            }
        };

        match self.http_client.execute(request) {
            Ok(response) => {
                debug!("farm answered with http status {}", response.status());
                match response.text() {
                    Ok(text) => RawResponse::Body(text),
                    Err(e) => {
                        warn!("could not read response body: {}", e);
                        RawResponse::Unreachable
                    }
                }
            }
            Err(e) => {
                warn!("error executing request: {}", e);
                RawResponse::Unreachable
            }
        }
    }
}
