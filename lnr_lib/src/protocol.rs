use std::fmt;

pub use lnr_data::{describe, Action, RenderKind, ResponseCode, ServerResponse, Severity};
use tracing::{debug, instrument};

use crate::{
    error::Result,
    transport::{Form, RawResponse, Transport},
};

/// shared secret and command namespace sent with every request
#[derive(Clone)]
pub struct Credentials {
    password: String,
    command: String,
}

impl Credentials {
    pub fn new(password: &str, command: &str) -> Self {
        Self {
            password: password.to_string(),
            command: command.to_string(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

// keep the password out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"***")
            .field("command", &self.command)
            .finish()
    }
}

/// a message for the user, severity follows the sign of the response code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
}

impl Report {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn from_code(code: i32) -> Self {
        Self {
            severity: Severity::of(code),
            message: describe(code),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LNR: {}", self.message)
    }
}

/// decode a raw reply, an unreachable farm becomes the "server not running" code
pub fn decode(raw: RawResponse) -> Result<ServerResponse> {
    match raw {
        RawResponse::Unreachable => Ok(ServerResponse::unreachable()),
        RawResponse::Body(text) => Ok(serde_json::from_str(&text)?),
    }
}

pub struct FarmClient<T> {
    transport: T,
    credentials: Credentials,
}

impl<T: Transport> FarmClient<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn form(&self, action: Action, data: Option<&str>) -> Form {
        let mut form = vec![
            ("pass", self.credentials.password.clone()),
            ("command", self.credentials.command.clone()),
            ("action", action.as_str().to_string()),
        ];
        if let Some(data) = data {
            form.push(("data", data.to_string()));
        }
        form
    }

    /// submit a scene file for rendering
    #[instrument(skip(self, scene))]
    pub fn submit(&self, kind: RenderKind, scene: &[u8]) -> Result<ServerResponse> {
        debug!("submitting {} bytes", scene.len());
        self.send(kind.action(), None, Some(scene))
    }

    #[instrument(skip(self))]
    pub fn cancel(&self) -> Result<ServerResponse> {
        self.send(Action::Cancel, None, None)
    }

    #[instrument(skip(self))]
    pub fn status(&self) -> Result<ServerResponse> {
        self.send(Action::Status, None, None)
    }

    /// request the archive of a finished job without unpacking it
    #[instrument(skip(self))]
    pub fn retrieve_raw(&self, handle: &str) -> Result<ServerResponse> {
        self.send(Action::Retrieve, Some(handle), None)
    }

    fn send(
        &self,
        action: Action,
        data: Option<&str>,
        attachment: Option<&[u8]>,
    ) -> Result<ServerResponse> {
        let form = self.form(action, data);
        let response = decode(self.transport.post(&form, attachment))?;
        debug!("{} answered with code {}", action, response.code);
        Ok(response)
    }
}
