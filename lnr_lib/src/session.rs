use std::{
    fmt,
    path::{Component, Path},
};

use serde_json::Value;

use crate::{
    error::{LnrError, Result},
    host::Controls,
};

/// identifier the farm hands out for a submitted job
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(handle: &str) -> Self {
        Self(handle.to_string())
    }

    /// a handle names the folder render data lands in, so it has to be a
    /// single plain path component
    pub fn parse(handle: &str) -> Result<Self> {
        let mut components = Path::new(handle).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == handle => Ok(Self::new(handle)),
            _ => Err(LnrError::Payload(format!(
                "job handle {:?} is not a plain folder name",
                handle
            ))),
        }
    }

    /// the handle travels as the `data` of a successful submit
    pub fn from_payload(data: Option<&Value>) -> Result<Self> {
        match data {
            Some(Value::String(handle)) if !handle.is_empty() => Self::parse(handle),
            Some(Value::Number(handle)) => Ok(Self(handle.to_string())),
            other => Err(LnrError::Payload(format!(
                "expected a job handle, got {:?}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// per client state shared by submit, cancel and the poller ticks
#[derive(Debug)]
pub struct ClientSession {
    pub handle: Option<JobHandle>,
    pub cancel_requested: bool,
    pub controls: Controls,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_requested: false,
            controls: Controls::Submit,
        }
    }

    /// job reached a terminal state
    pub fn clear(&mut self) {
        self.handle = None;
        self.cancel_requested = false;
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
