use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// code of the synthetic response used when the farm cannot be reached
pub const SERVER_NOT_RUNNING: i32 = -5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Success,
    InvalidRequest,
    RequestFailed,
    AccessDenied,
    NoRequest,
    ServerNotRunning,
    ProcessAlreadyRunning,
    ProcessNotRunning,
    FileDoesNotExist,
    FolderDoesNotExist,
    FileNotReady,
    ActionNotImplemented,
    Other(i32),
}

impl ResponseCode {
    pub fn code(self) -> i32 {
        match self {
            ResponseCode::Success => 0,
            ResponseCode::InvalidRequest => -1,
            ResponseCode::RequestFailed => -2,
            ResponseCode::AccessDenied => -3,
            ResponseCode::NoRequest => -4,
            ResponseCode::ServerNotRunning => SERVER_NOT_RUNNING,
            ResponseCode::ProcessAlreadyRunning => -10,
            ResponseCode::ProcessNotRunning => -11,
            ResponseCode::FileDoesNotExist => -12,
            ResponseCode::FolderDoesNotExist => -13,
            ResponseCode::FileNotReady => -14,
            ResponseCode::ActionNotImplemented => -20,
            ResponseCode::Other(code) => code,
        }
    }

    pub fn severity(self) -> Severity {
        Severity::of(self.code())
    }

    /// human readable message, unknown codes fall back to a generic one
    pub fn describe(self) -> String {
        let msg = match self {
            ResponseCode::Success => "Request successful",
            ResponseCode::InvalidRequest => "Invalid request",
            ResponseCode::RequestFailed => "Request failed",
            ResponseCode::AccessDenied => "Access denied",
            ResponseCode::NoRequest => "No request",
            ResponseCode::ServerNotRunning => "Server not running",
            ResponseCode::ProcessAlreadyRunning => "Process already running",
            ResponseCode::ProcessNotRunning => "Process not running",
            ResponseCode::FileDoesNotExist => "File does not exist",
            ResponseCode::FolderDoesNotExist => "Folder does not exist",
            ResponseCode::FileNotReady => "File not ready",
            ResponseCode::ActionNotImplemented => "Action not implemented",
            ResponseCode::Other(code) => return format!("Server returned code {}", code),
        };
        msg.to_string()
    }
}

impl From<i32> for ResponseCode {
    fn from(code: i32) -> Self {
        match code {
            0 => ResponseCode::Success,
            -1 => ResponseCode::InvalidRequest,
            -2 => ResponseCode::RequestFailed,
            -3 => ResponseCode::AccessDenied,
            -4 => ResponseCode::NoRequest,
            SERVER_NOT_RUNNING => ResponseCode::ServerNotRunning,
            -10 => ResponseCode::ProcessAlreadyRunning,
            -11 => ResponseCode::ProcessNotRunning,
            -12 => ResponseCode::FileDoesNotExist,
            -13 => ResponseCode::FolderDoesNotExist,
            -14 => ResponseCode::FileNotReady,
            -20 => ResponseCode::ActionNotImplemented,
            other => ResponseCode::Other(other),
        }
    }
}

/// describe a raw response code
pub fn describe(code: i32) -> String {
    ResponseCode::from(code).describe()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// negative codes are errors, positive ones warnings
    pub fn of(code: i32) -> Self {
        if code < 0 {
            Severity::Error
        } else if code > 0 {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub code: i32,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ServerResponse {
    pub fn new(code: i32, data: Option<Value>) -> Self {
        Self { code, data }
    }

    /// stand-in for a farm that could not be reached at all
    pub fn unreachable() -> Self {
        Self::new(SERVER_NOT_RUNNING, None)
    }

    pub fn is_ok(&self) -> bool {
        self.code >= 0
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(self.code)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderKind {
    Still,
    Animation,
}

impl RenderKind {
    pub fn action(self) -> Action {
        match self {
            RenderKind::Still => Action::Still,
            RenderKind::Animation => Action::Animation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Still,
    Animation,
    Cancel,
    Status,
    Retrieve,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Still => "still",
            Action::Animation => "anim",
            Action::Cancel => "cancel",
            Action::Status => "status",
            Action::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// the farm reports `farm: 1` once it has stopped
const FARM_STOPPED: i64 = 1;

/// payload of a status response, every field may be missing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmStatus {
    #[serde(default)]
    pub farm: Option<i64>,
    #[serde(default)]
    pub nodes: Vec<NodeStatus>,
    #[serde(default)]
    pub render_data: Option<RenderMeta>,
}

impl FarmStatus {
    pub fn farm_running(&self) -> bool {
        self.farm != Some(FARM_STOPPED)
    }

    pub fn first_node(&self) -> Option<&NodeStatus> {
        self.nodes.first()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    #[serde(default)]
    pub current_frame: Option<i64>,
    #[serde(default)]
    pub current_tile: Option<i64>,
    #[serde(default)]
    pub num_tiles: Option<i64>,
    #[serde(default)]
    pub time_left: Option<TimeLeft>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    #[serde(default)]
    pub minutes: Option<i64>,
    #[serde(default)]
    pub seconds: Option<i64>,
    #[serde(default)]
    pub millis: Option<i64>,
}

impl TimeLeft {
    /// (minutes, seconds, millis) if the node reported all of them
    pub fn parts(&self) -> Option<(i64, i64, i64)> {
        Some((self.minutes?, self.seconds?, self.millis?))
    }
}

/// only sent while the farm runs a job
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMeta {
    #[serde(default)]
    pub is_animation: bool,
    #[serde(default)]
    pub start_frame: Option<i64>,
    #[serde(default)]
    pub end_frame: Option<i64>,
}
