//! Client side of the local network render farm: submit a scene, follow
//! its progress, cancel it and fetch the rendered frames.

pub mod artifact;
pub mod error;
pub mod host;
pub mod poller;
pub mod protocol;
pub mod session;
pub mod status_line;
pub mod transport;

pub use lnr_data::{
    describe, Action, FarmStatus, NodeStatus, RenderKind, RenderMeta, ResponseCode,
    ServerResponse, Severity, TimeLeft,
};

pub use crate::{
    error::{LnrError, Result},
    host::{Controls, Host},
    poller::{Event, JobState, Poller, PollerConfig, RESULT_NAME},
    protocol::{Credentials, FarmClient, Report},
    session::{ClientSession, JobHandle},
    transport::{Form, HttpTransport, RawResponse, Transport},
};
