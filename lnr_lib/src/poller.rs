use std::{
    fs,
    path::{Path, PathBuf},
};

use lnr_data::{FarmStatus, RenderKind, ResponseCode};
use tracing::{debug, error, info, instrument};

use crate::{
    artifact,
    error::{LnrError, Result},
    host::{Controls, Host},
    protocol::{FarmClient, Report},
    session::{ClientSession, JobHandle},
    status_line::status_line,
    transport::Transport,
};

/// name the imported render result is given in the host
pub const RESULT_NAME: &str = "Network Render Result";

#[derive(Clone, Debug)]
pub struct PollerConfig {
    /// folder render data is extracted into, usually the scene's folder
    pub output_folder: PathBuf,
    pub result_name: String,
    /// give up after this many failed status requests in a row, never if unset
    pub max_status_errors: Option<u32>,
}

impl PollerConfig {
    pub fn new(output_folder: &Path) -> Self {
        Self {
            output_folder: output_folder.to_path_buf(),
            result_name: RESULT_NAME.to_string(),
            max_status_errors: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Polling,
    Retrieving,
    Completed { result: PathBuf },
    Failed { reason: String },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }
}

/// what a submit, cancel or tick amounted to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// nothing to do, no job is tracked
    Idle,
    Submitted(JobHandle),
    /// the farm refused a submit or cancel with this code
    Rejected(i32),
    CancelRequested,
    Progress(String),
    /// farm running but no node reported yet
    Waiting,
    StatusError(i32),
    /// farm stopped on its own, render data is fetched from the next tick on
    RenderFinished,
    Cancelled,
    AwaitingArtifact,
    Completed(PathBuf),
    Failed(String),
}

/// drives one job from submit to retrieved result, one `tick` at a time
pub struct Poller<T> {
    client: FarmClient<T>,
    config: PollerConfig,
    state: JobState,
    status_errors: u32,
}

impl<T: Transport> Poller<T> {
    pub fn new(client: FarmClient<T>, config: PollerConfig) -> Self {
        Self {
            client,
            config,
            state: JobState::Idle,
            status_errors: 0,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn client(&self) -> &FarmClient<T> {
        &self.client
    }

    /// true while ticks still have work to do
    pub fn is_active(&self) -> bool {
        matches!(self.state, JobState::Polling | JobState::Retrieving)
    }

    /// back to idle after a completed or failed job
    pub fn reset(&mut self) -> bool {
        if self.state.is_terminal() {
            self.state = JobState::Idle;
            true
        } else {
            false
        }
    }

    /// save the scene and send it to the farm, polling starts on success
    #[instrument(skip(self, session, host))]
    pub fn submit(
        &mut self,
        session: &mut ClientSession,
        host: &mut dyn Host,
        kind: RenderKind,
    ) -> Result<Event> {
        let scene = host.save_document()?;
        let bytes = fs::read(&scene)?;
        let response = self.client.submit(kind, &bytes)?;

        if !response.is_ok() {
            host.report(Report::from_code(response.code));
            // a job is already running, offer to cancel it
            if response.response_code() == ResponseCode::ProcessAlreadyRunning {
                show_controls(session, host, Controls::Cancel);
            }
            return Ok(Event::Rejected(response.code));
        }

        let handle = JobHandle::from_payload(response.data.as_ref())?;
        info!("{} submitted as job {}", scene.display(), handle);
        session.handle = Some(handle.clone());
        session.cancel_requested = false;
        show_controls(session, host, Controls::Cancel);
        self.state = JobState::Polling;
        self.status_errors = 0;
        Ok(Event::Submitted(handle))
    }

    /// ask the farm to stop, the next status tick notices the stop
    #[instrument(skip(self, session, host))]
    pub fn cancel(&mut self, session: &mut ClientSession, host: &mut dyn Host) -> Result<Event> {
        if self.state == JobState::Retrieving {
            return Err(LnrError::CancelUnavailable);
        }
        let response = self.client.cancel()?;
        if !response.is_ok() {
            host.report(Report::from_code(response.code));
            if response.response_code() == ResponseCode::ProcessNotRunning {
                show_controls(session, host, Controls::Submit);
            }
            return Ok(Event::Rejected(response.code));
        }
        info!("cancel requested");
        session.cancel_requested = true;
        Ok(Event::CancelRequested)
    }

    /// one timer step, never overlaps with another one
    pub fn tick(&mut self, session: &mut ClientSession, host: &mut dyn Host) -> Event {
        match self.state {
            JobState::Polling => self.poll_status(session, host),
            JobState::Retrieving => self.poll_retrieve(session, host),
            _ => Event::Idle,
        }
    }

    fn poll_status(&mut self, session: &mut ClientSession, host: &mut dyn Host) -> Event {
        let response = match self.client.status() {
            Ok(response) => response,
            Err(err) => return self.fail(session, host, err),
        };

        if !response.is_ok() {
            // errors are reported and polling goes on
            host.report(Report::from_code(response.code));
            self.status_errors += 1;
            if let Some(max) = self.config.max_status_errors {
                if self.status_errors >= max {
                    let reason = format!("giving up after {} failed status requests", max);
                    host.report(Report::error(reason.as_str()));
                    return self.fail_with(session, host, reason);
                }
            }
            return Event::StatusError(response.code);
        }
        self.status_errors = 0;

        let status: FarmStatus = match response.data {
            Some(data) => match serde_json::from_value(data) {
                Ok(status) => status,
                Err(err) => return self.fail(session, host, LnrError::from(err)),
            },
            None => FarmStatus::default(),
        };

        if !status.farm_running() {
            show_controls(session, host, Controls::Submit);
            if session.cancel_requested {
                host.report(Report::info("Render cancelled"));
                session.clear();
                self.state = JobState::Idle;
                return Event::Cancelled;
            }
            host.report(Report::info("Render completed"));
            self.state = JobState::Retrieving;
            return Event::RenderFinished;
        }

        match status.first_node() {
            Some(node) => {
                let line = status_line(node, status.render_data.as_ref());
                host.report(Report::info(line.as_str()));
                Event::Progress(line)
            }
            None => Event::Waiting,
        }
    }

    fn poll_retrieve(&mut self, session: &mut ClientSession, host: &mut dyn Host) -> Event {
        if self.config.output_folder.as_os_str().is_empty() {
            return self.fail(session, host, LnrError::NoRootFolder);
        }
        let handle = match session.handle.clone() {
            Some(handle) => handle,
            None => {
                let err = LnrError::Payload("no job handle to retrieve".to_string());
                return self.fail(session, host, err);
            }
        };

        let folder = self.config.output_folder.clone();
        let response = match artifact::retrieve(&self.client, handle.as_str(), &folder) {
            Ok(response) => response,
            Err(err) => return self.fail(session, host, err),
        };

        if response.response_code() == ResponseCode::FileNotReady {
            debug!("render data of job {} not ready yet", handle);
            return Event::AwaitingArtifact;
        }
        if !response.is_ok() {
            host.report(Report::from_code(response.code));
            let reason = response.response_code().describe();
            return self.fail_with(session, host, reason);
        }

        let result = match artifact::latest_entry(&folder.join(handle.as_str())) {
            Ok(result) => result,
            Err(err) => return self.fail(session, host, err),
        };
        if let Err(err) = host.import_image(&result, &self.config.result_name) {
            return self.fail(session, host, err);
        }
        host.report(Report::info("Retrieved render data"));
        info!("job {} completed, result {}", handle, result.display());
        session.clear();
        self.state = JobState::Completed {
            result: result.clone(),
        };
        Event::Completed(result)
    }

    fn fail(&mut self, session: &mut ClientSession, host: &mut dyn Host, err: LnrError) -> Event {
        host.report(Report::error(err.to_string()));
        self.fail_with(session, host, err.to_string())
    }

    /// a failed job is no longer tracked, the host gets its submit control back
    /// wherever the failure happened
    fn fail_with(
        &mut self,
        session: &mut ClientSession,
        host: &mut dyn Host,
        reason: String,
    ) -> Event {
        error!("job failed: {}", reason);
        session.clear();
        if session.controls != Controls::Submit {
            show_controls(session, host, Controls::Submit);
        }
        self.state = JobState::Failed {
            reason: reason.clone(),
        };
        Event::Failed(reason)
    }
}

fn show_controls(session: &mut ClientSession, host: &mut dyn Host, controls: Controls) {
    session.controls = controls;
    host.swap_controls(controls);
}
