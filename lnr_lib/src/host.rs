use std::path::{Path, PathBuf};

use crate::{error::Result, protocol::Report};

/// control set the host shows next to the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controls {
    /// render still / render animation
    Submit,
    /// cancel the job running on the farm
    Cancel,
}

/// the application embedding the client
pub trait Host {
    /// persist the open scene if it has unsaved changes and return its path
    fn save_document(&mut self) -> Result<PathBuf>;

    fn swap_controls(&mut self, controls: Controls);

    /// load `path`, replacing any previous item called `name`
    fn import_image(&mut self, path: &Path, name: &str) -> Result<()>;

    fn report(&mut self, report: Report);
}
