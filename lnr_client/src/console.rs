use std::{
    fs,
    path::{Path, PathBuf},
};

use lnr_lib::{Controls, Host, LnrError, Report, Result, Severity};
use tracing::{debug, info};

/// terminal stand-in for the host application
pub struct ConsoleHost {
    scene: PathBuf,
    /// imported results are copied here
    result_dir: PathBuf,
}

impl ConsoleHost {
    pub fn new(scene: &Path, result_dir: &Path) -> Self {
        Self {
            scene: scene.to_path_buf(),
            result_dir: result_dir.to_path_buf(),
        }
    }
}

impl Host for ConsoleHost {
    // scenes on disk have no unsaved changes
    fn save_document(&mut self) -> Result<PathBuf> {
        if !self.scene.is_file() {
            return Err(LnrError::Host(format!(
                "scene {} does not exist",
                self.scene.display()
            )));
        }
        Ok(self.scene.clone())
    }

    fn swap_controls(&mut self, controls: Controls) {
        debug!("controls now {:?}", controls);
        if controls == Controls::Cancel {
            info!("press ctrl-c to cancel the network render");
        }
    }

    fn import_image(&mut self, path: &Path, name: &str) -> Result<()> {
        // drop the previous result, whatever its extension was
        for entry in fs::read_dir(&self.result_dir)? {
            let entry = entry?.path();
            if entry.is_file() && entry.file_stem().map(|s| s == name).unwrap_or(false) {
                fs::remove_file(&entry)?;
            }
        }
        let target = match path.extension() {
            Some(ext) => self
                .result_dir
                .join(format!("{}.{}", name, ext.to_string_lossy())),
            None => self.result_dir.join(name),
        };
        fs::copy(path, &target)?;
        info!("{} imported as {}", path.display(), target.display());
        Ok(())
    }

    fn report(&mut self, report: Report) {
        match report.severity {
            Severity::Info => println!("{}", report),
            Severity::Warning | Severity::Error => eprintln!("{}", report),
        }
    }
}
