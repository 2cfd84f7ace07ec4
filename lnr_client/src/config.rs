use std::{path::PathBuf, time::Duration};

use lnr_lib::Credentials;

use crate::Opt;

/// settings resolved from the command line and environment, fixed for the run
#[derive(Debug, Clone)]
pub struct Config {
    pub server: String,
    pub credentials: Credentials,
    pub interval: Duration,
    pub timeout: Duration,
    pub max_status_errors: Option<u32>,
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn from_opt(opt: &Opt) -> anyhow::Result<Self> {
        if opt.password.is_empty() {
            anyhow::bail!("farm password must not be empty");
        }
        if opt.interval_ms == 0 {
            anyhow::bail!("poll interval must be at least one millisecond");
        }
        Ok(Self {
            server: opt.server.clone(),
            credentials: Credentials::new(&opt.password, &opt.command),
            interval: Duration::from_millis(opt.interval_ms),
            timeout: Duration::from_secs(opt.timeout_secs),
            max_status_errors: opt.max_status_errors,
            output: opt.output.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use structopt::StructOpt;

    use super::Config;
    use crate::Opt;

    #[test]
    fn test_defaults() {
        let opt = Opt::from_iter(&["lnr", "--password", "secret", "status"]);
        let config = Config::from_opt(&opt).unwrap();
        assert_eq!("https://0.0.0.0:3001/", config.server);
        assert_eq!("farm", config.credentials.command());
        assert_eq!(Duration::from_millis(300), config.interval);
        assert_eq!(None, config.max_status_errors);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let opt = Opt::from_iter(&[
            "lnr",
            "--password",
            "secret",
            "--interval-ms",
            "0",
            "status",
        ]);
        assert!(Config::from_opt(&opt).is_err());
    }
}
