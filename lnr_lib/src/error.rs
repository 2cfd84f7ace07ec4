use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LnrError>;

/// local failures, everything the farm itself reports travels as a response code
#[derive(Debug, Error)]
pub enum LnrError {
    #[error("malformed response from farm: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected payload: {0}")]
    Payload(String),

    #[error("render data is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("could not decompress render data: {0}")]
    Decompress(#[source] io::Error),

    #[error("could not extract render data: {0}")]
    Extract(#[source] io::Error),

    #[error("no render result found in {}", .0.display())]
    NoResult(PathBuf),

    #[error("Blend file has no root folder")]
    NoRootFolder,

    #[error("nothing to cancel while render data is being retrieved")]
    CancelUnavailable,

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("host error: {0}")]
    Host(String),
}
