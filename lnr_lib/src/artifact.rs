use std::{
    fs,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use lnr_data::ServerResponse;
use serde_json::Value;
use tar::Archive;
use tracing::{debug, info, instrument};

use crate::{
    error::{LnrError, Result},
    protocol::FarmClient,
    transport::Transport,
};

/// fetch the render data of a finished job and extract it into `folder`
/// responses with a negative code are handed back untouched, "file not ready" included
#[instrument(skip(client))]
pub fn retrieve<T: Transport>(
    client: &FarmClient<T>,
    handle: &str,
    folder: &Path,
) -> Result<ServerResponse> {
    let response = client.retrieve_raw(handle)?;
    if response.is_ok() {
        let payload = match &response.data {
            Some(Value::String(payload)) => payload,
            other => {
                return Err(LnrError::Payload(format!(
                    "expected hex encoded render data, got {:?}",
                    other
                )))
            }
        };
        unpack(payload, folder)?;
        info!("render data extracted to {}", folder.display());
    }
    Ok(response)
}

/// hex -> gzip -> tar, extracted fully into `folder`
/// whitespace between hex digits is ignored
pub fn unpack(payload: &str, folder: &Path) -> Result<()> {
    let digits: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let compressed = hex::decode(digits)?;
    let mut archive_bytes = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut archive_bytes)
        .map_err(LnrError::Decompress)?;
    debug!(
        "decompressed {} bytes into {} bytes",
        compressed.len(),
        archive_bytes.len()
    );
    Archive::new(Cursor::new(archive_bytes))
        .unpack(folder)
        .map_err(LnrError::Extract)
}

/// the greatest entry path in `dir`, frame files are numbered so that
/// the last one sorts last
pub fn latest_entry(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|_| LnrError::NoResult(dir.to_path_buf()))?;
    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden {
            continue;
        }
        if latest.as_ref().map(|l| path > *l).unwrap_or(true) {
            latest = Some(path);
        }
    }
    latest.ok_or_else(|| LnrError::NoResult(dir.to_path_buf()))
}


#[cfg(test)]
mod test {
    use std::fs;

    use serde_json::json;

    use super::{latest_entry, retrieve, testing::archive_payload, unpack};
    use crate::{
        error::LnrError,
        protocol::{testing::ScriptedTransport, Credentials, FarmClient},
    };

    #[test]
    fn test_unpack_and_pick_latest() {
        let dir = tempfile::tempdir().unwrap();
        let payload = archive_payload(&[
            ("job123/0001.png", &b"first"[..]),
            ("job123/0003.png", &b"third"[..]),
            ("job123/0002.png", &b"second"[..]),
        ]);
        unpack(&payload, dir.path()).unwrap();

        let latest = latest_entry(&dir.path().join("job123")).unwrap();
        assert_eq!(dir.path().join("job123").join("0003.png"), latest);
        assert_eq!(b"third".to_vec(), fs::read(latest).unwrap());
    }

    // long payloads may arrive wrapped or grouped
    #[test]
    fn test_unpack_ignores_whitespace_in_hex() {
        let dir = tempfile::tempdir().unwrap();
        let payload = archive_payload(&[("job7/0001.png", &b"frame"[..])]);
        let spaced = payload
            .as_bytes()
            .chunks(8)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join(" \n\t");
        unpack(&format!("  {}\r\n", spaced), dir.path()).unwrap();
        assert_eq!(
            b"frame".to_vec(),
            fs::read(dir.path().join("job7/0001.png")).unwrap()
        );
    }

    #[test]
    fn test_latest_skips_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0001.png"), b"").unwrap();
        fs::write(dir.path().join(".zzz"), b"").unwrap();
        assert_eq!(
            dir.path().join("0001.png"),
            latest_entry(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_latest_in_empty_or_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            latest_entry(dir.path()),
            Err(LnrError::NoResult(_))
        ));
        assert!(matches!(
            latest_entry(&dir.path().join("missing")),
            Err(LnrError::NoResult(_))
        ));
    }

    #[test]
    fn test_bad_payloads() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            unpack("not hex", dir.path()),
            Err(LnrError::Hex(_))
        ));
        assert!(matches!(
            unpack(&hex::encode(b"plain bytes"), dir.path()),
            Err(LnrError::Decompress(_))
        ));
    }

    #[test]
    fn test_retrieve_not_ready_leaves_folder_alone() {
        let dir = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        transport.reply(json!({"code": -14}));
        let client = FarmClient::new(&transport, Credentials::new("secret", "farm"));

        let res = retrieve(&client, "job123", dir.path()).unwrap();
        assert_eq!(-14, res.code);
        assert_eq!(0, fs::read_dir(dir.path()).unwrap().count());
    }

    #[test]
    fn test_retrieve_success_without_payload() {
        let dir = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        transport.reply(json!({"code": 0, "data": 12}));
        let client = FarmClient::new(&transport, Credentials::new("secret", "farm"));

        assert!(matches!(
            retrieve(&client, "job123", dir.path()),
            Err(LnrError::Payload(_))
        ));
    }

    #[test]
    fn test_retrieve_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        let payload = archive_payload(&[("job9/0001.exr", &b"pixels"[..])]);
        transport.reply(json!({"code": 0, "data": payload}));
        let client = FarmClient::new(&transport, Credentials::new("secret", "farm"));

        let res = retrieve(&client, "job9", dir.path()).unwrap();
        assert_eq!(0, res.code);
        assert!(dir.path().join("job9/0001.exr").is_file());
        assert_eq!("job9", transport.sent()[0].fields["data"]);
    }
}
