use std::path::Path;

use lnr_lib::{
    artifact, describe, status_line::status_line, FarmClient, FarmStatus, JobHandle, Transport,
};

/// one status request, rendered as a single line
pub fn status<T: Transport>(client: &FarmClient<T>) -> String {
    match client.status() {
        Ok(response) if response.is_ok() => {
            let status: FarmStatus = match response.data {
                Some(data) => match serde_json::from_value(data) {
                    Ok(status) => status,
                    Err(e) => return format!("unexpected status payload: {}", e),
                },
                None => FarmStatus::default(),
            };
            if !status.farm_running() {
                return "farm idle".to_string();
            }
            match status.first_node() {
                Some(node) => status_line(node, status.render_data.as_ref()),
                None => "farm running, no node reported yet".to_string(),
            }
        }
        Ok(response) => describe(response.code),
        Err(e) => format!("error executing request: {}", e),
    }
}

pub fn cancel<T: Transport>(client: &FarmClient<T>) -> String {
    match client.cancel() {
        Ok(response) if response.is_ok() => "cancel requested".to_string(),
        Ok(response) => describe(response.code),
        Err(e) => format!("error executing request: {}", e),
    }
}

/// fetch the render data of a finished job by hand
pub fn retrieve<T: Transport>(client: &FarmClient<T>, handle: &str, folder: &Path) -> String {
    let handle = match JobHandle::parse(handle) {
        Ok(handle) => handle,
        Err(e) => return e.to_string(),
    };
    match artifact::retrieve(client, handle.as_str(), folder) {
        Ok(response) if response.is_ok() => {
            match artifact::latest_entry(&folder.join(handle.as_str())) {
                Ok(latest) => format!("render data extracted, latest: {}", latest.display()),
                Err(e) => e.to_string(),
            }
        }
        Ok(response) => describe(response.code),
        Err(e) => format!("error retrieving render data: {}", e),
    }
}
