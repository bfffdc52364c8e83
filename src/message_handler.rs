//! Request dispatch for the TabStash message protocol.
//!
//! Extracted from the bridge binary so it can be unit-tested
//! independently. Requests arrive already validated into the closed
//! [`Request`] set; `handle_request` dispatches them against the [`App`].
//! A success response to `saveFile` is only the acknowledgment; the final
//! path arrives later as a `saveFileComplete` event on the app's event
//! stream.

use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::app::App;
use crate::services::persistence_gateway;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::message::{Request, Response};
use crate::types::write::WriteRequest;

/// Dispatches one request to the appropriate handler.
pub fn handle_request(app: &Mutex<App>, request: Request) -> Response {
    match request {
        Request::SaveFile {
            group_name,
            content,
            folder_location,
        } => {
            let a = match app.lock() {
                Ok(a) => a,
                Err(e) => return Response::failure(&e),
            };
            let mut write = WriteRequest::group(&group_name, content.into_bytes());
            if let Some(folder) = folder_location {
                write = write.with_destination(&folder);
            }
            match a.gateway.request_write(write, &a.write_config()) {
                Ok(_ticket) => Response::ok(),
                Err(e) => Response::failure(&e),
            }
        }

        Request::VerifyFolder { path } => match persistence_gateway::verify_folder(&path) {
            Ok(()) => Response::ok(),
            Err(e) => Response::failure(&e),
        },

        Request::SetSaveDirectory { path } => {
            let mut a = match app.lock() {
                Ok(a) => a,
                Err(e) => return Response::failure(&e),
            };
            match a
                .settings_engine
                .set_value("storage.save_directory", serde_json::json!(path))
            {
                Ok(()) => Response::ok(),
                Err(e) => Response::failure(&e),
            }
        }

        Request::GetSaveDirectory => {
            let a = match app.lock() {
                Ok(a) => a,
                Err(e) => return Response::failure(&e),
            };
            Response::ok_with_path(a.settings_engine.save_directory().map(String::from))
        }

        Request::ImportGroups {
            filename,
            content_base64,
        } => {
            let bytes = match BASE64.decode(content_base64.as_bytes()) {
                Ok(bytes) => bytes,
                Err(e) => return Response::failure(&e),
            };
            let a = match app.lock() {
                Ok(a) => a,
                Err(e) => return Response::failure(&e),
            };
            match a.import_file(&filename, &bytes) {
                Ok(_outcome) => Response::ok(),
                Err(e) => Response::failure(e.as_ref()),
            }
        }
    }
}
