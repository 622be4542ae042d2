// ============================================================================
// obfuscator-core/src/external/obs.rs
// ============================================================================
//
// OBS WEBSOCKET: obs-websocket 4.x Scene Control
//
// Requests are JSON text messages carrying a `request-type` and a
// `message-id`. The response echoes the `message-id` and has a `status` of
// "ok" or "error". OBS also pushes event messages (with an `update-type`)
// on the same connection; those are skipped while waiting for a response.
//
// Only the two requests the obfuscator needs are implemented:
// GetSceneList and SetCurrentScene.

// ---- Internal crate imports ----
use super::SceneSwitcher;
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use log::{debug, trace};
use serde::Deserialize;
use serde_json::{json, Value};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

// ---- Standard library imports ----
use std::io::{Read, Write};
use std::net::TcpStream;

#[derive(Debug, Deserialize)]
struct SceneListResponse {
    scenes: Vec<SceneEntry>,
}

#[derive(Debug, Deserialize)]
struct SceneEntry {
    name: String,
}

/// Synchronous obs-websocket 4.x client.
pub struct ObsWebsocket<S = MaybeTlsStream<TcpStream>>
where
    S: Read + Write,
{
    socket: WebSocket<S>,
    next_message_id: u64,
}

impl ObsWebsocket {
    /// Connects to `url`, e.g. `ws://localhost:4444`.
    pub fn connect(url: &str) -> CoreResult<Self> {
        let (socket, _response) = tungstenite::connect(url).map_err(|e| {
            CoreError::PresentationService(format!("Failed to connect to OBS at {}: {}", url, e))
        })?;
        debug!("Connected to OBS websocket at {}", url);
        Ok(Self::from_socket(socket))
    }
}

impl<S: Read + Write> ObsWebsocket<S> {
    /// Wraps an already established websocket.
    pub fn from_socket(socket: WebSocket<S>) -> Self {
        Self {
            socket,
            next_message_id: 1,
        }
    }

    /// Sends a request and waits for the response with the same `message-id`.
    fn call(&mut self, request_type: &str, mut fields: Value) -> CoreResult<Value> {
        let message_id = self.next_message_id.to_string();
        self.next_message_id += 1;

        if let Value::Object(map) = &mut fields {
            map.insert("request-type".to_string(), json!(request_type));
            map.insert("message-id".to_string(), json!(message_id));
        }
        trace!("OBS request: {}", fields);
        self.socket.send(Message::Text(fields.to_string()))?;

        loop {
            let text = match self.socket.read()? {
                Message::Text(text) => text,
                Message::Close(_) => {
                    return Err(CoreError::PresentationService(
                        "OBS closed the connection".to_string(),
                    ))
                }
                _ => continue,
            };

            let response: Value = serde_json::from_str(&text)?;
            if response.get("update-type").is_some() {
                trace!("Skipping OBS event: {}", text);
                continue;
            }
            if response.get("message-id").and_then(Value::as_str) != Some(message_id.as_str()) {
                trace!("Skipping unrelated OBS message: {}", text);
                continue;
            }

            return match response.get("status").and_then(Value::as_str) {
                Some("ok") => Ok(response),
                _ => {
                    let reason = response
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error");
                    Err(CoreError::PresentationService(format!(
                        "{} failed: {}",
                        request_type, reason
                    )))
                }
            };
        }
    }
}

impl<S: Read + Write> SceneSwitcher for ObsWebsocket<S> {
    fn list_scenes(&mut self) -> CoreResult<Vec<String>> {
        let response = self.call("GetSceneList", json!({}))?;
        let list: SceneListResponse = serde_json::from_value(response)?;
        Ok(list.scenes.into_iter().map(|s| s.name).collect())
    }

    fn set_current_scene(&mut self, name: &str) -> CoreResult<()> {
        self.call("SetCurrentScene", json!({ "scene-name": name }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Starts a one-connection fake OBS that answers with `respond` and
    /// returns the requests it saw once the client disconnects.
    fn fake_obs<F>(respond: F) -> (String, thread::JoinHandle<Vec<Value>>)
    where
        F: Fn(&Value) -> Vec<Value> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            let mut seen = Vec::new();
            while let Ok(msg) = ws.read() {
                let Message::Text(text) = msg else { continue };
                let request: Value = serde_json::from_str(&text).unwrap();
                for reply in respond(&request) {
                    ws.send(Message::Text(reply.to_string())).unwrap();
                }
                seen.push(request);
            }
            seen
        });
        (url, handle)
    }

    #[test]
    fn test_list_and_switch_scenes() {
        let (url, server) = fake_obs(|req| {
            let id = req["message-id"].clone();
            match req["request-type"].as_str() {
                Some("GetSceneList") => vec![
                    json!({ "update-type": "StreamStatus", "streaming": true }),
                    json!({
                        "message-id": id,
                        "status": "ok",
                        "current-scene": "Live Gaming",
                        "scenes": [{ "name": "Live Gaming", "sources": [] },
                                   { "name": "Live Gaming (Map Covered)", "sources": [] }]
                    }),
                ],
                _ => vec![json!({ "message-id": id, "status": "ok" })],
            }
        });

        let mut obs = ObsWebsocket::connect(&url).unwrap();
        assert_eq!(
            obs.list_scenes().unwrap(),
            vec!["Live Gaming".to_string(), "Live Gaming (Map Covered)".to_string()]
        );
        obs.set_current_scene("Live Gaming (Map Covered)").unwrap();
        drop(obs);

        let seen = server.join().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1]["request-type"], "SetCurrentScene");
        assert_eq!(seen[1]["scene-name"], "Live Gaming (Map Covered)");
        assert_ne!(seen[0]["message-id"], seen[1]["message-id"]);
    }

    #[test]
    fn test_error_status_is_presentation_error() {
        let (url, server) = fake_obs(|req| {
            vec![json!({
                "message-id": req["message-id"].clone(),
                "status": "error",
                "error": "requested scene does not exist"
            })]
        });

        let mut obs = ObsWebsocket::connect(&url).unwrap();
        match obs.set_current_scene("Missing") {
            Err(CoreError::PresentationService(msg)) => assert!(msg.contains("does not exist")),
            other => panic!("expected presentation service error, got {:?}", other),
        }
        drop(obs);
        server.join().unwrap();
    }

    #[test]
    fn test_connect_failure_is_presentation_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        drop(listener);

        assert!(matches!(
            ObsWebsocket::connect(&url),
            Err(CoreError::PresentationService(_))
        ));
    }
}
