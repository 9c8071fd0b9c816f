use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::controller::{RenderGraph, TransitionRequest};
use crate::engine::core::app_state::VisualizerInstance;
use crate::engine::phases::PhaseId;
use crate::engine::scene::host_now_ms;
use crate::engine::visualizer::PhaseVisualizer;
use crate::error::VisualizerError;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing notifications and responses, flushed to the parent window each frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge for iframe deployment.
///
/// Requests are dispatched by `handle_rpc_messages`, which the app schedules
/// alongside the other runtime systems once the visualizer exists.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(PreUpdate, process_incoming_messages)
            .add_systems(PostUpdate, send_outgoing_messages);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(err) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", err);
            return;
        }
    }

    // Ownership passes to JS; the listener lives as long as the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

pub fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut instance: ResMut<VisualizerInstance>,
    time: Res<Time<Real>>,
) {
    let now = host_now_ms(&time);

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut instance.0, now) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
            }
        }
    }
}

/// Dispatch one request against the visualizer. Notifications (no ID) are
/// executed but produce no response.
pub fn handle_rpc_request<G: RenderGraph>(
    request: &RpcRequest,
    visualizer: &mut PhaseVisualizer<G>,
    now: f64,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "go_to_phase" => handle_go_to_phase(&request.params, visualizer, now),
        "next_phase" => visualizer
            .next_phase(now)
            .map(|phase| serde_json::json!({ "requested": phase }))
            .map_err(RpcError::from),
        "previous_phase" => visualizer
            .previous_phase(now)
            .map(|phase| serde_json::json!({ "requested": phase }))
            .map_err(RpcError::from),
        "toggle_auto_transition" => Ok(serde_json::json!({
            "isAutoTransitioning": visualizer.toggle_auto_transition(now)
        })),
        "destroy" => {
            visualizer.destroy();
            Ok(serde_json::json!({ "success": true }))
        }
        "get_stats" => serde_json::to_value(visualizer.stats())
            .map_err(|err| RpcError::internal_error(&err.to_string())),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({"method": request.method})),
            })
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

/// Accepts `{"phase": "brain"}` or `{"index": 1}`.
fn handle_go_to_phase<G: RenderGraph>(
    params: &serde_json::Value,
    visualizer: &mut PhaseVisualizer<G>,
    now: f64,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct GoToPhaseParams {
        phase: Option<PhaseId>,
        index: Option<usize>,
    }

    let parsed = serde_json::from_value::<GoToPhaseParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'phase' or 'index' parameter"))?;

    let phase = match (parsed.phase, parsed.index) {
        (Some(phase), _) => phase,
        (None, Some(index)) => visualizer
            .phase_at(index)
            .ok_or_else(|| RpcError::invalid_params(&format!("No phase at index {index}")))?,
        (None, None) => {
            return Err(RpcError::invalid_params(
                "Expected 'phase' or 'index' parameter",
            ));
        }
    };

    let outcome = match visualizer.go_to_phase(phase, now)? {
        TransitionRequest::Ignored => "ignored",
        TransitionRequest::Started => "started",
        TransitionRequest::Queued => "queued",
        TransitionRequest::Activated => "activated",
    };

    Ok(serde_json::json!({
        "requested": phase,
        "outcome": outcome
    }))
}

fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

impl From<VisualizerError> for RpcError {
    fn from(err: VisualizerError) -> Self {
        match err {
            VisualizerError::Configuration(_) => Self::invalid_params(&err.to_string()),
            other => Self::internal_error(&other.to_string()),
        }
    }
}
