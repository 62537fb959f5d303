//! Rendering gateway contract and the engine readiness gate.
//!
//! The viewer core never draws anything itself. It issues fire-and-forget
//! calls through a [`RenderingGateway`]; the engine behind it decides how to
//! decode assets and paint pixels.
//!
//! The engine becomes usable asynchronously, so calls are routed through an
//! [`EngineGate`] which tracks the [`EngineLifecycle`]:
//! - before readiness, calls are queued in issue order
//! - on readiness, the queue is flushed to the engine
//! - after a failed load, calls are rejected and logged

use log::{debug, info, warn};
use thiserror::Error;

/// One marker draw request, with its color already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub color: String,
    /// View direction in degrees, clockwise from the +x axis.
    pub rotation: Option<f32>,
    /// Scoped players get a longer view line.
    pub scoped: bool,
    /// The player was reported dead in this frame.
    pub dead: bool,
}

impl DrawRequest {
    pub fn new(id: u32, x: f32, y: f32, color: impl Into<String>) -> Self {
        Self {
            id,
            x,
            y,
            color: color.into(),
            rotation: None,
            scoped: false,
            dead: false,
        }
    }
}

/// Operations the rendering engine exposes to the core.
///
/// All calls are fire-and-forget: the core observes no result.
pub trait RenderingGateway {
    /// Load the initial background map.
    fn load_map(&mut self, url: &str);
    /// Replace the current background map.
    fn change_map(&mut self, url: &str);
    /// Remove the markers drawn so far. The draws that follow form the new
    /// visible set.
    fn clear_markers(&mut self);
    /// Draw one player marker on top of the current map.
    fn draw_marker(&mut self, request: DrawRequest);
    /// Whether calls issued now can still reach the engine.
    fn is_accepting(&self) -> bool {
        true
    }
}

/// A gateway call captured as data, so it can be queued or recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    LoadMap(String),
    ChangeMap(String),
    ClearMarkers,
    DrawMarker(DrawRequest),
}

impl GatewayCall {
    /// Forward this call to a gateway.
    pub fn apply(self, gateway: &mut impl RenderingGateway) {
        match self {
            GatewayCall::LoadMap(url) => gateway.load_map(&url),
            GatewayCall::ChangeMap(url) => gateway.change_map(&url),
            GatewayCall::ClearMarkers => gateway.clear_markers(),
            GatewayCall::DrawMarker(request) => gateway.draw_marker(request),
        }
    }
}

/// Gateway that only records the calls it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingGateway {
    pub calls: Vec<GatewayCall>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of map load/change calls recorded.
    pub fn map_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GatewayCall::LoadMap(_) | GatewayCall::ChangeMap(_)))
            .count()
    }

    /// Draw requests recorded, in issue order.
    pub fn draws(&self) -> Vec<&DrawRequest> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GatewayCall::DrawMarker(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Draw requests issued since the last marker clear.
    pub fn visible_draws(&self) -> Vec<&DrawRequest> {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, GatewayCall::ClearMarkers))
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|c| match c {
                GatewayCall::DrawMarker(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

impl RenderingGateway for RecordingGateway {
    fn load_map(&mut self, url: &str) {
        self.calls.push(GatewayCall::LoadMap(url.to_string()));
    }

    fn change_map(&mut self, url: &str) {
        self.calls.push(GatewayCall::ChangeMap(url.to_string()));
    }

    fn clear_markers(&mut self) {
        self.calls.push(GatewayCall::ClearMarkers);
    }

    fn draw_marker(&mut self, request: DrawRequest) {
        self.calls.push(GatewayCall::DrawMarker(request));
    }
}

/// Readiness of the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EngineLifecycle {
    #[default]
    NotReady,
    Ready,
    Failed(String),
}

/// Call rejected by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("rendering engine failed to load: {0}")]
    Failed(String),
}

/// What the gate did with an accepted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Forwarded to the engine immediately.
    Sent,
    /// Held until the engine becomes ready.
    Queued,
}

/// Lifecycle gate in front of a rendering engine.
///
/// Every gateway-calling operation of the core goes through the gate. The gate
/// implements [`RenderingGateway`] itself, logging rejected calls, so the
/// controllers stay unaware of readiness.
#[derive(Debug)]
pub struct EngineGate<G> {
    inner: G,
    lifecycle: EngineLifecycle,
    pending: Vec<GatewayCall>,
}

impl<G: RenderingGateway> EngineGate<G> {
    /// Wrap an engine that is not ready yet.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            lifecycle: EngineLifecycle::NotReady,
            pending: Vec::new(),
        }
    }

    /// Wrap an engine that is already usable.
    pub fn ready(inner: G) -> Self {
        Self {
            inner,
            lifecycle: EngineLifecycle::Ready,
            pending: Vec::new(),
        }
    }

    pub fn lifecycle(&self) -> &EngineLifecycle {
        &self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == EngineLifecycle::Ready
    }

    /// Calls waiting for readiness, oldest first.
    pub fn pending(&self) -> &[GatewayCall] {
        &self.pending
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Route one call according to the lifecycle.
    pub fn dispatch(&mut self, call: GatewayCall) -> Result<Dispatch, EngineError> {
        match &self.lifecycle {
            EngineLifecycle::Ready => {
                call.apply(&mut self.inner);
                Ok(Dispatch::Sent)
            }
            EngineLifecycle::NotReady => {
                debug!("engine not ready, queueing {:?}", call);
                self.pending.push(call);
                Ok(Dispatch::Queued)
            }
            EngineLifecycle::Failed(reason) => Err(EngineError::Failed(reason.clone())),
        }
    }

    /// Mark the engine ready and flush queued calls in order.
    ///
    /// Returns the number of calls flushed. Calling it again is a no-op.
    pub fn mark_ready(&mut self) -> usize {
        match self.lifecycle {
            EngineLifecycle::Ready => return 0,
            EngineLifecycle::Failed(_) => {
                warn!("engine reported ready after a failed load, accepting it");
            }
            EngineLifecycle::NotReady => {}
        }
        self.lifecycle = EngineLifecycle::Ready;
        let pending = std::mem::take(&mut self.pending);
        let flushed = pending.len();
        for call in pending {
            call.apply(&mut self.inner);
        }
        info!("rendering engine ready, flushed {} queued call(s)", flushed);
        flushed
    }

    /// Mark the engine failed. Queued calls are dropped.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if !self.pending.is_empty() {
            warn!(
                "dropping {} queued call(s), engine failed: {}",
                self.pending.len(),
                reason
            );
            self.pending.clear();
        }
        self.lifecycle = EngineLifecycle::Failed(reason);
    }

    fn forward(&mut self, call: GatewayCall) {
        if let Err(e) = self.dispatch(call) {
            warn!("gateway call rejected: {}", e);
        }
    }
}

impl<G: RenderingGateway> RenderingGateway for EngineGate<G> {
    fn load_map(&mut self, url: &str) {
        self.forward(GatewayCall::LoadMap(url.to_string()));
    }

    fn change_map(&mut self, url: &str) {
        self.forward(GatewayCall::ChangeMap(url.to_string()));
    }

    fn clear_markers(&mut self) {
        self.forward(GatewayCall::ClearMarkers);
    }

    fn draw_marker(&mut self, request: DrawRequest) {
        self.forward(GatewayCall::DrawMarker(request));
    }

    fn is_accepting(&self) -> bool {
        !matches!(self.lifecycle, EngineLifecycle::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: u32) -> DrawRequest {
        DrawRequest::new(id, 1.0, 2.0, "red")
    }

    #[test]
    fn calls_before_ready_are_queued() {
        let mut gate = EngineGate::new(RecordingGateway::new());
        assert_eq!(
            gate.dispatch(GatewayCall::LoadMap("./maps/a.png".into())),
            Ok(Dispatch::Queued)
        );
        gate.draw_marker(marker(1));
        assert_eq!(gate.pending().len(), 2);
        assert!(gate.inner().calls.is_empty());
    }

    #[test]
    fn mark_ready_flushes_in_issue_order() {
        let mut gate = EngineGate::new(RecordingGateway::new());
        gate.load_map("./maps/a.png");
        gate.draw_marker(marker(1));
        gate.draw_marker(marker(2));

        assert_eq!(gate.mark_ready(), 3);
        assert!(gate.pending().is_empty());
        assert_eq!(
            gate.inner().calls,
            vec![
                GatewayCall::LoadMap("./maps/a.png".into()),
                GatewayCall::DrawMarker(marker(1)),
                GatewayCall::DrawMarker(marker(2)),
            ]
        );
        assert_eq!(gate.mark_ready(), 0);
    }

    #[test]
    fn ready_gate_forwards_immediately() {
        let mut gate = EngineGate::ready(RecordingGateway::new());
        assert_eq!(
            gate.dispatch(GatewayCall::ChangeMap("./maps/b.png".into())),
            Ok(Dispatch::Sent)
        );
        assert_eq!(gate.inner().map_calls(), 1);
    }

    #[test]
    fn failed_gate_rejects_and_drops_queue() {
        let mut gate = EngineGate::new(RecordingGateway::new());
        gate.load_map("./maps/a.png");
        gate.mark_failed("no assets");

        assert!(gate.pending().is_empty());
        assert_eq!(
            gate.dispatch(GatewayCall::DrawMarker(marker(1))),
            Err(EngineError::Failed("no assets".into()))
        );
        // The trait path swallows the rejection.
        gate.change_map("./maps/b.png");
        assert!(gate.inner().calls.is_empty());
        assert!(!gate.is_accepting());
        assert_eq!(
            gate.lifecycle(),
            &EngineLifecycle::Failed("no assets".into())
        );
    }

    #[test]
    fn waiting_gate_still_accepts_calls() {
        let mut gate = EngineGate::new(RecordingGateway::new());
        assert!(gate.is_accepting());
        gate.mark_ready();
        assert!(gate.is_accepting());
    }

    #[test]
    fn visible_draws_start_after_last_clear() {
        let mut gateway = RecordingGateway::new();
        gateway.clear_markers();
        gateway.draw_marker(marker(1));
        gateway.clear_markers();
        gateway.draw_marker(marker(2));
        assert_eq!(gateway.draws().len(), 2);
        let visible: Vec<u32> = gateway.visible_draws().iter().map(|d| d.id).collect();
        assert_eq!(visible, vec![2]);
    }
}
