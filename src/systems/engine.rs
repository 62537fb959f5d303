//! Engine lifecycle systems.
//!
//! - [`engine_loader_thread`] runs once on its own thread at startup. It
//!   indexes the map directory, checks that every file is a PNG and reports
//!   the result as an [`EngineMessage`].
//! - [`poll_engine_messages`] non-blockingly drains those messages each frame
//!   and moves the core's readiness gate to ready or failed.
//!
//! The loader never retries; a failed load stays failed for the session.

use crate::events::engine::EngineMessage;
use crate::resources::enginebridge::{AssetIndex, EngineBridge};
use crate::resources::gateway::RenderingGateway;
use crate::resources::mapcatalog::{AssetSource, DirectorySource};
use crate::resources::tacticalmap::TacticalMap;
use bevy_ecs::prelude::*;
use crossbeam_channel::Sender;
use log::{error, info, warn};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// First eight bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Entry point of the engine loader thread.
pub fn engine_loader_thread(source: DirectorySource, tx_msg: Sender<EngineMessage>) {
    info!(
        "[engine] loader starting (id={:?}) dir={:?}",
        std::thread::current().id(),
        source.dir()
    );
    let message = match load_engine_assets(&source) {
        Ok(index) => {
            info!("[engine] indexed {} map reference(s)", index.len());
            EngineMessage::Ready { index }
        }
        Err(error) => EngineMessage::Failed { error },
    };
    let _ = tx_msg.send(message);
}

/// Build the asset index, dropping files that are not PNG images.
pub fn load_engine_assets(source: &DirectorySource) -> Result<FxHashMap<String, PathBuf>, String> {
    let mut index = source
        .index()
        .map_err(|e| format!("cannot index map directory {:?}: {}", source.dir(), e))?;

    let mut rejected: Vec<PathBuf> = Vec::new();
    for path in index.values() {
        if rejected.contains(path) {
            continue;
        }
        if let Err(e) = check_png_signature(path) {
            warn!("[engine] skipping {:?}: {}", path, e);
            rejected.push(path.clone());
        }
    }
    index.retain(|_, path| !rejected.contains(path));
    Ok(index)
}

/// Verify that the file starts with the PNG signature.
pub fn check_png_signature(path: &Path) -> Result<(), String> {
    let mut header = [0u8; 8];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut header))
        .map_err(|e| format!("unreadable: {}", e))?;
    if header != PNG_SIGNATURE {
        return Err("not a PNG image".to_string());
    }
    Ok(())
}

/// Drain loader messages and update the core's readiness gate.
pub fn poll_engine_messages<S, G>(
    bridge: Res<EngineBridge>,
    mut map: ResMut<TacticalMap<S, G>>,
    mut index: ResMut<AssetIndex>,
) where
    S: AssetSource + Send + Sync + 'static,
    G: RenderingGateway + Send + Sync + 'static,
{
    for message in bridge.rx_msg.try_iter() {
        match message {
            EngineMessage::Ready { index: files } => {
                *index = AssetIndex::new(files);
                let flushed = map.engine_ready();
                info!(
                    "Rendering engine ready with {} map reference(s), {} call(s) flushed",
                    index.len(),
                    flushed
                );
            }
            EngineMessage::Failed { error } => {
                error!("Rendering engine failed to load: {}", error);
                map.engine_failed(error);
            }
        }
    }
}
