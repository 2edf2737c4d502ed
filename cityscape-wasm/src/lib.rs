use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logging;

pub use api::*;
pub use logging::init_logging;

/// Snap state for one editor session. The editor owns it and hands it to every
/// pointer-move query; nothing is global.
#[wasm_bindgen]
pub struct SnapSession {
    pub(crate) inner: cityscape::SnapEngine,
}

impl SnapSession {
    pub fn rs_new(config: cityscape::SnapConfig, cell_size: f64) -> SnapSession {
        SnapSession { inner: cityscape::SnapEngine::with_cell_size(config, cell_size) }
    }
    pub fn rs_segment_count(&self) -> usize {
        self.inner.index().len()
    }
}
