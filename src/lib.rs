use linkage::algorithms::layout::Chain;
use linkage::config::LayoutConfig;
use wasm_bindgen::prelude::*;
mod api;
mod console;
mod error;
mod interop;

pub use api::{init_logging, set_panic_hook};

#[wasm_bindgen]
pub struct Linkage {
    pub(crate) inner: linkage::Linkage,
    pub(crate) chain: Option<Chain>,
    pub(crate) layout: LayoutConfig,
}

impl Linkage {
    pub fn rs_new() -> Linkage {
        Linkage { inner: linkage::Linkage::new(), chain: None, layout: LayoutConfig::default() }
    }
    pub fn rs_geom_version(&self) -> u64 { self.inner.geom_version() }
}
