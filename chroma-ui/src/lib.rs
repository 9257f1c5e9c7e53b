//! DOM bindings of the content script for WebAssembly: post handles, legend widget and its stylesheet.

pub mod styles;

#[cfg(target_arch = "wasm32")]
mod legend;
#[cfg(target_arch = "wasm32")]
mod post;

#[cfg(target_arch = "wasm32")]
pub use legend::DomLegendView;
#[cfg(target_arch = "wasm32")]
pub use post::{DomDocument, DomPost};
