// Page behaviour compiles for both targets so it can be tested on the host;
// only the wasm build wires it to a browser.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod confetti;
mod form;
mod menu;
mod notify;
mod page;
mod reveal;
mod scheduler;
mod scroll_sync;
mod smooth_scroll;
mod submission;
mod telemetry;
mod validation;

#[cfg(test)]
mod testing;

#[cfg(not(target_arch = "wasm32"))]
mod backend;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    backend::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
