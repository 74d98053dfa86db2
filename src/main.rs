mod components;
mod config;
mod error;
mod geo;
mod input;
mod loader;
mod model;
mod render;
mod state;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
