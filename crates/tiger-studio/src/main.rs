use tiger_engine::logging::{init_logging, LoggingConfig};
use tiger_engine::window::Runtime;

mod config;
mod shaders;
mod triangle;

use triangle::TriangleApp;

fn main() {
    init_logging(LoggingConfig::default());

    let result = Runtime::run(
        config::runtime_config(),
        config::gl_init(),
        TriangleApp::<glow::Context>::new(),
    );

    // The event loop, window and context are already released here.
    if let Err(e) = result {
        log::error!("ALERT : {e:#}");
        std::process::exit(-1);
    }
}
