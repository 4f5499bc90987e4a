use anyhow::Context;
use clap::Parser;
use winit::event_loop::EventLoop;

use image_renderer::app::App;
use image_renderer::cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Cli::parse()
        .into_config()
        .context("failed to load configuration")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    println!("Image Renderer - Escape to quit");
    event_loop.run_app(&mut app)?;

    if let Some(error) = app.take_failure() {
        return Err(error).context("renderer stopped");
    }
    Ok(())
}
