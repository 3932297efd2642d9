//! Spinning square: geometry is uploaded once and every frame only a 3x3 world
//! matrix is sent to the vertex shader, which does the per-vertex transform.

mod assets;
mod config;
mod scene;

use anyhow::Result;
use spinquad_engine::core::{App, AppControl, FrameCtx};
use spinquad_engine::device::GpuInit;
use spinquad_engine::logging::{init_logging, LoggingConfig};
use spinquad_engine::render::RenderCtx;
use spinquad_engine::window::{Runtime, RuntimeConfig};

use crate::config::DemoConfig;
use crate::scene::Scene;

/// Application context: configuration plus everything built at startup.
struct SpinQuad {
    config: DemoConfig,
    scene: Option<Scene>,
}

impl App for SpinQuad {
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let scene = Scene::build(ctx, &self.config);
        if !scene.has_program() {
            log::warn!("no shader program: frames will only be cleared");
        }
        self.scene = Some(scene);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        scene.advance(ctx.time.dt);

        let result = ctx.render(self.config.clear_color, |rctx, target| {
            scene.draw(rctx, target);
        });

        match result {
            Ok(()) => AppControl::Continue,
            Err(action) => {
                log::error!("unrecoverable surface error ({action:?})");
                AppControl::Exit
            }
        }
    }

    fn on_exit(&mut self) {
        if let Some(scene) = self.scene.take() {
            log::info!("rotated {:.2} rad in total", scene.release());
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::default();
    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: config.window_size,
        // Rotation follows wall-clock time, even across stalls.
        clamp_frame_time: false,
    };

    Runtime::run(
        runtime,
        GpuInit::default(),
        SpinQuad {
            config,
            scene: None,
        },
    )
}
