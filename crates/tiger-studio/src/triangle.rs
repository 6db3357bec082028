use anyhow::{Context, Result};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use tiger_engine::core::{App, AppControl, FrameCtx, InitCtx};
use tiger_engine::device::GpuApi;
use tiger_engine::geometry::{upload_static_geometry, VertexBuffer};
use tiger_engine::shader::{build_program, LinkedProgram};

use crate::shaders::{FRAGMENT_SHADER_SOURCE, TRIANGLE_VERTICES, VERTEX_SHADER_SOURCE};

/// The studio application: one shader program, one static triangle buffer,
/// Escape to quit.
pub struct TriangleApp<G: GpuApi> {
    program: Option<LinkedProgram<G::Program>>,
    vertices: Option<VertexBuffer<G::Buffer>>,
    exit_requested: bool,
}

impl<G: GpuApi> TriangleApp<G> {
    pub fn new() -> Self {
        Self {
            program: None,
            vertices: None,
            exit_requested: false,
        }
    }

    pub fn program(&self) -> Option<&LinkedProgram<G::Program>> {
        self.program.as_ref()
    }

    pub fn vertices(&self) -> Option<&VertexBuffer<G::Buffer>> {
        self.vertices.as_ref()
    }

    /// Input processing; only Escape does anything.
    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        if key == PhysicalKey::Code(KeyCode::Escape) && state == ElementState::Pressed {
            log::debug!("escape pressed");
            self.exit_requested = true;
        }
    }
}

impl<G: GpuApi> Default for TriangleApp<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GpuApi> App<G> for TriangleApp<G> {
    fn on_init(&mut self, ctx: &InitCtx<'_, G>) -> Result<()> {
        let program = build_program(
            ctx.gpu,
            VERTEX_SHADER_SOURCE,
            FRAGMENT_SHADER_SOURCE,
            ctx.init.shader_policy,
        )
        .context("failed to build triangle shader program")?;

        let vertices = upload_static_geometry(ctx.gpu, &TRIANGLE_VERTICES)
            .context("failed to upload triangle vertices")?;

        log::info!(
            "triangle ready: program {:?} (linked: {}), {} vertices in {:?}",
            program.handle(),
            program.is_linked(),
            vertices.vertex_count(),
            vertices.handle()
        );

        self.program = Some(program);
        self.vertices = Some(vertices);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            self.handle_key(event.physical_key, event.state);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, G>) -> AppControl {
        if self.exit_requested {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }

    fn on_exit(&mut self, gpu: &G) {
        if let Some(vertices) = self.vertices.take() {
            vertices.destroy(gpu);
        }
        if let Some(program) = self.program.take() {
            program.destroy(gpu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiger_engine::coords::{ColorRgba, Viewport};
    use tiger_engine::device::GlInit;
    use tiger_engine::render::FrameLoop;
    use tiger_engine::shader::ShaderPolicy;
    use tiger_engine::testing::{GpuCall, RecordingGpu};

    fn init(gpu: &RecordingGpu, app: &mut TriangleApp<RecordingGpu>, policy: ShaderPolicy) -> Result<()> {
        let init = GlInit {
            shader_policy: policy,
            ..GlInit::default()
        };
        app.on_init(&InitCtx { gpu, init: &init })
    }

    #[test]
    fn init_builds_program_and_uploads_triangle() {
        let gpu = RecordingGpu::new();
        let mut app = TriangleApp::<RecordingGpu>::new();
        init(&gpu, &mut app, ShaderPolicy::LogAndContinue).unwrap();

        assert!(app.program().unwrap().is_linked());
        let vb = app.vertices().unwrap();
        assert_eq!(vb.byte_len(), 9 * size_of::<f32>());

        let back = vb.read_back(&gpu);
        assert_eq!(back.as_slice(), bytemuck::cast_slice::<f32, u8>(&TRIANGLE_VERTICES));

        // Stage objects are gone once the program is linked.
        assert_eq!(gpu.live_shader_count(), 0);
    }

    #[test]
    fn broken_shader_is_tolerated_by_default() {
        let gpu = RecordingGpu::new().fail_compile_containing("FragColor", "syntax error");
        let mut app = TriangleApp::<RecordingGpu>::new();
        init(&gpu, &mut app, ShaderPolicy::LogAndContinue).unwrap();
        assert!(app.program().is_some());
        assert!(app.vertices().is_some());
    }

    #[test]
    fn broken_shader_is_fatal_under_abort_policy() {
        let gpu = RecordingGpu::new().fail_compile_containing("FragColor", "syntax error");
        let mut app = TriangleApp::<RecordingGpu>::new();
        assert!(init(&gpu, &mut app, ShaderPolicy::Abort).is_err());
        assert!(app.program().is_none());
        assert_eq!(gpu.live_buffer_count(), 0);
    }

    #[test]
    fn escape_ends_loop_after_current_frame() {
        let gpu = RecordingGpu::new();
        let mut app = TriangleApp::<RecordingGpu>::new();
        let mut fl = FrameLoop::new(ColorRgba::slate());
        let vp = Viewport::new(800, 600);

        fl.run_frame(&mut app, &gpu, &gpu, vp).unwrap();
        app.handle_key(PhysicalKey::Code(KeyCode::Escape), ElementState::Pressed);
        let control = fl.run_frame(&mut app, &gpu, &gpu, vp).unwrap();

        assert_eq!(control, AppControl::Exit);
        assert_eq!(gpu.present_count(), 2);
    }

    #[test]
    fn other_keys_and_releases_are_ignored() {
        let mut app = TriangleApp::<RecordingGpu>::new();
        app.handle_key(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed);
        app.handle_key(PhysicalKey::Code(KeyCode::Escape), ElementState::Released);
        assert!(!app.exit_requested);
    }

    #[test]
    fn exit_releases_program_and_buffer() {
        let gpu = RecordingGpu::new();
        let mut app = TriangleApp::<RecordingGpu>::new();
        init(&gpu, &mut app, ShaderPolicy::LogAndContinue).unwrap();
        app.on_exit(&gpu);

        assert_eq!(gpu.live_program_count(), 0);
        assert_eq!(gpu.live_buffer_count(), 0);
        assert!(gpu.calls().iter().any(|c| matches!(c, GpuCall::DeleteBuffer(_))));
    }
}
