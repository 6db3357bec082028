use super::diagnostic::bounded_diagnostic;
use super::{ShaderError, ShaderPolicy, ShaderStage};
use crate::device::GpuApi;

/// A compiled (or failed-to-compile) shader stage.
///
/// Owns the GL shader object and deletes it on drop. Passing both stages to
/// [`link_program`] by value therefore releases them right after linking.
pub struct CompiledShader<'g, G: GpuApi> {
    gpu: &'g G,
    handle: G::Shader,
    stage: ShaderStage,
    diagnostic: Option<String>,
}

impl<'g, G: GpuApi> CompiledShader<'g, G> {
    #[inline]
    pub fn handle(&self) -> G::Shader {
        self.handle
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Bounded info log when compilation failed.
    #[inline]
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.diagnostic.is_none()
    }
}

impl<G: GpuApi> std::fmt::Debug for CompiledShader<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledShader")
            .field("handle", &self.handle)
            .field("stage", &self.stage)
            .field("diagnostic", &self.diagnostic)
            .finish()
    }
}

impl<G: GpuApi> Drop for CompiledShader<'_, G> {
    fn drop(&mut self) {
        self.gpu.drop_shader(self.handle);
    }
}

/// A linked (or failed-to-link) shader program.
///
/// Not deleted on drop; call [`LinkedProgram::destroy`] while the context is
/// still alive.
#[derive(Debug)]
pub struct LinkedProgram<P> {
    handle: P,
    diagnostic: Option<String>,
}

impl<P: Copy> LinkedProgram<P> {
    #[inline]
    pub fn handle(&self) -> P {
        self.handle
    }

    #[inline]
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.diagnostic.is_none()
    }

    pub fn destroy<G>(self, gpu: &G)
    where
        G: GpuApi<Program = P>,
    {
        gpu.drop_program(self.handle);
    }
}

/// Compiles `source` for `stage`.
///
/// A compile failure is logged and recorded as the returned shader's
/// diagnostic; the handle is still returned. Only failing to create the shader
/// object is an error.
pub fn compile_shader<'g, G: GpuApi>(
    gpu: &'g G,
    source: &str,
    stage: ShaderStage,
) -> Result<CompiledShader<'g, G>, ShaderError> {
    let handle = gpu.new_shader(stage).map_err(|reason| ShaderError::Create {
        object: "shader",
        reason,
    })?;

    let diagnostic = if gpu.compile_source(handle, source) {
        log::debug!("{stage} shader compiled ({handle:?})");
        None
    } else {
        let d = bounded_diagnostic(&gpu.shader_info_log(handle));
        log::error!("{stage} shader compilation unsuccessful:\n{d}");
        Some(d)
    };

    Ok(CompiledShader {
        gpu,
        handle,
        stage,
        diagnostic,
    })
}

/// Links a vertex and a fragment stage into a program.
///
/// A link failure is logged and recorded as the program's diagnostic. Both
/// stage objects are deleted before returning, whether linking succeeded or
/// not.
pub fn link_program<G: GpuApi>(
    gpu: &G,
    vertex: CompiledShader<'_, G>,
    fragment: CompiledShader<'_, G>,
) -> Result<LinkedProgram<G::Program>, ShaderError> {
    debug_assert_eq!(vertex.stage, ShaderStage::Vertex);
    debug_assert_eq!(fragment.stage, ShaderStage::Fragment);

    let handle = gpu.new_program().map_err(|reason| ShaderError::Create {
        object: "program",
        reason,
    })?;

    let linked = gpu.link_stages(handle, &[vertex.handle, fragment.handle]);
    drop(vertex);
    drop(fragment);

    let diagnostic = if linked {
        log::debug!("shader program linked ({handle:?})");
        None
    } else {
        let d = bounded_diagnostic(&gpu.program_info_log(handle));
        log::error!("shader program linking unsuccessful:\n{d}");
        Some(d)
    };

    Ok(LinkedProgram { handle, diagnostic })
}

/// Compiles both stages and links them, applying `policy` to diagnostics.
///
/// Under `ShaderPolicy::Abort` the first diagnostic becomes an error; stage
/// objects are released either way.
pub fn build_program<G: GpuApi>(
    gpu: &G,
    vertex_source: &str,
    fragment_source: &str,
    policy: ShaderPolicy,
) -> Result<LinkedProgram<G::Program>, ShaderError> {
    let vertex = compile_shader(gpu, vertex_source, ShaderStage::Vertex)?;
    let fragment = compile_shader(gpu, fragment_source, ShaderStage::Fragment)?;

    if policy == ShaderPolicy::Abort {
        for stage in [&vertex, &fragment] {
            if let Some(d) = stage.diagnostic() {
                return Err(ShaderError::Compile {
                    stage: stage.stage(),
                    diagnostic: d.to_string(),
                });
            }
        }
    }

    let program = link_program(gpu, vertex, fragment)?;

    if policy == ShaderPolicy::Abort {
        if let Some(d) = program.diagnostic() {
            let diagnostic = d.to_string();
            program.destroy(gpu);
            return Err(ShaderError::Link { diagnostic });
        }
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::MAX_DIAGNOSTIC_LEN;
    use crate::testing::{GpuCall, RecordingGpu};

    const GOOD_VS: &str = "#version 430 core\nvoid main() { gl_Position = vec4(0.0); }";
    const GOOD_FS: &str = "#version 430 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }";
    const BAD_FS: &str = "#version 430 core\nvoid main() { oops }";

    #[test]
    fn successful_compile_has_no_diagnostic() {
        let gpu = RecordingGpu::new();
        let vs = compile_shader(&gpu, GOOD_VS, ShaderStage::Vertex).unwrap();
        assert!(vs.is_compiled());
        assert_eq!(vs.stage(), ShaderStage::Vertex);
    }

    #[test]
    fn failed_compile_returns_handle_and_diagnostic() {
        let gpu = RecordingGpu::new().fail_compile_containing("oops", "0:2(15): error: syntax error");
        let fs = compile_shader(&gpu, BAD_FS, ShaderStage::Fragment).unwrap();
        assert!(!fs.is_compiled());
        assert_eq!(fs.diagnostic(), Some("0:2(15): error: syntax error"));
        assert!(gpu.shader_is_live(fs.handle()));
    }

    #[test]
    fn oversized_info_log_is_bounded() {
        let gpu = RecordingGpu::new().fail_compile_containing("oops", &"e".repeat(4096));
        let fs = compile_shader(&gpu, BAD_FS, ShaderStage::Fragment).unwrap();
        assert_eq!(fs.diagnostic().map(str::len), Some(MAX_DIAGNOSTIC_LEN));
    }

    #[test]
    fn shader_object_creation_failure_is_an_error() {
        let gpu = RecordingGpu::new().fail_object_creation();
        let err = compile_shader(&gpu, GOOD_VS, ShaderStage::Vertex).unwrap_err();
        assert!(matches!(err, ShaderError::Create { object: "shader", .. }));
    }

    #[test]
    fn link_of_good_stages_has_no_diagnostic_and_releases_stages() {
        let gpu = RecordingGpu::new();
        let vs = compile_shader(&gpu, GOOD_VS, ShaderStage::Vertex).unwrap();
        let fs = compile_shader(&gpu, GOOD_FS, ShaderStage::Fragment).unwrap();
        let (vh, fh) = (vs.handle(), fs.handle());

        let program = link_program(&gpu, vs, fs).unwrap();
        assert!(program.is_linked());
        assert!(!gpu.shader_is_live(vh));
        assert!(!gpu.shader_is_live(fh));

        let calls = gpu.calls();
        let link_at = calls
            .iter()
            .position(|c| matches!(c, GpuCall::LinkProgram(_)))
            .unwrap();
        let first_delete = calls
            .iter()
            .position(|c| matches!(c, GpuCall::DeleteShader(_)))
            .unwrap();
        assert!(link_at < first_delete);
    }

    #[test]
    fn failed_link_is_logged_not_fatal_and_still_releases_stages() {
        let gpu = RecordingGpu::new().fail_link("error: unresolved symbol");
        let vs = compile_shader(&gpu, GOOD_VS, ShaderStage::Vertex).unwrap();
        let fs = compile_shader(&gpu, GOOD_FS, ShaderStage::Fragment).unwrap();
        let (vh, fh) = (vs.handle(), fs.handle());

        let program = link_program(&gpu, vs, fs).unwrap();
        assert_eq!(program.diagnostic(), Some("error: unresolved symbol"));
        assert!(gpu.program_is_live(program.handle()));
        assert!(!gpu.shader_is_live(vh));
        assert!(!gpu.shader_is_live(fh));
    }

    #[test]
    fn log_and_continue_links_broken_stage() {
        let gpu = RecordingGpu::new().fail_compile_containing("oops", "bad");
        let program = build_program(&gpu, GOOD_VS, BAD_FS, ShaderPolicy::LogAndContinue).unwrap();
        assert!(gpu.program_is_live(program.handle()));
        assert_eq!(gpu.live_shader_count(), 0);
    }

    #[test]
    fn abort_policy_rejects_compile_failure_and_releases_stages() {
        let gpu = RecordingGpu::new().fail_compile_containing("oops", "bad");
        let err = build_program(&gpu, GOOD_VS, BAD_FS, ShaderPolicy::Abort).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile { stage: ShaderStage::Fragment, .. }
        ));
        assert_eq!(gpu.live_shader_count(), 0);
        assert!(!gpu.calls().iter().any(|c| matches!(c, GpuCall::CreateProgram(_))));
    }

    #[test]
    fn abort_policy_rejects_link_failure_and_deletes_program() {
        let gpu = RecordingGpu::new().fail_link("link error");
        let err = build_program(&gpu, GOOD_VS, GOOD_FS, ShaderPolicy::Abort).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert_eq!(gpu.live_program_count(), 0);
    }

    #[test]
    fn abort_policy_accepts_clean_build() {
        let gpu = RecordingGpu::new();
        let program = build_program(&gpu, GOOD_VS, GOOD_FS, ShaderPolicy::Abort).unwrap();
        assert!(program.is_linked());
        program.destroy(&gpu);
        assert_eq!(gpu.live_program_count(), 0);
    }
}
