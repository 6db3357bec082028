//! In-memory `GpuApi` for tests.
//!
//! `RecordingGpu` hands out integer handles, keeps buffer contents for
//! readback, and appends every call to a log so tests can assert ordering.
//! Failures are injected through the builder methods.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::coords::{ColorRgba, Viewport};
use crate::device::{GpuApi, Present};
use crate::shader::ShaderStage;

#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateShader(u32, ShaderStage),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    BufferData { buffer: u32, len: usize },
    DeleteBuffer(u32),
    Clear(ColorRgba),
    Viewport(Viewport),
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingGpu {
    next_handle: Cell<u32>,
    calls: RefCell<Vec<GpuCall>>,
    live_shaders: RefCell<HashSet<u32>>,
    live_programs: RefCell<HashSet<u32>>,
    buffers: RefCell<HashMap<u32, Vec<u8>>>,
    shader_logs: RefCell<HashMap<u32, String>>,

    compile_failure: Option<(String, String)>,
    link_failure: Option<String>,
    fail_creation: bool,
    fail_present: bool,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources containing `needle` fail to compile with `info_log`.
    pub fn fail_compile_containing(mut self, needle: &str, info_log: &str) -> Self {
        self.compile_failure = Some((needle.to_string(), info_log.to_string()));
        self
    }

    pub fn fail_link(mut self, info_log: &str) -> Self {
        self.link_failure = Some(info_log.to_string());
        self
    }

    /// Shader, program and buffer creation all fail.
    pub fn fail_object_creation(mut self) -> Self {
        self.fail_creation = true;
        self
    }

    pub fn fail_present(mut self) -> Self {
        self.fail_present = true;
        self
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.calls.borrow().clone()
    }

    pub fn clears(&self) -> Vec<ColorRgba> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                GpuCall::Clear(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn present_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, GpuCall::Present))
            .count()
    }

    pub fn shader_is_live(&self, shader: u32) -> bool {
        self.live_shaders.borrow().contains(&shader)
    }

    pub fn program_is_live(&self, program: u32) -> bool {
        self.live_programs.borrow().contains(&program)
    }

    pub fn live_shader_count(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn live_program_count(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.borrow().len()
    }

    fn alloc(&self) -> Result<u32, String> {
        if self.fail_creation {
            return Err("out of handles".to_string());
        }
        let h = self.next_handle.get() + 1;
        self.next_handle.set(h);
        Ok(h)
    }

    fn record(&self, call: GpuCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl GpuApi for RecordingGpu {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;

    fn new_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let h = self.alloc()?;
        self.live_shaders.borrow_mut().insert(h);
        self.record(GpuCall::CreateShader(h, stage));
        Ok(h)
    }

    fn compile_source(&self, shader: u32, source: &str) -> bool {
        self.record(GpuCall::CompileShader(shader));
        match &self.compile_failure {
            Some((needle, log)) if source.contains(needle.as_str()) => {
                self.shader_logs.borrow_mut().insert(shader, log.clone());
                false
            }
            _ => true,
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.shader_logs
            .borrow()
            .get(&shader)
            .cloned()
            .unwrap_or_default()
    }

    fn drop_shader(&self, shader: u32) {
        self.live_shaders.borrow_mut().remove(&shader);
        self.record(GpuCall::DeleteShader(shader));
    }

    fn new_program(&self) -> Result<u32, String> {
        let h = self.alloc()?;
        self.live_programs.borrow_mut().insert(h);
        self.record(GpuCall::CreateProgram(h));
        Ok(h)
    }

    fn link_stages(&self, program: u32, stages: &[u32]) -> bool {
        debug_assert!(stages.iter().all(|s| self.shader_is_live(*s)));
        self.record(GpuCall::LinkProgram(program));
        self.link_failure.is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_failure.clone().unwrap_or_default()
    }

    fn drop_program(&self, program: u32) {
        self.live_programs.borrow_mut().remove(&program);
        self.record(GpuCall::DeleteProgram(program));
    }

    fn new_static_buffer(&self, data: &[u8]) -> Result<u32, String> {
        let h = self.alloc()?;
        self.buffers.borrow_mut().insert(h, data.to_vec());
        self.record(GpuCall::BufferData {
            buffer: h,
            len: data.len(),
        });
        Ok(h)
    }

    fn read_buffer_bytes(&self, buffer: u32, len: usize) -> Vec<u8> {
        let buffers = self.buffers.borrow();
        let data = buffers.get(&buffer).map(Vec::as_slice).unwrap_or_default();
        data[..len.min(data.len())].to_vec()
    }

    fn drop_buffer(&self, buffer: u32) {
        self.buffers.borrow_mut().remove(&buffer);
        self.record(GpuCall::DeleteBuffer(buffer));
    }

    fn clear_color_buffer(&self, color: ColorRgba) {
        self.record(GpuCall::Clear(color));
    }

    fn set_viewport(&self, viewport: Viewport) {
        self.record(GpuCall::Viewport(viewport));
    }
}

impl Present for RecordingGpu {
    fn present(&self) -> anyhow::Result<()> {
        self.record(GpuCall::Present);
        if self.fail_present {
            anyhow::bail!("swap failed");
        }
        Ok(())
    }
}
