use anyhow::{anyhow, Result};

use crate::device::GpuApi;

/// Components per vertex in the single position stream (`vec3`).
pub const POSITION_COMPONENTS: usize = 3;

/// A GPU-resident copy of a fixed float array, uploaded once.
///
/// Invariant: `byte_len == float_count * size_of::<f32>()` of the uploaded
/// slice. The buffer is never resized or rewritten.
#[derive(Debug)]
pub struct VertexBuffer<B> {
    handle: B,
    byte_len: usize,
    vertex_count: usize,
}

impl<B: Copy> VertexBuffer<B> {
    #[inline]
    pub fn handle(&self) -> B {
        self.handle
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Reads the buffer contents back from the GPU.
    pub fn read_back<G>(&self, gpu: &G) -> Vec<u8>
    where
        G: GpuApi<Buffer = B>,
    {
        gpu.read_buffer_bytes(self.handle, self.byte_len)
    }

    pub fn destroy<G>(self, gpu: &G)
    where
        G: GpuApi<Buffer = B>,
    {
        gpu.drop_buffer(self.handle);
    }
}

/// Allocates one buffer sized to `vertices` and uploads it with a static
/// usage hint.
///
/// `vertices` is a flat list of `vec3` positions.
pub fn upload_static_geometry<G: GpuApi>(
    gpu: &G,
    vertices: &[f32],
) -> Result<VertexBuffer<G::Buffer>> {
    anyhow::ensure!(!vertices.is_empty(), "refusing to upload empty geometry");
    anyhow::ensure!(
        vertices.len() % POSITION_COMPONENTS == 0,
        "vertex data length {} is not a multiple of {POSITION_COMPONENTS}",
        vertices.len()
    );

    let bytes: &[u8] = bytemuck::cast_slice(vertices);
    debug_assert_eq!(bytes.len(), std::mem::size_of_val(vertices));

    let handle = gpu
        .new_static_buffer(bytes)
        .map_err(|e| anyhow!("failed to create vertex buffer: {e}"))?;

    let vertex_count = vertices.len() / POSITION_COMPONENTS;
    log::debug!("uploaded {vertex_count} vertices ({} bytes) to {handle:?}", bytes.len());

    Ok(VertexBuffer {
        handle,
        byte_len: bytes.len(),
        vertex_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GpuCall, RecordingGpu};

    #[rustfmt::skip]
    const TRIANGLE: [f32; 9] = [
        -0.5, -0.5, 0.0,
         0.5, -0.5, 0.0,
         0.0,  0.5, 0.0,
    ];

    #[test]
    fn byte_len_matches_float_array() {
        let gpu = RecordingGpu::new();
        let vb = upload_static_geometry(&gpu, &TRIANGLE).unwrap();
        assert_eq!(vb.byte_len(), 9 * size_of::<f32>());
        assert_eq!(vb.byte_len(), size_of_val(&TRIANGLE));
        assert_eq!(vb.vertex_count(), 3);
    }

    #[test]
    fn uploaded_bytes_read_back_identical() {
        let gpu = RecordingGpu::new();
        let vb = upload_static_geometry(&gpu, &TRIANGLE).unwrap();

        let back = vb.read_back(&gpu);
        assert_eq!(back.as_slice(), bytemuck::cast_slice::<f32, u8>(&TRIANGLE));
    }

    #[test]
    fn uploads_exactly_once() {
        let gpu = RecordingGpu::new();
        let _vb = upload_static_geometry(&gpu, &TRIANGLE).unwrap();
        let uploads = gpu
            .calls()
            .iter()
            .filter(|c| matches!(c, GpuCall::BufferData { .. }))
            .count();
        assert_eq!(uploads, 1);
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        let gpu = RecordingGpu::new();
        assert!(upload_static_geometry(&gpu, &[]).is_err());
        assert!(upload_static_geometry(&gpu, &[0.0, 1.0]).is_err());
        assert!(gpu.calls().is_empty());
    }

    #[test]
    fn destroy_releases_buffer() {
        let gpu = RecordingGpu::new();
        let vb = upload_static_geometry(&gpu, &TRIANGLE).unwrap();
        let handle = vb.handle();
        vb.destroy(&gpu);
        assert!(gpu.calls().contains(&GpuCall::DeleteBuffer(handle)));
    }
}
