//! Embedded GLSL sources and the static triangle.

/// Passes the position attribute through as clip-space coordinates.
pub const VERTEX_SHADER_SOURCE: &str = r#"#version 430 core
layout (location = 0) in vec3 aPos;
void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

/// Emits constant opaque orange.
pub const FRAGMENT_SHADER_SOURCE: &str = r#"#version 430 core
out vec4 FragColor;
void main()
{
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

/// Three `vec3` positions in NDC.
#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];
