//! GLSL sources for the quad and layered cubemap programs.
//!
//! Both programs draw a single fullscreen triangle generated from
//! `gl_VertexID`, so no vertex buffer is needed: bind an empty VAO and draw
//! three vertices. A triangle avoids the diagonal seam of a two-triangle quad.
//! All sources target the 3.3 core profile, the lowest version with geometry
//! shaders that macOS and desktop Linux drivers both expose.

/// Fullscreen triangle vertex shader for the quad renderer.
pub const QUAD_VERTEX_SHADER: &str = r#"#version 330 core
out vec2 v_uv;
void main() {
    v_uv = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    gl_Position = vec4(v_uv * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Samples the cubemap along a view ray steered by the pointer.
///
/// `u_mouse` is in renderer-local pixels; its horizontal position maps to a
/// full turn of yaw and its vertical position to +-80 degrees of pitch.
pub const QUAD_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 frag_color;
uniform samplerCube u_cubemap;
uniform vec2 u_resolution;
uniform vec2 u_mouse;
void main() {
    vec2 m = u_mouse / max(u_resolution, vec2(1.0));
    float yaw = (m.x - 0.5) * 6.2831853;
    float pitch = (m.y - 0.5) * 2.7925268;
    float aspect = u_resolution.x / max(u_resolution.y, 1.0);
    vec2 ndc = v_uv * 2.0 - 1.0;
    vec3 ray = normalize(vec3(ndc.x * aspect, ndc.y, -1.0));
    float cp = cos(pitch), sp = sin(pitch);
    ray = vec3(ray.x, cp * ray.y - sp * ray.z, sp * ray.y + cp * ray.z);
    float cy = cos(yaw), sy = sin(yaw);
    ray = vec3(cy * ray.x + sy * ray.z, ray.y, -sy * ray.x + cy * ray.z);
    frag_color = texture(u_cubemap, ray);
}
"#;

/// Pass-through vertex shader for the layered pass; the geometry shader
/// fans each triangle out to the six layers.
pub const LAYERED_VERTEX_SHADER: &str = r#"#version 330 core
out vec2 v_ndc;
void main() {
    vec2 uv = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    v_ndc = uv * 2.0 - 1.0;
    gl_Position = vec4(v_ndc, 0.0, 1.0);
}
"#;

/// Emits the incoming triangle once per cubemap face with `gl_Layer` set to
/// the face index, unprojecting each corner into a world-space direction.
pub const LAYERED_GEOMETRY_SHADER: &str = r#"#version 330 core
layout(triangles) in;
layout(triangle_strip, max_vertices = 18) out;
in vec2 v_ndc[];
out vec3 g_dir;
flat out int g_face;
uniform mat4 u_inv_view_proj[6];
void main() {
    for (int face = 0; face < 6; ++face) {
        for (int i = 0; i < 3; ++i) {
            vec4 world = u_inv_view_proj[face] * vec4(v_ndc[i], 1.0, 1.0);
            g_dir = world.xyz / world.w;
            g_face = face;
            gl_Layer = face;
            gl_Position = gl_in[i].gl_Position;
            EmitVertex();
        }
        EndPrimitive();
    }
}
"#;

/// Procedural environment: axis-tinted sky with a latitude/longitude grid
/// that drifts with `u_time`, so every face is distinguishable on readback.
pub const LAYERED_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec3 g_dir;
flat in int g_face;
out vec4 frag_color;
uniform float u_time;
const vec3 FACE_TINT[6] = vec3[6](
    vec3(0.9, 0.2, 0.2), vec3(0.2, 0.9, 0.9),
    vec3(0.2, 0.9, 0.2), vec3(0.9, 0.2, 0.9),
    vec3(0.2, 0.2, 0.9), vec3(0.9, 0.9, 0.2)
);
void main() {
    vec3 d = normalize(g_dir);
    float lon = atan(d.z, d.x) + u_time * 0.1;
    float lat = asin(clamp(d.y, -1.0, 1.0));
    vec2 grid = abs(fract(vec2(lon, lat) * 6.0 / 3.1415927) - 0.5);
    float line = 1.0 - smoothstep(0.0, 0.04, min(grid.x, grid.y));
    vec3 sky = mix(FACE_TINT[g_face] * 0.6, vec3(0.05), 0.5 - 0.5 * d.y);
    frag_color = vec4(mix(sky, vec3(1.0), line * 0.8), 1.0);
}
"#;
