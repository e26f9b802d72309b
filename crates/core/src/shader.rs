//! Shader compilation and program linking over a [`GlBackend`].
//!
//! Programs here have a vertex and a fragment stage and optionally a geometry
//! stage (the layered cubemap pass routes primitives to cubemap layers from
//! its geometry shader). Stage handles are always released, whether linking
//! succeeds or not.

use thiserror::Error;

use crate::backend::{GlBackend, ShaderStage};
use crate::handle::{ProgramHandle, ShaderHandle};

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The shader stage that failed (e.g. "vertex", "geometry").
        stage: String,
        /// Numbered source followed by the driver's info log.
        log: String,
    },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

/// GLSL sources for one program.
#[derive(Debug, Clone, Copy)]
pub struct ProgramSources<'a> {
    pub vertex: &'a str,
    pub geometry: Option<&'a str>,
    pub fragment: &'a str,
}

/// Prepends right-aligned line numbers to `source` and appends the driver
/// `log`, so log line references can be matched against the GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` if the shader object cannot be created
/// or the GLSL source fails to compile.
pub fn compile_shader<B: GlBackend + ?Sized>(
    gl: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderHandle, ShaderError> {
    let shader = gl.create_shader(stage).map_err(|e| ShaderError::CompileError {
        stage: stage.name().to_string(),
        log: e,
    })?;

    gl.compile_shader_source(shader, source);

    if gl.shader_compile_status(shader) {
        Ok(shader)
    } else {
        let info_log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        Err(ShaderError::CompileError {
            stage: stage.name().to_string(),
            log: format_shader_error(source, &info_log),
        })
    }
}

/// Links compiled stages into a program.
///
/// Stages are detached after linking; the program keeps its own copies.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if linking fails.
pub fn link_program<B: GlBackend + ?Sized>(
    gl: &B,
    stages: &[ShaderHandle],
) -> Result<ProgramHandle, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::LinkError)?;

    for &shader in stages {
        gl.attach_shader(program, shader);
    }
    gl.link_program(program);
    for &shader in stages {
        gl.detach_shader(program, shader);
    }

    if gl.program_link_status(program) {
        Ok(program)
    } else {
        let info_log = gl.program_info_log(program);
        gl.delete_program(program);
        Err(ShaderError::LinkError(info_log))
    }
}

/// Compiles every stage in `sources` and links them into a program.
///
/// # Errors
///
/// Returns the first `CompileError`, or a `LinkError`.
pub fn compile_program<B: GlBackend + ?Sized>(
    gl: &B,
    sources: &ProgramSources<'_>,
) -> Result<ProgramHandle, ShaderError> {
    let mut stages = Vec::with_capacity(3);
    let mut wanted = vec![(ShaderStage::Vertex, sources.vertex)];
    if let Some(geometry) = sources.geometry {
        wanted.push((ShaderStage::Geometry, geometry));
    }
    wanted.push((ShaderStage::Fragment, sources.fragment));

    for (stage, source) in wanted {
        match compile_shader(gl, stage, source) {
            Ok(shader) => stages.push(shader),
            Err(e) => {
                for shader in stages {
                    gl.delete_shader(shader);
                }
                return Err(e);
            }
        }
    }

    let result = link_program(gl, &stages);

    for shader in stages {
        gl.delete_shader(shader);
    }

    result
}
