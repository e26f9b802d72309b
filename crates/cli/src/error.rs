//! Exit codes for the `cubemap` binary.
//!
//! - 0:  success
//! - 2:  bad arguments (reported by clap)
//! - 10: the faces in a directory differ in size, or a config asks for zero
//!       sizes
//! - 11: a face PNG is missing or unreadable, or the output cannot be written
//! - 12: `decode` got something that is not a code, or the config file is
//!       malformed
//! - 13: `--json` output could not be encoded

use cubemap_core::RenderError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Face set or dimension problem reported by the core crates.
    Render(RenderError),
    /// Path-qualified file error.
    Io(String),
    /// Unparseable code or rejected config.
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

/// File errors and config rejections get their own exit codes; everything
/// else the core reports is a rendering problem.
impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(msg) => CliError::Io(msg),
            RenderError::InvalidConfig(msg) => CliError::Input(msg),
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_face_sizes_exit_with_10() {
        let err = CliError::from(RenderError::DimensionMismatch {
            face: cubemap_core::CubeFace::NegativeY,
            expected_w: 64,
            expected_h: 64,
            actual_w: 32,
            actual_h: 32,
        });
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        assert_eq!(CliError::Io("out.png: permission denied".into()).exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        assert_eq!(CliError::Input("invalid code '0xZZ'".into()).exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        assert_eq!(CliError::Serialization("json fail".into()).exit_code(), 13);
    }

    #[test]
    fn from_render_io_routes_to_cli_io() {
        let cli_err = CliError::from(RenderError::Io("faces/cubemap_nx.png: not found".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("cubemap_nx.png"));
    }

    #[test]
    fn from_render_invalid_config_routes_to_input() {
        let cli_err = CliError::from(RenderError::InvalidConfig("unknown field".into()));
        assert_eq!(cli_err.exit_code(), 12);
    }

    #[test]
    fn from_other_render_error_routes_to_render() {
        let cli_err = CliError::from(RenderError::InvalidHandle("TextureHandle(0)".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("TextureHandle(0)"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
