//! GL diagnostics: error-queue draining and framebuffer completeness reports.
//!
//! The driver reports failures by queueing error codes that must be polled,
//! so nothing here fails on its own. [`drain_error_queue`] pops every pending
//! code, logs it with the call site, and hands the list back so callers can
//! act on it. [`report_framebuffer_status`] logs one line per incomplete
//! framebuffer and stays silent when it is complete.

use std::fmt;

use crate::backend::GlBackend;

/// Upper bound on polls per drain. A lost context keeps returning errors.
pub const MAX_DRAINED_ERRORS: usize = 64;

/// A code popped from the driver error queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlError {
    NoError,
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    InvalidFramebufferOperation,
    TableTooLarge,
    /// A code outside the fixed table.
    Unknown(u32),
}

impl GlError {
    pub fn from_code(code: u32) -> Self {
        match code {
            0x0000 => GlError::NoError,
            0x0500 => GlError::InvalidEnum,
            0x0501 => GlError::InvalidValue,
            0x0502 => GlError::InvalidOperation,
            0x0503 => GlError::StackOverflow,
            0x0504 => GlError::StackUnderflow,
            0x0505 => GlError::OutOfMemory,
            0x0506 => GlError::InvalidFramebufferOperation,
            0x8031 => GlError::TableTooLarge,
            other => GlError::Unknown(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            GlError::NoError => 0x0000,
            GlError::InvalidEnum => 0x0500,
            GlError::InvalidValue => 0x0501,
            GlError::InvalidOperation => 0x0502,
            GlError::StackOverflow => 0x0503,
            GlError::StackUnderflow => 0x0504,
            GlError::OutOfMemory => 0x0505,
            GlError::InvalidFramebufferOperation => 0x0506,
            GlError::TableTooLarge => 0x8031,
            GlError::Unknown(code) => code,
        }
    }

    /// The GL constant name for this code.
    pub fn label(self) -> &'static str {
        match self {
            GlError::NoError => "GL_NO_ERROR",
            GlError::InvalidEnum => "GL_INVALID_ENUM",
            GlError::InvalidValue => "GL_INVALID_VALUE",
            GlError::InvalidOperation => "GL_INVALID_OPERATION",
            GlError::StackOverflow => "GL_STACK_OVERFLOW",
            GlError::StackUnderflow => "GL_STACK_UNDERFLOW",
            GlError::OutOfMemory => "GL_OUT_OF_MEMORY",
            GlError::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            GlError::TableTooLarge => "GL_TABLE_TOO_LARGE",
            GlError::Unknown(_) => "(ERROR: Unknown Error Enum)",
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.label(), self.code())
    }
}

/// Result of a framebuffer completeness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    Undefined,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    IncompleteMultisample,
    IncompleteLayerTargets,
    /// A status outside the fixed table; `0` when the check itself failed.
    Unknown(u32),
}

impl FramebufferStatus {
    /// The eight incomplete causes, in table order.
    pub const INCOMPLETE: [FramebufferStatus; 8] = [
        FramebufferStatus::Undefined,
        FramebufferStatus::IncompleteAttachment,
        FramebufferStatus::MissingAttachment,
        FramebufferStatus::IncompleteDrawBuffer,
        FramebufferStatus::IncompleteReadBuffer,
        FramebufferStatus::Unsupported,
        FramebufferStatus::IncompleteMultisample,
        FramebufferStatus::IncompleteLayerTargets,
    ];

    pub fn from_code(code: u32) -> Self {
        match code {
            0x8CD5 => FramebufferStatus::Complete,
            0x8219 => FramebufferStatus::Undefined,
            0x8CD6 => FramebufferStatus::IncompleteAttachment,
            0x8CD7 => FramebufferStatus::MissingAttachment,
            0x8CDB => FramebufferStatus::IncompleteDrawBuffer,
            0x8CDC => FramebufferStatus::IncompleteReadBuffer,
            0x8CDD => FramebufferStatus::Unsupported,
            0x8D56 => FramebufferStatus::IncompleteMultisample,
            0x8DA8 => FramebufferStatus::IncompleteLayerTargets,
            other => FramebufferStatus::Unknown(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            FramebufferStatus::Complete => 0x8CD5,
            FramebufferStatus::Undefined => 0x8219,
            FramebufferStatus::IncompleteAttachment => 0x8CD6,
            FramebufferStatus::MissingAttachment => 0x8CD7,
            FramebufferStatus::IncompleteDrawBuffer => 0x8CDB,
            FramebufferStatus::IncompleteReadBuffer => 0x8CDC,
            FramebufferStatus::Unsupported => 0x8CDD,
            FramebufferStatus::IncompleteMultisample => 0x8D56,
            FramebufferStatus::IncompleteLayerTargets => 0x8DA8,
            FramebufferStatus::Unknown(code) => code,
        }
    }

    pub fn is_complete(self) -> bool {
        self == FramebufferStatus::Complete
    }

    /// Description of the cause.
    pub fn description(self) -> &'static str {
        match self {
            FramebufferStatus::Complete => "complete",
            FramebufferStatus::Undefined => "undefined framebuffer",
            FramebufferStatus::IncompleteAttachment => "a necessary attachment is uninitialized",
            FramebufferStatus::MissingAttachment => "no attachments",
            FramebufferStatus::IncompleteDrawBuffer => "incomplete draw buffer",
            FramebufferStatus::IncompleteReadBuffer => "incomplete read buffer",
            FramebufferStatus::Unsupported => "combination of attachments is not supported",
            FramebufferStatus::IncompleteMultisample => {
                "number of samples for all attachments does not match"
            }
            FramebufferStatus::IncompleteLayerTargets => "incomplete layer targets",
            FramebufferStatus::Unknown(_) => "unknown framebuffer status",
        }
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.description(), self.code())
    }
}

/// Checks the bound framebuffer and logs the cause when it is incomplete.
///
/// Returns the classified status; a complete framebuffer produces no output.
pub fn report_framebuffer_status<B: GlBackend + ?Sized>(gl: &B) -> FramebufferStatus {
    let status = FramebufferStatus::from_code(gl.check_framebuffer_status());
    if !status.is_complete() {
        tracing::error!(
            code = status.code(),
            "OpenGL framebuffer error: {}",
            status.description()
        );
    }
    status
}

/// Pops every pending driver error, logging each with `file:line`.
///
/// Returns the errors in the order the driver reported them; an empty vector
/// means the queue was already clear. At most [`MAX_DRAINED_ERRORS`] codes are
/// popped per call.
pub fn drain_error_queue<B: GlBackend + ?Sized>(gl: &B, file: &str, line: u32) -> Vec<GlError> {
    let mut errors = Vec::new();
    loop {
        let error = GlError::from_code(gl.get_error());
        if error == GlError::NoError {
            break;
        }
        tracing::error!(
            file,
            line,
            code = error.code(),
            "GLError {} set in File:{file} Line:{line}",
            error.label()
        );
        errors.push(error);
        if errors.len() == MAX_DRAINED_ERRORS {
            tracing::warn!(
                file,
                line,
                "error queue still not empty after {MAX_DRAINED_ERRORS} polls; is the context lost?"
            );
            break;
        }
    }
    errors
}

/// Drains the error queue, tagging log lines with the invoking file and line.
///
/// ```ignore
/// let errors = gl_check!(gl);
/// ```
#[macro_export]
macro_rules! gl_check {
    ($gl:expr) => {
        $crate::diagnostics::drain_error_queue($gl, file!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{count_events, MockGl};

    const KNOWN_CODES: [u32; 9] = [
        0x0000, 0x0500, 0x0501, 0x0502, 0x0503, 0x0504, 0x0505, 0x0506, 0x8031,
    ];

    #[test]
    fn known_codes_map_to_gl_names() {
        assert_eq!(GlError::from_code(0x0500).label(), "GL_INVALID_ENUM");
        assert_eq!(GlError::from_code(0x0501).label(), "GL_INVALID_VALUE");
        assert_eq!(GlError::from_code(0x0502).label(), "GL_INVALID_OPERATION");
        assert_eq!(GlError::from_code(0x0505).label(), "GL_OUT_OF_MEMORY");
        assert_eq!(
            GlError::from_code(0x0506).label(),
            "GL_INVALID_FRAMEBUFFER_OPERATION"
        );
        assert_eq!(GlError::from_code(0x0503).label(), "GL_STACK_OVERFLOW");
        assert_eq!(GlError::from_code(0x0504).label(), "GL_STACK_UNDERFLOW");
        assert_eq!(GlError::from_code(0x8031).label(), "GL_TABLE_TOO_LARGE");
        assert_eq!(GlError::from_code(0).label(), "GL_NO_ERROR");
    }

    #[test]
    fn unknown_code_keeps_value() {
        let err = GlError::from_code(0x1234);
        assert_eq!(err, GlError::Unknown(0x1234));
        assert_eq!(err.label(), "(ERROR: Unknown Error Enum)");
        assert!(err.to_string().contains("0x1234"));
    }

    #[test]
    fn known_codes_round_trip() {
        for code in KNOWN_CODES {
            assert_eq!(GlError::from_code(code).code(), code);
        }
    }

    #[test]
    fn drain_with_empty_queue_returns_nothing() {
        let gl = MockGl::new();
        let errors = drain_error_queue(&gl, file!(), line!());
        assert!(errors.is_empty());
        assert_eq!(gl.get_error_calls(), 1, "should poll exactly once");
    }

    #[test]
    fn drain_returns_queued_errors_in_order_and_clears_queue() {
        let gl = MockGl::new();
        gl.push_error(0x0502);
        gl.push_error(0x0500);
        gl.push_error(0x0505);

        let errors = gl_check!(&gl);

        assert_eq!(
            errors,
            vec![
                GlError::InvalidOperation,
                GlError::InvalidEnum,
                GlError::OutOfMemory
            ]
        );
        assert_eq!(gl.pending_errors(), 0);
        assert!(gl_check!(&gl).is_empty());
    }

    #[test]
    fn drain_stops_at_poll_cap() {
        let gl = MockGl::new();
        for _ in 0..(MAX_DRAINED_ERRORS + 10) {
            gl.push_error(0x0506);
        }
        let errors = drain_error_queue(&gl, "lost.rs", 1);
        assert_eq!(errors.len(), MAX_DRAINED_ERRORS);
        assert_eq!(gl.pending_errors(), 10);
    }

    #[test]
    fn complete_framebuffer_reports_complete() {
        let gl = MockGl::new();
        assert_eq!(report_framebuffer_status(&gl), FramebufferStatus::Complete);
    }

    #[test]
    fn each_incomplete_cause_is_classified() {
        for cause in FramebufferStatus::INCOMPLETE {
            let gl = MockGl::new();
            gl.set_framebuffer_status(cause.code());
            let status = report_framebuffer_status(&gl);
            assert_eq!(status, cause);
            assert!(!status.is_complete());
        }
    }

    #[test]
    fn complete_framebuffer_logs_nothing() {
        let gl = MockGl::new();
        let logged = count_events(|| {
            report_framebuffer_status(&gl);
        });
        assert_eq!(logged, 0);
    }

    #[test]
    fn each_incomplete_cause_logs_one_message() {
        for cause in FramebufferStatus::INCOMPLETE {
            let gl = MockGl::new();
            gl.set_framebuffer_status(cause.code());
            let logged = count_events(|| {
                report_framebuffer_status(&gl);
            });
            assert_eq!(logged, 1, "{cause:?}");
        }
    }

    #[test]
    fn empty_drain_logs_nothing() {
        let gl = MockGl::new();
        let logged = count_events(|| {
            drain_error_queue(&gl, file!(), line!());
        });
        assert_eq!(logged, 0);
    }

    #[test]
    fn drain_logs_one_message_per_queued_error() {
        let gl = MockGl::new();
        for code in [0x0500, 0x0501, 0x0502, 0x0505, 0x0506] {
            gl.push_error(code);
        }
        let logged = count_events(|| {
            drain_error_queue(&gl, file!(), line!());
        });
        assert_eq!(logged, 5);
    }

    #[test]
    fn incomplete_causes_have_distinct_descriptions() {
        let mut seen = std::collections::HashSet::new();
        for cause in FramebufferStatus::INCOMPLETE {
            assert!(
                seen.insert(cause.description()),
                "duplicate description for {cause:?}"
            );
        }
    }

    #[test]
    fn missing_attachment_description_matches_driver_wording() {
        assert_eq!(
            FramebufferStatus::MissingAttachment.description(),
            "no attachments"
        );
        assert_eq!(
            FramebufferStatus::from_code(0x8DA8),
            FramebufferStatus::IncompleteLayerTargets
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn error_code() -> impl Strategy<Value = u32> {
            prop_oneof![
                prop::sample::select(KNOWN_CODES[1..].to_vec()),
                1_u32..0xFFFF,
            ]
            .prop_filter("zero means empty queue", |c| *c != 0)
        }

        proptest! {
            #[test]
            fn drain_pops_exactly_the_queued_codes(
                codes in prop::collection::vec(error_code(), 0..MAX_DRAINED_ERRORS),
            ) {
                let gl = MockGl::new();
                for &code in &codes {
                    gl.push_error(code);
                }
                let errors = drain_error_queue(&gl, "prop.rs", 7);
                prop_assert_eq!(errors.len(), codes.len());
                for (err, code) in errors.iter().zip(&codes) {
                    prop_assert_eq!(*err, GlError::from_code(*code));
                }
                prop_assert_eq!(gl.pending_errors(), 0);
            }

            #[test]
            fn framebuffer_status_code_round_trips(code in any::<u32>()) {
                prop_assert_eq!(FramebufferStatus::from_code(code).code(), code);
            }
        }
    }
}
