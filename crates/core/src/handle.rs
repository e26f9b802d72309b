//! Opaque GL object names.
//!
//! The driver hands out plain `u32` names for every object it creates. The
//! wrappers here keep textures, framebuffers, and programs from being mixed
//! up at call sites. Name `0` is never a created object: for textures it means
//! "unset", for framebuffers it is the window-system default framebuffer.

use std::fmt;

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// The zero name.
            pub const NULL: Self = Self(0);

            /// Returns the raw driver name.
            pub fn name(self) -> u32 {
                self.0
            }

            /// Returns `true` for the zero name.
            pub fn is_null(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(name: u32) -> Self {
                Self(name)
            }
        }
    };
}

gl_handle!(
    /// A GPU texture name. Cubemap textures sampled or read back by this crate
    /// are borrowed from whoever created them.
    TextureHandle
);

gl_handle!(
    /// A framebuffer name. [`FramebufferHandle::DEFAULT`] is the window-system
    /// framebuffer supplied by the host view.
    FramebufferHandle
);

gl_handle!(
    /// A linked shader program.
    ProgramHandle
);

gl_handle!(
    /// A single compiled shader stage.
    ShaderHandle
);

gl_handle!(
    /// A vertex array object.
    VertexArrayHandle
);

impl FramebufferHandle {
    /// The window-system default framebuffer.
    pub const DEFAULT: Self = Self(0);
}
