/// Rendering modes: the closed set of fixed-function state combinations

use std::fmt;

/// Selects which state bundle the variant builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Depth-tested, single target, no blending
    Opaque,
    /// Opaque without depth test or write (always-visible overlays)
    NoDepthTest,
    /// Opaque with one blend attachment per render target (deferred/MRT)
    MultiTarget,
    /// Opaque state, several sampled images in the descriptor layout
    MultiTexture,
}

impl RenderMode {
    /// Every mode, in declaration order
    pub const ALL: [RenderMode; 4] = [
        RenderMode::Opaque,
        RenderMode::NoDepthTest,
        RenderMode::MultiTarget,
        RenderMode::MultiTexture,
    ];

    pub fn depth_enabled(&self) -> bool {
        !matches!(self, RenderMode::NoDepthTest)
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Opaque => "Opaque",
            RenderMode::NoDepthTest => "NoDepthTest",
            RenderMode::MultiTarget => "MultiTarget",
            RenderMode::MultiTexture => "MultiTexture",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "render_mode_tests.rs"]
mod tests;
