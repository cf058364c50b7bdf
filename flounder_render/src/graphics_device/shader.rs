/// Shader program: externally compiled modules plus their entry points
///
/// The render core never creates, mutates or destroys shader modules.

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{ShaderModuleHandle, ShaderStageFlags};

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Geometry shader
    Geometry,
    /// Fragment/Pixel shader
    Fragment,
    /// Compute shader
    Compute,
}

impl ShaderStage {
    /// Matching stage flag
    pub fn flag(&self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Compute => ShaderStageFlags::COMPUTE,
        }
    }
}

/// One compiled module bound to one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStageModule {
    pub stage: ShaderStage,
    pub module: ShaderModuleHandle,
    /// Entry point function name (e.g., "main")
    pub entry_point: String,
}

/// Stage → module/entry-point mapping consumed by a graphics pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgram {
    pub stages: Vec<ShaderStageModule>,
}

impl ShaderProgram {
    /// Vertex + fragment program with "main" entry points
    pub fn vertex_fragment(vertex: ShaderModuleHandle, fragment: ShaderModuleHandle) -> Self {
        Self::default()
            .with_stage(ShaderStage::Vertex, vertex, "main")
            .with_stage(ShaderStage::Fragment, fragment, "main")
    }

    /// Add a stage
    pub fn with_stage(mut self, stage: ShaderStage, module: ShaderModuleHandle, entry_point: &str) -> Self {
        self.stages.push(ShaderStageModule {
            stage,
            module,
            entry_point: entry_point.to_string(),
        });
        self
    }

    /// Module bound to `stage`, if any
    pub fn stage(&self, stage: ShaderStage) -> Option<&ShaderStageModule> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Union of all stage flags
    pub fn stage_flags(&self) -> ShaderStageFlags {
        self.stages
            .iter()
            .fold(ShaderStageFlags::empty(), |flags, s| flags | s.stage.flag())
    }

    /// Check the program can feed a graphics pipeline
    pub fn validate(&self) -> Result<()> {
        if self.stage(ShaderStage::Vertex).is_none() {
            engine_bail!("flounder::Pipeline", InvalidConfiguration,
                "Shader program has no vertex stage");
        }

        let mut seen = ShaderStageFlags::empty();
        for s in &self.stages {
            if s.stage == ShaderStage::Compute {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Compute stage cannot be part of a graphics pipeline");
            }
            if seen.contains(s.stage.flag()) {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Shader stage {:?} declared twice", s.stage);
            }
            if s.module.is_null() {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Shader stage {:?} has a null module", s.stage);
            }
            if s.entry_point.is_empty() || s.entry_point.contains('\0') {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Shader stage {:?} has an invalid entry point {:?}", s.stage, s.entry_point);
            }
            seen |= s.stage.flag();
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
