//! Unit tests for config.rs

use crate::error::Error;
use crate::graphics_device::{
    ColorBlendAttachment, CompareOp, CullMode, PolygonMode, PrimitiveTopology, PushConstantRange,
    RasterizationState, RenderPassHandle, SampleCount, ShaderStageFlags,
};
use crate::pipeline::PipelineConfig;

fn range(offset: u32, size: u32) -> PushConstantRange {
    PushConstantRange { stages: ShaderStageFlags::VERTEX, offset, size }
}

#[test]
fn test_default_config() {
    let config = PipelineConfig::default();
    assert!(config.render_pass.is_null());
    assert_eq!(config.subpass, 0);
    assert_eq!(config.color_targets, vec![ColorBlendAttachment::opaque()]);
    assert!(config.push_constant_ranges.is_empty());
    assert_eq!(config.topology, PrimitiveTopology::TriangleList);
    assert_eq!(config.rasterization, RasterizationState::default());
    assert_eq!(config.depth_compare_op, CompareOp::LessOrEqual);
    assert_eq!(config.sample_count, SampleCount::S1);
}

#[test]
fn test_fixed_function_builders() {
    let wireframe = RasterizationState {
        cull_mode: CullMode::None,
        polygon_mode: PolygonMode::Line,
        ..RasterizationState::default()
    };
    let config = PipelineConfig::default()
        .with_topology(PrimitiveTopology::LineList)
        .with_rasterization(wireframe)
        .with_depth_compare_op(CompareOp::GreaterOrEqual)
        .with_sample_count(SampleCount::S4);

    assert_eq!(config.topology, PrimitiveTopology::LineList);
    assert_eq!(config.rasterization.polygon_mode, PolygonMode::Line);
    assert_eq!(config.depth_compare_op, CompareOp::GreaterOrEqual);
    assert_eq!(config.sample_count, SampleCount::S4);
}

#[test]
fn test_line_width_must_be_positive_and_finite() {
    assert!(PipelineConfig::default().validate_rasterization().is_ok());

    for width in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let config = PipelineConfig::default().with_rasterization(RasterizationState {
            line_width: width,
            ..RasterizationState::default()
        });
        assert!(matches!(config.validate_rasterization(), Err(Error::InvalidConfiguration(_))));
    }
}

#[test]
fn test_for_render_pass() {
    let config = PipelineConfig::for_render_pass(RenderPassHandle::from_raw(42), 1);
    assert_eq!(config.render_pass.as_raw(), 42);
    assert_eq!(config.subpass, 1);
    assert_eq!(config.color_targets.len(), 1);
}

#[test]
fn test_with_color_targets() {
    let gbuffer = PipelineConfig::default().with_color_targets(4);
    assert_eq!(gbuffer.color_targets.len(), 4);
    assert!(gbuffer.color_targets.iter().all(|t| !t.blend_enable));

    assert!(PipelineConfig::default().with_color_targets(0).color_targets.is_empty());
}

#[test]
fn test_valid_push_constants() {
    // Model matrix (64 bytes) + tint (16 bytes)
    let config = PipelineConfig::default()
        .with_push_constant_range(range(0, 64))
        .with_push_constant_range(PushConstantRange {
            stages: ShaderStageFlags::FRAGMENT,
            offset: 64,
            size: 16,
        });
    assert!(config.validate_push_constants().is_ok());
}

#[test]
fn test_zero_sized_push_constant_rejected() {
    let config = PipelineConfig::default().with_push_constant_range(range(0, 0));
    assert!(matches!(config.validate_push_constants(), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_misaligned_push_constant_rejected() {
    let bad_size = PipelineConfig::default().with_push_constant_range(range(0, 6));
    assert!(bad_size.validate_push_constants().is_err());

    let bad_offset = PipelineConfig::default().with_push_constant_range(range(2, 8));
    assert!(bad_offset.validate_push_constants().is_err());
}

#[test]
fn test_push_constant_without_stage_rejected() {
    let config = PipelineConfig::default().with_push_constant_range(PushConstantRange {
        stages: ShaderStageFlags::empty(),
        offset: 0,
        size: 16,
    });
    assert!(matches!(config.validate_push_constants(), Err(Error::InvalidConfiguration(_))));
}
