//! Instanced mesh shader and its uniform block.

use crate::camera::Camera;
use crate::{Mat4, Vec3};
use bytemuck::{Pod, Zeroable};

/// WGSL for drawing one mesh per [`InstanceTransform`](crate::InstanceTransform).
pub const INSTANCED_SHADER: &str = include_str!("instanced.wgsl");

/// Offset applied to the whole scene so the tree sits in frame.
pub const GROUP_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub offset: [f32; 4],
    pub light_dir: [f32; 4],
    pub ambient: [f32; 4],
    pub camera_pos: [f32; 4],
}

impl Uniforms {
    /// Uniforms for the current camera and viewport.
    pub fn new(camera: &Camera, aspect: f32) -> Self {
        let light = Vec3::new(10.0, 20.0, 10.0).normalize();
        Self {
            view_proj: camera.view_proj(aspect).to_cols_array_2d(),
            offset: GROUP_OFFSET.extend(0.0).to_array(),
            light_dir: light.extend(0.6).to_array(),
            ambient: [0.3, 0.3, 0.3, 0.0],
            camera_pos: camera.position().extend(1.0).to_array(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_instanced_shader_validates() {
        validate_wgsl(INSTANCED_SHADER).unwrap();
    }

    #[test]
    fn test_entry_points_present() {
        assert!(INSTANCED_SHADER.contains("fn vs_main"));
        assert!(INSTANCED_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn test_uniform_layout() {
        // mat4 plus four vec4s, no implicit padding
        assert_eq!(std::mem::size_of::<Uniforms>(), 128);
    }

    #[test]
    fn test_uniforms_from_camera() {
        let camera = Camera::new();
        let uniforms = Uniforms::new(&camera, 1.5);
        assert_eq!(uniforms.view_proj(), camera.view_proj(1.5));
        assert_eq!(uniforms.offset, [0.0, -2.0, 0.0, 0.0]);
        assert_eq!(uniforms.camera_pos[2], 25.0);
    }
}
