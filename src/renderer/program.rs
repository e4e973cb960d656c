//! Cube shader program
//!
//! Both stages are parsed and validated with naga before the GPU sees them,
//! which turns a broken shader into an ordinary setup error. The same
//! module is then reflected to resolve input locations and resource
//! bindings once, for the lifetime of the program.

use crate::device::GraphicsDevice;
use crate::error::{ShaderError, ShaderStage};
use tracing::debug;

/// Vertex entry point.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point used once the texture has loaded.
pub const TEXTURED_ENTRY: &str = "fs_textured";
/// Fragment entry point used while no texture is available.
pub const UNTEXTURED_ENTRY: &str = "fs_untextured";

/// WGSL source for the two stages.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

impl ShaderSource<'static> {
    /// The built-in cube shader.
    pub const CUBE: Self = Self {
        vertex: include_str!("../../shaders/cube.vert.wgsl"),
        fragment: include_str!("../../shaders/cube.frag.wgsl"),
    };
}

impl Default for ShaderSource<'static> {
    fn default() -> Self {
        Self::CUBE
    }
}

/// Bind group and binding index of a shader resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSlot {
    pub group: u32,
    pub binding: u32,
}

/// Locations resolved from a validated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramLayout {
    /// Vertex input `position`.
    pub position: u32,
    /// Vertex input `tex_coord`.
    pub tex_coord: u32,
    /// Uniform `projection`.
    pub projection: ResourceSlot,
    /// Uniform `model_view`.
    pub model_view: ResourceSlot,
    /// Texture `cube_texture`.
    pub texture: ResourceSlot,
    /// Sampler `cube_sampler`.
    pub sampler: ResourceSlot,
}

impl ProgramLayout {
    /// Group holding the two matrices.
    pub const TRANSFORM_GROUP: u32 = 0;
    /// Group holding the texture and its sampler.
    pub const TEXTURE_GROUP: u32 = 1;

    /// Compile both stages on the CPU and resolve every location.
    ///
    /// Besides per-stage validation this checks what the stages agree on:
    /// every fragment input is written by the vertex stage with the same
    /// type, and each resource has the kind the bind group layouts expect.
    pub fn reflect(source: &ShaderSource<'_>) -> Result<Self, ShaderError> {
        const TRANSFORM: u32 = ProgramLayout::TRANSFORM_GROUP;
        const TEXTURE: u32 = ProgramLayout::TEXTURE_GROUP;

        let vertex = compile_stage(ShaderStage::Vertex, source.vertex)?;
        let fragment = compile_stage(ShaderStage::Fragment, source.fragment)?;

        let vs_main = entry_point(&vertex, ShaderStage::Vertex, VERTEX_ENTRY)?;
        let outputs = stage_outputs(&vertex, vs_main);
        for name in [TEXTURED_ENTRY, UNTEXTURED_ENTRY] {
            let fs = entry_point(&fragment, ShaderStage::Fragment, name)?;
            check_interface(&fragment, fs, &outputs)?;
        }

        Ok(Self {
            position: input_location(vs_main, "position")?,
            tex_coord: input_location(vs_main, "tex_coord")?,
            projection: resource_slot(&vertex, "projection", TRANSFORM, Resource::Matrix)?,
            model_view: resource_slot(&vertex, "model_view", TRANSFORM, Resource::Matrix)?,
            texture: resource_slot(&fragment, "cube_texture", TEXTURE, Resource::Texture)?,
            sampler: resource_slot(&fragment, "cube_sampler", TEXTURE, Resource::Sampler)?,
        })
    }
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        stage,
        message: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Validation {
        stage,
        message: e.into_inner().to_string(),
    })?;

    Ok(module)
}

fn entry_point<'m>(
    module: &'m naga::Module,
    stage: ShaderStage,
    name: &'static str,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == naga_stage)
        .ok_or(ShaderError::MissingEntryPoint { stage, name })
}

fn input_location(entry: &naga::EntryPoint, name: &'static str) -> Result<u32, ShaderError> {
    entry
        .function
        .arguments
        .iter()
        .find_map(|arg| match (&arg.name, &arg.binding) {
            (Some(arg_name), Some(naga::Binding::Location { location, .. })) if arg_name == name => {
                Some(*location)
            }
            _ => None,
        })
        .ok_or(ShaderError::MissingInput(name))
}

/// `@location` bindings carried by a value of type `ty`, flattening one
/// level of struct.
fn locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
) -> Vec<(u32, naga::TypeInner)> {
    if let Some(naga::Binding::Location { location, .. }) = binding {
        return vec![(*location, module.types[ty].inner.clone())];
    }
    match &module.types[ty].inner {
        naga::TypeInner::Struct { members, .. } => members
            .iter()
            .filter_map(|member| match &member.binding {
                Some(naga::Binding::Location { location, .. }) => {
                    Some((*location, module.types[member.ty].inner.clone()))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn stage_outputs(module: &naga::Module, entry: &naga::EntryPoint) -> Vec<(u32, naga::TypeInner)> {
    entry
        .function
        .result
        .as_ref()
        .map(|result| locations(module, result.ty, result.binding.as_ref()))
        .unwrap_or_default()
}

fn check_interface(
    module: &naga::Module,
    entry: &naga::EntryPoint,
    vertex_outputs: &[(u32, naga::TypeInner)],
) -> Result<(), ShaderError> {
    let inputs = entry
        .function
        .arguments
        .iter()
        .flat_map(|arg| locations(module, arg.ty, arg.binding.as_ref()));

    for (location, ty) in inputs {
        match vertex_outputs.iter().find(|(out, _)| *out == location) {
            None => {
                return Err(ShaderError::Link(format!(
                    "`{}` reads @location({location}), which `{VERTEX_ENTRY}` does not write",
                    entry.name
                )))
            }
            Some((_, written)) if *written != ty => {
                return Err(ShaderError::Link(format!(
                    "`{}` reads @location({location}) as {ty:?}, but `{VERTEX_ENTRY}` writes {written:?}",
                    entry.name
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// What a named resource has to be for the bind group layouts to match it.
#[derive(Debug, Clone, Copy)]
enum Resource {
    Matrix,
    Texture,
    Sampler,
}

impl Resource {
    fn describe(self) -> &'static str {
        match self {
            Resource::Matrix => "a `var<uniform>` of type mat4x4<f32>",
            Resource::Texture => "a texture_2d<f32>",
            Resource::Sampler => "a filtering sampler",
        }
    }

    fn matches(self, space: naga::AddressSpace, ty: &naga::TypeInner) -> bool {
        use naga::{ImageClass, ImageDimension, Scalar, ScalarKind, TypeInner, VectorSize};

        match self {
            Resource::Matrix => {
                space == naga::AddressSpace::Uniform
                    && *ty
                        == TypeInner::Matrix {
                            columns: VectorSize::Quad,
                            rows: VectorSize::Quad,
                            scalar: Scalar::F32,
                        }
            }
            Resource::Texture => matches!(
                ty,
                TypeInner::Image {
                    dim: ImageDimension::D2,
                    arrayed: false,
                    class: ImageClass::Sampled {
                        kind: ScalarKind::Float,
                        multi: false,
                    },
                }
            ),
            Resource::Sampler => matches!(ty, TypeInner::Sampler { comparison: false }),
        }
    }
}

fn resource_slot(
    module: &naga::Module,
    name: &'static str,
    expected_group: u32,
    expected: Resource,
) -> Result<ResourceSlot, ShaderError> {
    let (var, binding) = module
        .global_variables
        .iter()
        .find_map(|(_, var)| match &var.binding {
            Some(binding) if var.name.as_deref() == Some(name) => Some((var, binding)),
            _ => None,
        })
        .ok_or(ShaderError::MissingBinding(name))?;

    if binding.group != expected_group {
        return Err(ShaderError::BindGroup {
            name,
            expected: expected_group,
            found: binding.group,
        });
    }

    if !expected.matches(var.space, &module.types[var.ty].inner) {
        return Err(ShaderError::BindingType {
            name,
            expected: expected.describe(),
        });
    }

    Ok(ResourceSlot {
        group: binding.group,
        binding: binding.binding,
    })
}

/// A linked program and its cached locations.
pub struct ShaderProgram<P> {
    handle: P,
    layout: ProgramLayout,
}

impl<P> ShaderProgram<P> {
    /// Validate, reflect and link `source`. Failure of either stage is returned, never panics.
    pub fn build<D: GraphicsDevice<Program = P>>(
        device: &mut D,
        source: &ShaderSource<'_>,
    ) -> Result<Self, ShaderError> {
        let layout = ProgramLayout::reflect(source)?;
        let handle = device.create_program(source, &layout)?;
        debug!(?layout, "linked cube program");
        Ok(Self { handle, layout })
    }

    pub fn handle(&self) -> &P {
        &self.handle
    }

    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflects_builtin_cube_shader() {
        let layout = ProgramLayout::reflect(&ShaderSource::CUBE).unwrap();
        assert_eq!(layout.position, 0);
        assert_eq!(layout.tex_coord, 1);
        assert_eq!(layout.projection, ResourceSlot { group: 0, binding: 0 });
        assert_eq!(layout.model_view, ResourceSlot { group: 0, binding: 1 });
        assert_eq!(layout.texture, ResourceSlot { group: 1, binding: 0 });
        assert_eq!(layout.sampler, ResourceSlot { group: 1, binding: 1 });
    }

    #[test]
    fn test_fragment_syntax_error_names_stage() {
        let source = ShaderSource {
            vertex: ShaderSource::CUBE.vertex,
            fragment: "@fragment fn fs_textured( -> @location(0) vec4<f32> {",
        };
        match ProgramLayout::reflect(&source) {
            Err(ShaderError::Parse { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
            other => panic!("expected fragment parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_vertex_type_error_is_rejected() {
        let source = ShaderSource {
            vertex: "@vertex fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> { return position; }",
            fragment: ShaderSource::CUBE.fragment,
        };
        match ProgramLayout::reflect(&source) {
            Err(ShaderError::Parse { stage, .. }) | Err(ShaderError::Validation { stage, .. }) => {
                assert_eq!(stage, ShaderStage::Vertex)
            }
            other => panic!("expected vertex compile error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_untextured_entry_point() {
        let fragment = ShaderSource::CUBE
            .fragment
            .replace("fs_untextured", "fs_plain");
        let source = ShaderSource {
            vertex: ShaderSource::CUBE.vertex,
            fragment: &fragment,
        };
        assert!(matches!(
            ProgramLayout::reflect(&source),
            Err(ShaderError::MissingEntryPoint {
                stage: ShaderStage::Fragment,
                name: UNTEXTURED_ENTRY
            })
        ));
    }

    #[test]
    fn test_sampler_in_wrong_group() {
        let fragment = ShaderSource::CUBE
            .fragment
            .replace("@group(1) @binding(1) var cube_sampler", "@group(2) @binding(1) var cube_sampler");
        let source = ShaderSource {
            vertex: ShaderSource::CUBE.vertex,
            fragment: &fragment,
        };
        assert!(matches!(
            ProgramLayout::reflect(&source),
            Err(ShaderError::BindGroup {
                name: "cube_sampler",
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_fragment_input_not_written_by_vertex() {
        let fragment = ShaderSource::CUBE.fragment.replace(
            "@location(0) tex_coord: vec2<f32>,\n};",
            "@location(0) tex_coord: vec2<f32>,\n    @location(3) extra: vec4<f32>,\n};",
        );
        assert_ne!(fragment, ShaderSource::CUBE.fragment);
        let source = ShaderSource {
            vertex: ShaderSource::CUBE.vertex,
            fragment: &fragment,
        };
        match ProgramLayout::reflect(&source) {
            Err(ShaderError::Link(message)) => assert!(message.contains("@location(3)"), "{message}"),
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn test_fragment_input_type_mismatch() {
        let fragment = ShaderSource::CUBE
            .fragment
            .replace("@location(0) tex_coord: vec2<f32>", "@location(0) tex_coord: vec3<f32>")
            .replace("in.tex_coord)", "in.tex_coord.xy)");
        let source = ShaderSource {
            vertex: ShaderSource::CUBE.vertex,
            fragment: &fragment,
        };
        assert!(matches!(
            ProgramLayout::reflect(&source),
            Err(ShaderError::Link(_))
        ));
    }

    #[test]
    fn test_storage_matrix_is_rejected() {
        let vertex = ShaderSource::CUBE
            .vertex
            .replace("var<uniform> projection", "var<storage> projection");
        assert_ne!(vertex, ShaderSource::CUBE.vertex);
        let source = ShaderSource {
            vertex: &vertex,
            fragment: ShaderSource::CUBE.fragment,
        };
        assert!(matches!(
            ProgramLayout::reflect(&source),
            Err(ShaderError::BindingType {
                name: "projection",
                ..
            })
        ));
    }
}
