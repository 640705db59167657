use crate::layout::Variant;
use crate::layout::uniforms::{CameraUniform, LightUniform};
use std::mem::size_of;

/// Kind of resource bound at one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `texture_2d<f32>`, filterable float sampling.
    Texture2dFloat,
    /// Filtering (non-comparison) `sampler`.
    FilteringSampler,
    /// `var<uniform>` buffer of the given byte size.
    UniformBuffer { size: u64 },
}

/// Stages that read a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Vertex,
    Fragment,
    VertexFragment,
}

impl Visibility {
    /// `None` when neither stage reads the binding.
    pub fn from_stages(vertex: bool, fragment: bool) -> Option<Self> {
        match (vertex, fragment) {
            (true, true) => Some(Visibility::VertexFragment),
            (true, false) => Some(Visibility::Vertex),
            (false, true) => Some(Visibility::Fragment),
            (false, false) => None,
        }
    }

    /// True when every stage in `used` is also in `self`.
    pub fn covers(self, used: Visibility) -> bool {
        self == Visibility::VertexFragment || self == used
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
    pub resource: ResourceKind,
    pub visibility: Visibility,
    pub label: &'static str,
}

pub const TEXTURE_GROUP: u32 = 0;
pub const CAMERA_GROUP: u32 = 1;
pub const LIGHT_GROUP: u32 = 2;

pub const TEXTURE_BINDING: BindingSlot = BindingSlot {
    group: TEXTURE_GROUP,
    binding: 0,
    resource: ResourceKind::Texture2dFloat,
    visibility: Visibility::Fragment,
    label: "diffuse texture",
};

pub const SAMPLER_BINDING: BindingSlot = BindingSlot {
    group: TEXTURE_GROUP,
    binding: 1,
    resource: ResourceKind::FilteringSampler,
    visibility: Visibility::Fragment,
    label: "diffuse sampler",
};

pub const CAMERA_BINDING: BindingSlot = BindingSlot {
    group: CAMERA_GROUP,
    binding: 0,
    resource: ResourceKind::UniformBuffer {
        size: size_of::<CameraUniform>() as u64,
    },
    visibility: Visibility::Vertex,
    label: "camera uniform",
};

pub const LIGHT_BINDING: BindingSlot = BindingSlot {
    group: LIGHT_GROUP,
    binding: 0,
    resource: ResourceKind::UniformBuffer {
        size: size_of::<LightUniform>() as u64,
    },
    visibility: Visibility::Fragment,
    label: "light uniform",
};

const UNLIT_BINDINGS: [BindingSlot; 3] = [TEXTURE_BINDING, SAMPLER_BINDING, CAMERA_BINDING];
const LIT_BINDINGS: [BindingSlot; 4] = [
    TEXTURE_BINDING,
    SAMPLER_BINDING,
    CAMERA_BINDING,
    LIGHT_BINDING,
];

/// All slots a variant binds, ordered by (group, binding).
pub fn binding_slots(variant: Variant) -> &'static [BindingSlot] {
    match variant {
        Variant::Unlit => &UNLIT_BINDINGS,
        Variant::Lit => &LIT_BINDINGS,
    }
}

/// Number of bind groups in the variant's pipeline layout.
pub fn bind_group_count(variant: Variant) -> u32 {
    binding_slots(variant)
        .iter()
        .map(|slot| slot.group + 1)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_adds_only_the_light_group() {
        let unlit = binding_slots(Variant::Unlit);
        let lit = binding_slots(Variant::Lit);
        assert_eq!(&lit[..unlit.len()], unlit);
        assert_eq!(lit.last(), Some(&LIGHT_BINDING));
        assert_eq!(bind_group_count(Variant::Unlit), 2);
        assert_eq!(bind_group_count(Variant::Lit), 3);
    }

    #[test]
    fn visibility_covers_only_its_stages() {
        assert_eq!(Visibility::from_stages(false, false), None);
        assert_eq!(
            Visibility::from_stages(true, true),
            Some(Visibility::VertexFragment)
        );
        assert!(Visibility::VertexFragment.covers(Visibility::Fragment));
        assert!(CAMERA_BINDING.visibility.covers(Visibility::Vertex));
        assert!(!CAMERA_BINDING.visibility.covers(Visibility::Fragment));
        assert!(!LIGHT_BINDING.visibility.covers(Visibility::VertexFragment));
    }

    #[test]
    fn uniform_slots_carry_struct_sizes() {
        assert_eq!(
            CAMERA_BINDING.resource,
            ResourceKind::UniformBuffer { size: 64 }
        );
        assert_eq!(LIGHT_BINDING.resource, ResourceKind::UniformBuffer { size: 32 });
    }
}
