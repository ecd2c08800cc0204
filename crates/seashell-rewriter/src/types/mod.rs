//! Type model for inference: a class handle into the frozen signature
//! catalogue, or a function shape, or nothing known at all.

pub mod registry;

pub use registry::SignatureRegistry;

/// Index of a class inside the [`SignatureRegistry`] arena. Stable for the
/// lifetime of the registry and cheap to copy around during inference.
pub type ClassId = usize;

/// What the rewriter knows about a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    /// No usable information. Most expressions end up here.
    Unknown,
    /// An instance of a catalogued API class.
    Class(ClassId),
    /// A user-defined function. `ret` is the inferred type of its first
    /// returned or assigned value.
    Function {
        returns_deferred: bool,
        ret: Box<TypeDesc>,
    },
}

impl TypeDesc {
    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDesc::Unknown)
    }
}
