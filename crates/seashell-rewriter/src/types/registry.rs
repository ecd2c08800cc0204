//! Frozen catalogue of API class signatures.
//!
//! Built once from the `seashell-api` dataset and shared process-wide. The
//! dataset names return types as strings; resolution to [`ClassId`] handles
//! happens lazily at lookup time, so forward references between classes in
//! the dataset need no ordering.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use seashell_api::{AttributeKind, ClassSignature};

use crate::types::{ClassId, TypeDesc};

static GLOBAL: Lazy<SignatureRegistry> = Lazy::new(SignatureRegistry::standard);

pub struct SignatureRegistry {
    classes: Vec<&'static ClassSignature>,
    by_name: HashMap<&'static str, ClassId>,
    root: ClassId,
    default_child: ClassId,
}

impl SignatureRegistry {
    /// The registry built from the full published dataset.
    pub fn standard() -> Self {
        Self::from_signatures(seashell_api::signatures())
    }

    /// Process-wide shared instance.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    fn from_signatures(signatures: &'static [ClassSignature]) -> Self {
        let mut classes = Vec::with_capacity(signatures.len());
        let mut by_name = HashMap::with_capacity(signatures.len());
        for sig in signatures {
            by_name.insert(sig.name, classes.len());
            classes.push(sig);
        }
        let root = by_name[seashell_api::ROOT_CLASS];
        let default_child = by_name[seashell_api::DEFAULT_CHILD_CLASS];
        Self { classes, by_name, root, default_child }
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_name(&self, id: ClassId) -> &'static str {
        self.classes[id].name
    }

    /// Handle of the connection root class.
    pub fn root(&self) -> ClassId {
        self.root
    }

    /// Handle of the class produced by unrecognized root attribute access.
    pub fn default_child(&self) -> ClassId {
        self.default_child
    }

    /// Type of the global binding representing the active connection.
    pub fn root_type(&self) -> TypeDesc {
        TypeDesc::Class(self.root)
    }

    /// Looks up `name` on class `id` and resolves its declared return type.
    /// `None` means the class has no such attribute at all.
    pub fn attr(&self, id: ClassId, name: &str) -> Option<TypeDesc> {
        let attribute = self.classes[id]
            .attributes
            .iter()
            .find(|a| a.name == name)?;
        Some(match attribute.kind {
            AttributeKind::Value => TypeDesc::Unknown,
            AttributeKind::Function { returns_deferred, return_type } => TypeDesc::Function {
                returns_deferred,
                ret: Box::new(self.resolve_name(return_type)),
            },
        })
    }

    fn resolve_name(&self, name: Option<&str>) -> TypeDesc {
        match name.and_then(|n| self.class_id(n)) {
            Some(id) => TypeDesc::Class(id),
            None => TypeDesc::Unknown,
        }
    }
}
