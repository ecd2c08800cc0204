//! Frozen catalogue of driver-facing API class signatures.
//!
//! This is the data the rewriter's type inference runs on: for every shell
//! class, which attributes it exposes, whether a call to an attribute yields
//! a deferred (promise-like) value, and what the call returns.
//!
//! The catalogue is static and never mutated. Return types are given by
//! class *name* so mutually referring classes need no definition order;
//! consumers resolve names on lookup.

// ─── Signature model ─────────────────────────────────────────────────────────

/// Lowest and highest server version an attribute is compatible with.
/// Consumed by version-gating collaborators; the rewriter ignores it.
pub type ServerVersions = [&'static str; 2];

pub const ALL_SERVER_VERSIONS: ServerVersions = ["0.0.0", "999.999.999"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// A plain (non-callable) value. Its type is opaque to the rewriter.
    Value,
    /// A callable member.
    Function {
        /// True when a call yields a deferred value the shell must await.
        returns_deferred: bool,
        /// Class name of the call's result, `None` when opaque.
        return_type: Option<&'static str>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub server_versions: ServerVersions,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassSignature {
    pub name: &'static str,
    pub attributes: &'static [Attribute],
}

// ─── Well-known names ────────────────────────────────────────────────────────

/// Class of the root API entry point.
pub const ROOT_CLASS: &str = "Database";

/// Class produced when an unknown attribute is read off the root object.
/// Models the root's dynamic any-name-yields-a-collection behaviour.
pub const DEFAULT_CHILD_CLASS: &str = "Collection";

/// Global under which the root object is bound in every session.
pub const ROOT_BINDING: &str = "db";

// ─── Dataset ─────────────────────────────────────────────────────────────────

const fn returning(return_type: &'static str) -> AttributeKind {
    AttributeKind::Function { returns_deferred: false, return_type: Some(return_type) }
}

const fn deferred() -> AttributeKind {
    AttributeKind::Function { returns_deferred: true, return_type: None }
}

const fn deferred_returning(return_type: &'static str) -> AttributeKind {
    AttributeKind::Function { returns_deferred: true, return_type: Some(return_type) }
}

const fn attr(name: &'static str, kind: AttributeKind) -> Attribute {
    Attribute { name, kind, server_versions: ALL_SERVER_VERSIONS }
}

/// The complete, immutable signature catalogue.
pub fn signatures() -> &'static [ClassSignature] {
    SIGNATURES
}

static SIGNATURES: &[ClassSignature] = &[
    ClassSignature {
        name: "Database",
        attributes: &[
            attr("getCollection", returning("Collection")),
            attr("aggregate", returning("Cursor")),
            attr("runCommand", deferred()),
            attr("dropDatabase", deferred()),
            attr("listCollections", deferred()),
            attr("name", AttributeKind::Value),
        ],
    },
    ClassSignature {
        name: "Collection",
        attributes: &[
            attr("find", returning("Cursor")),
            attr("aggregate", returning("Cursor")),
            attr("findOne", deferred()),
            attr("insertOne", deferred_returning("InsertOneResult")),
            attr("insertMany", deferred_returning("InsertManyResult")),
            attr("updateOne", deferred_returning("UpdateResult")),
            attr("updateMany", deferred_returning("UpdateResult")),
            attr("deleteOne", deferred_returning("DeleteResult")),
            attr("deleteMany", deferred_returning("DeleteResult")),
            attr("countDocuments", deferred()),
            attr("estimatedDocumentCount", deferred()),
            attr("distinct", deferred()),
            attr("drop", deferred()),
            attr("name", AttributeKind::Value),
        ],
    },
    ClassSignature {
        name: "Cursor",
        attributes: &[
            // chainable builders
            attr("sort", returning("Cursor")),
            attr("limit", returning("Cursor")),
            attr("skip", returning("Cursor")),
            attr("projection", returning("Cursor")),
            attr("batchSize", returning("Cursor")),
            attr("maxTimeMS", returning("Cursor")),
            // exhausting reads
            attr("toArray", deferred()),
            attr("next", deferred()),
            attr("hasNext", deferred()),
            attr("forEach", deferred()),
            attr("count", deferred()),
            attr("itcount", deferred()),
            attr("close", deferred()),
        ],
    },
    ClassSignature { name: "InsertOneResult", attributes: &[] },
    ClassSignature { name: "InsertManyResult", attributes: &[] },
    ClassSignature { name: "UpdateResult", attributes: &[] },
    ClassSignature { name: "DeleteResult", attributes: &[] },
];

// ─── Tests ───────────────────────────────────────────────────────────────────
