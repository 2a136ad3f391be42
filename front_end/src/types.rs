use std::fmt;

/// Names that can never be used for a struct type.
pub const RESERVED_TYPE_NAMES: [&str; 3] = ["bool", "int", "void"];

pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// The declared type of a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Int,
    Bool,
    Void,
    Struct(String),
}

impl TypeDescriptor {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Int => f.write_str("int"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Void => f.write_str("void"),
            TypeDescriptor::Struct(name) => f.write_str(name),
        }
    }
}
