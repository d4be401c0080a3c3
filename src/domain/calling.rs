/// Calling Taxonomy Module
///
/// Defines the closed set of call-relationship kinds used to classify every
/// edge in a method graph.

use std::fmt;

/// How a method call relates caller and callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallingType {
    /// Call within the same declaring class.
    SelfCall,
    /// Call to/through an overridden ancestor method.
    Super,
    /// Call to a method in the same module.
    Brother,
    /// Call crossing a module boundary inside the analyzed codebase.
    Out,
    /// Call into the platform/standard runtime library.
    Jdk,
    /// Call into a third-party dependency.
    Library,
}

impl CallingType {
    /// All calling kinds in enumeration order.
    pub const ALL: [CallingType; 6] = [
        CallingType::SelfCall,
        CallingType::Super,
        CallingType::Brother,
        CallingType::Out,
        CallingType::Jdk,
        CallingType::Library,
    ];

    /// Parse a wire identifier. Identifiers are exact; anything else is None.
    pub fn parse(s: &str) -> Option<CallingType> {
        match s {
            "SELF" => Some(CallingType::SelfCall),
            "SUPER" => Some(CallingType::Super),
            "BROTHER" => Some(CallingType::Brother),
            "OUT" => Some(CallingType::Out),
            "JDK" => Some(CallingType::Jdk),
            "LIBRARY" => Some(CallingType::Library),
            _ => None,
        }
    }

    /// The stable wire identifier for this kind.
    pub fn identifier(&self) -> &'static str {
        match self {
            CallingType::SelfCall => "SELF",
            CallingType::Super => "SUPER",
            CallingType::Brother => "BROTHER",
            CallingType::Out => "OUT",
            CallingType::Jdk => "JDK",
            CallingType::Library => "LIBRARY",
        }
    }

    /// Human-facing label shown on classified edges.
    pub fn label(&self) -> &'static str {
        match self {
            CallingType::SelfCall => "class-internal",
            CallingType::Super => "inherited",
            CallingType::Brother => "same-module",
            CallingType::Out => "cross-module",
            CallingType::Jdk => "platform",
            CallingType::Library => "third-party",
        }
    }
}

impl fmt::Display for CallingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// A directed, classified call edge between two methods.
///
/// Both endpoints are method ids that must resolve in the owning graph's
/// method map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCalling {
    pub from: String,
    pub to: String,
    pub calling_type: CallingType,
}
