use crate::types::*;

/// The kind of an exported item.
///
/// Only functions and memories are indexed by the loader. Tables and globals are
/// listed in the export descriptors but never bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Function,
    Memory,
    Other(OtherExportKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtherExportKind {
    Table,
    Global,
}

/// Metadata for one export, in the order the host runtime reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportDescriptor {
    pub name: String,
    pub kind: ExportKind,
}

impl ExportDescriptor {
    pub fn new<S: Into<String>>(name: S, kind: ExportKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn function<S: Into<String>>(name: S) -> Self {
        Self::new(name, ExportKind::Function)
    }

    pub fn memory<S: Into<String>>(name: S) -> Self {
        Self::new(name, ExportKind::Memory)
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportKind::Function => write!(f, "function"),
            ExportKind::Memory => write!(f, "memory"),
            ExportKind::Other(OtherExportKind::Table) => write!(f, "table"),
            ExportKind::Other(OtherExportKind::Global) => write!(f, "global"),
        }
    }
}
