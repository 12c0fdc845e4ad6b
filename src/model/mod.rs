use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet},
    fmt::{Debug, Display},
};

/// File extension of loadable kernel modules, including the dot.
pub const MODULE_EXTENSION: &str = ".ko";

/// File name of a kernel module inside the module directory, e.g. `ext4.ko`.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModuleName {
    pub value: String,
}

impl ModuleName {
    pub fn new(value: String) -> ModuleName {
        ModuleName { value }
    }

    /// Builds the module file name for a bare dependency name as printed by modinfo.
    pub fn from_dependency(name: &str) -> ModuleName {
        ModuleName::new(format!("{name}{MODULE_EXTENSION}"))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for ModuleName {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl Debug for ModuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Direct dependencies of every discovered module.
///
/// Holds exactly one entry per module; once built it is only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<ModuleName, BTreeSet<ModuleName>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the direct dependencies of `module`. Returns `false` if the
    /// module already had an entry, in which case the graph is unchanged.
    pub fn insert(&mut self, module: ModuleName, dependencies: BTreeSet<ModuleName>) -> bool {
        match self.edges.entry(module) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(dependencies);
                true
            }
        }
    }

    pub fn direct_dependencies(&self, module: &str) -> Option<&BTreeSet<ModuleName>> {
        self.edges.get(module)
    }

    /// Modules in lexicographic order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleName> {
        self.edges.keys()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<(ModuleName, BTreeSet<ModuleName>)> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = (ModuleName, BTreeSet<ModuleName>)>>(iter: T) -> Self {
        let mut graph = DependencyGraph::new();
        for (module, dependencies) in iter {
            graph.insert(module, dependencies);
        }
        graph
    }
}
