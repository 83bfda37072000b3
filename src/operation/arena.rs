use crate::operation::table_object::TableObject;

/// Handle to an operation node in a [`TableArena`].
///
/// A `TableHandle` is a copyable index; two handles are the same node exactly
/// when they are equal. It is the runtime representation used inside
/// `Value::Table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableHandle(pub(crate) u32);

impl TableHandle {
    /// Returns the raw arena slot index backing this handle.
    pub fn index(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub fn new_for_test(index: u32) -> Self {
        Self(index)
    }
}

/// Append-only storage for the operation nodes built while evaluating one
/// query.
///
/// Nodes are never freed individually; the whole arena is dropped (or
/// consumed by assembly) once the query is compiled.
#[derive(Debug, Default)]
pub struct TableArena {
    objects: Vec<TableObject>,
}

impl TableArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node and returns a stable handle to it.
    ///
    /// Parents must already be in the arena, so handles always point
    /// backwards and the node graph cannot contain a cycle.
    pub fn alloc(&mut self, object: TableObject) -> TableHandle {
        debug_assert!(
            object
                .parents()
                .iter()
                .all(|parent| (parent.0 as usize) < self.objects.len()),
            "TableArena::alloc: parent handle from another arena"
        );
        let idx = self.objects.len() as u32;
        self.objects.push(object);
        TableHandle(idx)
    }

    /// Returns the node behind `handle`.
    ///
    /// Panics if the handle is out of bounds.
    pub fn get(&self, handle: TableHandle) -> &TableObject {
        self.try_get(handle)
            .unwrap_or_else(|| panic!("TableArena::get: invalid handle #{}", handle.0))
    }

    pub fn try_get(&self, handle: TableHandle) -> Option<&TableObject> {
        self.objects.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Consumes the arena, yielding nodes in allocation order.
    pub fn into_objects(self) -> Vec<TableObject> {
        self.objects
    }
}
