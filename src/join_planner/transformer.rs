//! Field transformers
//!
//! The planner never sees the caller's field objects. It reads each field
//! through [`FieldTransformer::read`] and, once the plan needs a join, writes
//! the alias-qualified id back through [`FieldTransformer::write`].

use crate::dataset_graph::JoinPath;

/// What the planner needs to know about one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRef {
    pub fid: String,
    /// `None` means the implicit default dataset.
    pub dataset: Option<String>,
    /// Path from the field's dataset to the view's base; empty when local.
    pub join_path: Vec<JoinPath>,
}

impl FieldRef {
    pub fn new(fid: impl Into<String>) -> Self {
        Self {
            fid: fid.into(),
            ..Default::default()
        }
    }

    pub fn in_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_path(mut self, join_path: Vec<JoinPath>) -> Self {
        self.join_path = join_path;
        self
    }
}

pub trait FieldTransformer {
    fn read(&self) -> FieldRef;

    fn write(&mut self, fid: String);
}

impl<T: FieldTransformer + ?Sized> FieldTransformer for &mut T {
    fn read(&self) -> FieldRef {
        (**self).read()
    }

    fn write(&mut self, fid: String) {
        (**self).write(fid)
    }
}

impl<T: FieldTransformer + ?Sized> FieldTransformer for Box<T> {
    fn read(&self) -> FieldRef {
        (**self).read()
    }

    fn write(&mut self, fid: String) {
        (**self).write(fid)
    }
}

/// A field owned in place: a `FieldRef` whose writes update its own `fid`.
impl FieldTransformer for FieldRef {
    fn read(&self) -> FieldRef {
        self.clone()
    }

    fn write(&mut self, fid: String) {
        self.fid = fid;
    }
}

/// Borrowed view over a field slot living inside some larger structure.
///
/// The id slot is borrowed mutably; dataset and path are borrowed from the
/// field that owns the slot, which for computed-field operands is the
/// computed field itself.
#[derive(Debug)]
pub struct FieldSlot<'a> {
    fid: &'a mut String,
    dataset: Option<&'a str>,
    join_path: &'a [JoinPath],
}

impl<'a> FieldSlot<'a> {
    pub fn new(fid: &'a mut String, dataset: Option<&'a str>, join_path: &'a [JoinPath]) -> Self {
        Self {
            fid,
            dataset,
            join_path,
        }
    }
}

impl FieldTransformer for FieldSlot<'_> {
    fn read(&self) -> FieldRef {
        FieldRef {
            fid: self.fid.clone(),
            dataset: self.dataset.map(str::to_string),
            join_path: self.join_path.to_vec(),
        }
    }

    fn write(&mut self, fid: String) {
        *self.fid = fid;
    }
}
