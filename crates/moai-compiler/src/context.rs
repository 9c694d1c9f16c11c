//! Layered index bindings.

use moai_core::{IndexSnapshot, IndexValue};

/// Maps index-variable names to set elements during evaluation.
///
/// Contexts are persistent: [`child`](Self::child) layers new bindings on
/// top of a borrowed parent, and dropping the child restores the parent's
/// view. Inner bindings shadow outer ones with the same name.
#[derive(Debug, Clone, Default)]
pub struct IndexContext<'a> {
    parent: Option<&'a IndexContext<'a>>,
    bindings: Vec<(&'a str, IndexValue)>,
}

impl<'a> IndexContext<'a> {
    /// An empty context with no bindings.
    pub fn root() -> Self {
        Self::default()
    }

    /// Layers `bindings` on top of this context.
    ///
    /// The child lives no longer than the borrow of its parent.
    pub fn child<'b, I>(&'b self, bindings: I) -> IndexContext<'b>
    where
        'a: 'b,
        I: IntoIterator<Item = (&'b str, IndexValue)>,
    {
        IndexContext {
            parent: Some(self),
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Looks up a name, innermost binding first.
    pub fn get(&self, name: &str) -> Option<&IndexValue> {
        // Later bindings within one layer shadow earlier ones.
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .or_else(|| self.parent.and_then(|p| p.get(name)))
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.parent.map_or(true, |p| p.is_empty())
    }

    /// Copies the visible bindings, outermost first, for error reports.
    pub fn snapshot(&self) -> IndexSnapshot {
        let mut layers = Vec::new();
        let mut current = Some(self);
        while let Some(ctx) = current {
            layers.push(ctx);
            current = ctx.parent;
        }

        let mut entries: Vec<(String, IndexValue)> = Vec::new();
        for ctx in layers.iter().rev() {
            for (name, value) in &ctx.bindings {
                match entries.iter_mut().find(|(n, _)| n == name) {
                    Some(entry) => entry.1 = value.clone(),
                    None => entries.push((name.to_string(), value.clone())),
                }
            }
        }
        IndexSnapshot(entries)
    }
}
