//! Resource registry: append-only handle tables.
//!
//! The program only ever sees integer handles. A handle is issued once, in
//! registration order, and stays valid for the life of the registry.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{HostError, HostResult};
use crate::font::FontFace;
use crate::sprite::Sprite;

/// Index into a `Registry<T>`. Handles of different kinds do not unify.
pub struct Handle<T> {
    index: usize,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

pub struct Registry<T> {
    kind: &'static str,
    items: Vec<T>,
}

impl<T> Registry<T> {
    pub fn new(kind: &'static str) -> Self {
        Registry {
            kind,
            items: Vec::new(),
        }
    }

    pub fn register(&mut self, item: T) -> Handle<T> {
        let index = self.items.len();
        self.items.push(item);
        tracing::debug!(kind = self.kind, index, "registered resource");
        Handle {
            index,
            _kind: PhantomData,
        }
    }

    /// Check a raw handle read back from a program value against the issued
    /// range.
    pub fn handle(&self, raw: i64) -> HostResult<Handle<T>> {
        match usize::try_from(raw) {
            Ok(index) if index < self.items.len() => Ok(Handle {
                index,
                _kind: PhantomData,
            }),
            _ => Err(HostError::UnknownHandle {
                kind: self.kind,
                handle: raw,
            }),
        }
    }

    pub fn resolve(&self, handle: Handle<T>) -> &T {
        // Items are never removed, so every issued index is in bounds.
        &self.items[handle.index]
    }

    pub fn lookup(&self, raw: i64) -> HostResult<&T> {
        self.handle(raw).map(|handle| self.resolve(handle))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The two resource tables owned by the process configuration.
pub struct Resources {
    pub images: Registry<Sprite>,
    pub fonts: Registry<FontFace>,
}

impl Resources {
    /// Empty image table; font table seeded with the built-in face at handle 0.
    pub fn new() -> Self {
        let mut fonts = Registry::new("font");
        fonts.register(FontFace::builtin());
        Resources {
            images: Registry::new("image"),
            fonts,
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}
