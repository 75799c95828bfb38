// This file is part of qsh, an extended POSIX shell.
// Copyright (C) 2026 The qsh developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Bulk ownership of AST nodes.
//!
//! An [`Arena`] owns every node allocated through it and destroys them all at
//! once, in reverse allocation order, when the arena is dropped. Nodes are
//! addressed through [`Handle`]s: plain non-owning pointers that are `Copy`
//! and freely shareable within the thread.
//!
//! # Safety contract
//!
//! A handle is valid exactly as long as the arena that allocated it (or, after
//! a [`merge`](Arena::merge), the arena that absorbed it) is alive. The
//! parser, the AST, and the tests all hold handles strictly within the
//! lifetime of the owning arena; dereferencing a handle after its arena is
//! gone is undefined behavior, the same contract a raw pointer arena has in
//! any systems language. Handles are not `Send` or `Sync`, so the contract is
//! single-threaded.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

/// Bulk owner of AST node allocations.
#[derive(Default)]
pub struct Arena {
    allocations: RefCell<Vec<Box<dyn Any>>>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Arena {
        Arena::default()
    }

    /// Number of live allocations in this arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocations.borrow().len()
    }

    /// Tests if this arena has no allocations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.borrow().is_empty()
    }

    /// Moves a value into the arena and returns a handle to it.
    ///
    /// The value lives until the arena is dropped. Values are dropped in
    /// reverse allocation order.
    pub fn alloc<T: 'static>(&self, value: T) -> Handle<T> {
        let boxed = Box::new(value);
        // The box gives the value a stable heap address; pushing more boxes
        // later never moves it.
        let ptr = NonNull::from(&*boxed);
        self.allocations.borrow_mut().push(boxed);
        Handle {
            ptr,
            _arena: PhantomData,
        }
    }

    /// Takes ownership of every allocation of `other`, leaving it empty.
    ///
    /// Handles into `other` remain valid and are now backed by `self`.
    /// Taking `other` by value makes the compiler reject a merge while a
    /// borrow of `other` is still live elsewhere.
    pub fn merge(&self, other: Arena) {
        let mut own = self.allocations.borrow_mut();
        own.append(&mut other.allocations.borrow_mut());
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let mut allocations = self.allocations.borrow_mut();
        while let Some(allocation) = allocations.pop() {
            drop(allocation);
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Non-owning pointer to a value allocated in an [`Arena`].
///
/// Handles are `Copy`, compare by address, and dereference to the value. See
/// the [module documentation](self) for the validity contract.
pub struct Handle<T> {
    ptr: NonNull<T>,
    _arena: PhantomData<*const T>,
}

impl<T: 'static> Handle<T> {
    /// Erases the static type, keeping the dynamic one.
    #[must_use]
    pub fn erase(self) -> DynHandle {
        // SAFETY: the handle contract guarantees the pointee is alive.
        let any: &dyn Any = unsafe { self.ptr.as_ref() };
        DynHandle {
            ptr: NonNull::from(any),
            _arena: PhantomData,
        }
    }

    /// Tests if two handles refer to the same allocation.
    #[must_use]
    pub fn same(self, other: Handle<T>) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the handle contract guarantees the pointee is alive; the
        // arena never hands out mutable access.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Handle<T> {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

/// Type-erased [`Handle`] supporting a checked downcast.
#[derive(Clone, Copy)]
pub struct DynHandle {
    ptr: NonNull<dyn Any>,
    _arena: PhantomData<*const ()>,
}

impl DynHandle {
    /// Downcasts back to a typed handle if the dynamic type matches.
    #[must_use]
    pub fn downcast<T: 'static>(self) -> Option<Handle<T>> {
        // SAFETY: the handle contract guarantees the pointee is alive.
        let any: &dyn Any = unsafe { self.ptr.as_ref() };
        any.downcast_ref::<T>().map(|value| Handle {
            ptr: NonNull::from(value),
            _arena: PhantomData,
        })
    }

    /// Tests if the dynamic type of the pointee is `T`.
    #[must_use]
    pub fn is<T: 'static>(self) -> bool {
        // SAFETY: the handle contract guarantees the pointee is alive.
        unsafe { self.ptr.as_ref() }.is::<T>()
    }
}

impl fmt::Debug for DynHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynHandle").finish_non_exhaustive()
    }
}
