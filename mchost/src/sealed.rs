//! Fields fixed for the lifetime of the object that owns them

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot assign final field '{0}'")]
pub struct FinalFieldError(pub &'static str);

/// A field that can only be written while explicitly unsealed
///
/// Reads are always allowed and return a clone of the current value.
#[derive(Debug)]
pub struct Final<T> {
    name: &'static str,
    value: RwLock<T>,
    sealed: AtomicBool,
}

impl<T: Clone> Final<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value: RwLock::new(value),
            sealed: AtomicBool::new(true),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    pub fn set(&self, value: T) -> Result<(), FinalFieldError> {
        if self.is_sealed() {
            return Err(FinalFieldError(self.name));
        }
        *self.value.write() = value;
        Ok(())
    }

    /// Lift the seal until the returned guard is dropped
    pub fn unseal(&self) -> Unsealed<'_, T> {
        self.sealed.store(false, Ordering::Release);
        Unsealed { field: self }
    }
}

pub struct Unsealed<'a, T: Clone> {
    field: &'a Final<T>,
}

impl<T: Clone> Unsealed<'_, T> {
    pub fn set(&self, value: T) -> Result<(), FinalFieldError> {
        self.field.set(value)
    }
}

impl<T: Clone> Drop for Unsealed<'_, T> {
    fn drop(&mut self) {
        self.field.sealed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_unseal() {
        let field = Final::new("dispatcher", 1);
        assert_eq!(field.set(2), Err(FinalFieldError("dispatcher")));
        {
            let guard = field.unseal();
            assert!(!field.is_sealed());
            guard.set(3).unwrap();
        }
        assert!(field.is_sealed());
        assert_eq!(field.get(), 3);
        assert!(field.set(4).is_err());
    }
}
