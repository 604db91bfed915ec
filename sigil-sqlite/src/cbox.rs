use std::ops::{Deref, DerefMut};

/// Owns a pointer handed out by sqlite and releases it with `dealloc` unless it is null.
#[derive(Debug)]
pub(crate) struct CBox<T> {
    pub(crate) ptr: *mut T,
    dealloc: fn(*mut T),
}

impl<T> CBox<T> {
    pub fn new(ptr: *mut T, dealloc: fn(*mut T)) -> Self {
        Self { ptr, dealloc }
    }
}

impl<T> Drop for CBox<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            (self.dealloc)(self.ptr);
        }
    }
}

impl<T> Deref for CBox<T> {
    type Target = *mut T;

    fn deref(&self) -> &Self::Target {
        &self.ptr
    }
}

impl<T> DerefMut for CBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ptr
    }
}

unsafe impl<T> Send for CBox<T> {}
unsafe impl<T> Sync for CBox<T> {}

#[cfg(test)]
mod tests {
    use super::CBox;
    use std::{
        ptr,
        sync::atomic::{AtomicUsize, Ordering},
    };

    static DESTROYED: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn cbox_raw_pointer() {
        let mut v = 123;
        {
            let ptr = CBox::new(ptr::null_mut::<i32>(), |_| {
                DESTROYED.fetch_add(1, Ordering::Relaxed);
            });
            assert!(ptr.is_null());
        }
        assert_eq!(DESTROYED.load(Ordering::Relaxed), 0);
        {
            let ptr = CBox::new(&mut v as *mut i32, |_| {
                DESTROYED.fetch_add(1, Ordering::Relaxed);
            });
            assert_eq!(unsafe { **ptr }, 123);
            assert_eq!(DESTROYED.load(Ordering::Relaxed), 0);
        }
        assert_eq!(DESTROYED.load(Ordering::Relaxed), 1);
    }
}
