use crate::error::{NdError, NdResult};
use crate::manager::Manager;
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;
use std::sync::Arc;

/// A zero-initialised heap block freed on drop.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

// The block is uniquely owned; moving it between threads only moves the
// right to free it.
unsafe impl Send for RawBuffer {}

impl RawBuffer {
    pub(crate) fn allocate(nbytes: usize, align: usize) -> NdResult<RawBuffer> {
        if !align.is_power_of_two() {
            return Err(NdError::InvalidAlignment(align));
        }
        // with a valid alignment the only failure left is an oversized block
        let layout =
            Layout::from_size_align(nbytes, align).map_err(|_| NdError::OutOfMemory { nbytes, align })?;
        let ptr = if layout.size() == 0 {
            // never dereferenced; only needs to be non-null and aligned
            unsafe { NonNull::new_unchecked(align as *mut u8) }
        } else {
            let ptr = unsafe { alloc_zeroed(layout) };
            match NonNull::new(ptr) {
                Some(ptr) => ptr,
                None => return Err(NdError::OutOfMemory { nbytes, align }),
            }
        };
        log::debug!("allocated {} bytes at {:p} (align {})", nbytes, ptr, align);
        Ok(RawBuffer { ptr, layout })
    }

    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    /// Hands the block to a new [`Manager`], which frees it on release.
    pub(crate) fn into_manager(self) -> (*mut u8, Arc<Manager>) {
        let ptr = self.as_ptr();
        (ptr, Manager::holding(self))
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            log::trace!("freeing {} bytes at {:p}", self.len(), self.ptr);
            unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
        }
    }
}
