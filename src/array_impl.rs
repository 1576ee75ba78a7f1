use crate::buffer::RawBuffer;
use crate::dtype::DType;
use crate::error::NdResult;
use crate::layout::{zip, Layout, MemoryOrder};
use crate::manager::Manager;
use rawpointer::PointerExt;
use std::ptr;
use std::sync::Arc;

/// Pointer, element descriptor, geometry and lifetime holder of a view.
///
/// Every view type is a thin typed wrapper over this struct. Cloning is
/// shallow: the pointer, descriptor and layout are copied and the manager's
/// reference count goes up by one.
#[derive(Debug, Clone)]
pub(crate) struct ArrayImpl<const N: usize> {
    buffer: *mut u8,
    layout: Layout<N>,
    dtype: DType,
    manager: Option<Arc<Manager>>,
}

// Only metadata is shared; the pointee is never touched without the caller
// going through an `unsafe` accessor.
unsafe impl<const N: usize> Send for ArrayImpl<N> {}
unsafe impl<const N: usize> Sync for ArrayImpl<N> {}

impl<const N: usize> ArrayImpl<N> {
    pub(crate) fn allocate(
        shape: [usize; N],
        order: MemoryOrder,
        dtype: DType,
        align: usize,
    ) -> NdResult<ArrayImpl<N>> {
        let layout = Layout::contiguous(shape, order, dtype.nbytes())?;
        let raw = RawBuffer::allocate(layout.footprint(dtype.nbytes()), align)?;
        let (buffer, manager) = raw.into_manager();
        Ok(ArrayImpl {
            buffer,
            layout,
            dtype,
            manager: Some(manager),
        })
    }

    pub(crate) fn wrap(
        buffer: *mut u8,
        layout: Layout<N>,
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> ArrayImpl<N> {
        ArrayImpl {
            buffer,
            layout,
            dtype,
            manager,
        }
    }

    /// Shares this implementation's memory and manager under a new layout
    /// whose base element sits `offset` bytes from the current one.
    pub(crate) fn derive<const M: usize>(&self, offset: isize, layout: Layout<M>) -> ArrayImpl<M> {
        ArrayImpl {
            buffer: self.buffer.wrapping_offset(offset),
            layout,
            dtype: self.dtype,
            manager: self.manager.clone(),
        }
    }

    /// Same memory and geometry with no lifetime responsibility.
    pub(crate) fn borrowed(&self) -> ArrayImpl<N> {
        ArrayImpl {
            buffer: self.buffer,
            layout: self.layout,
            dtype: self.dtype,
            manager: None,
        }
    }

    pub(crate) fn buffer(&self) -> *mut u8 {
        self.buffer
    }

    pub(crate) fn layout(&self) -> &Layout<N> {
        &self.layout
    }

    pub(crate) fn dtype(&self) -> DType {
        self.dtype
    }

    pub(crate) fn manager(&self) -> Option<&Arc<Manager>> {
        self.manager.as_ref()
    }

    pub(crate) fn element_ptr(&self, index: &[usize; N]) -> NdResult<*mut u8> {
        self.layout.check_index(index)?;
        let mut p = self.buffer;
        for (&i, &s) in zip(index.iter(), self.layout.strides().iter()) {
            // the index is in bounds, so the result stays inside the footprint
            p = unsafe { p.stride_offset(s, i) };
        }
        Ok(p)
    }
}

impl<const N: usize> PartialEq for ArrayImpl<N> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.buffer, other.buffer) && self.layout == other.layout && self.dtype == other.dtype
    }
}

impl<const N: usize> Eq for ArrayImpl<N> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate() {
        let a = ArrayImpl::allocate([3, 4], MemoryOrder::RowMajor, DType::of::<f64>(), 8).unwrap();
        assert_eq!(a.layout().strides(), &[32, 8]);
        assert_eq!(Arc::strong_count(a.manager().unwrap()), 1);
        let b = a.clone();
        assert_eq!(Arc::strong_count(a.manager().unwrap()), 2);
        assert_eq!(a, b);
        let p = a.element_ptr(&[2, 1]).unwrap();
        assert_eq!(p as usize - a.buffer() as usize, 72);
        assert!(a.element_ptr(&[3, 0]).is_err());
    }

    #[test]
    fn test_derive_shares_manager() {
        let a = ArrayImpl::allocate([4], MemoryOrder::RowMajor, DType::of::<u32>(), 4).unwrap();
        let l = Layout::strided([2], [8]);
        let d = a.derive(4, l);
        assert_eq!(Arc::strong_count(a.manager().unwrap()), 2);
        assert_eq!(d.buffer() as usize, a.buffer() as usize + 4);
        assert_ne!(d.layout(), a.layout());
        let b = a.borrowed();
        assert!(b.manager().is_none());
        assert_eq!(b, a);
    }
}
