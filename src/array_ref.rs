use crate::array::{Access, ReadOnly, ReadWrite};
use crate::array_impl::ArrayImpl;
use crate::dtype::{DType, Element};
use crate::error::{NdResult, ShapeErrorKind};
use crate::layout::{zip, Layout};
use std::fmt;
use std::marker::PhantomData;

/// Element-level access to the memory of a view, valid for `'a`.
///
/// Obtained from [`ArrayBase::deep`](crate::ArrayBase::deep) or
/// [`Array::deep_mut`](crate::Array::deep_mut). Elements are read and
/// written by value, so foreign memory need not be aligned for `T`.
pub struct ArrayRefBase<'a, T, const N: usize, const C: isize, A> {
    imp: ArrayImpl<N>,
    _marker: PhantomData<(&'a T, A)>,
}

pub type ArrayRef<'a, T, const N: usize, const C: isize> = ArrayRefBase<'a, T, N, C, ReadWrite>;

pub type ConstArrayRef<'a, T, const N: usize, const C: isize> =
    ArrayRefBase<'a, T, N, C, ReadOnly>;

impl<'a, T: Element, const N: usize, const C: isize, A: Access> ArrayRefBase<'a, T, N, C, A> {
    pub(crate) fn new(imp: ArrayImpl<N>) -> Self {
        ArrayRefBase {
            imp,
            _marker: PhantomData,
        }
    }

    pub fn shape(&self) -> &[usize; N] {
        self.imp.layout().shape()
    }

    pub fn strides(&self) -> &[isize; N] {
        self.imp.layout().strides()
    }

    pub fn layout(&self) -> &Layout<N> {
        self.imp.layout()
    }

    pub fn dtype(&self) -> DType {
        self.imp.dtype()
    }

    pub fn len(&self) -> usize {
        self.imp.layout().size()
    }

    pub fn is_empty(&self) -> bool {
        self.imp.layout().is_empty()
    }

    pub fn get(&self, index: [usize; N]) -> Option<T> {
        let p = self.imp.element_ptr(&index).ok()?;
        Some(unsafe { (p as *const T).read_unaligned() })
    }

    /// Elements in logical row-major order, whatever the strides.
    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter {
            imp: &self.imp,
            next: self.imp.layout().first_index(),
            _marker: PhantomData,
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Elementwise comparison; views of different shapes are never equal.
    pub fn deep_eq<const D: isize, B: Access>(&self, other: &ArrayRefBase<'_, T, N, D, B>) -> bool {
        self.shape() == other.shape() && zip(self.iter(), other.iter()).all(|(a, b)| a == b)
    }
}

impl<'a, T: Element, const N: usize, const C: isize> ArrayRef<'a, T, N, C> {
    pub fn set(&mut self, index: [usize; N], value: T) -> NdResult<()> {
        let p = self.imp.element_ptr(&index)?;
        unsafe { (p as *mut T).write_unaligned(value) };
        Ok(())
    }

    pub fn fill(&mut self, value: T) {
        let layout = *self.imp.layout();
        let mut ix = layout.first_index();
        while let Some(i) = ix {
            if let Ok(p) = self.imp.element_ptr(&i) {
                unsafe { (p as *mut T).write_unaligned(value) };
            }
            ix = layout.next_index(i);
        }
    }

    /// Copies `src` element by element into `self`.
    pub fn assign<const D: isize, B: Access>(
        &mut self,
        src: &ArrayRefBase<'_, T, N, D, B>,
    ) -> NdResult<()> {
        if self.shape() != src.shape() {
            return Err(ShapeErrorKind::ShapeMismatch {
                lhs: self.shape().to_vec(),
                rhs: src.shape().to_vec(),
            }
            .into());
        }
        let layout = *self.imp.layout();
        let mut ix = layout.first_index();
        while let Some(i) = ix {
            let from = src.imp.element_ptr(&i)? as *const T;
            let to = self.imp.element_ptr(&i)? as *mut T;
            unsafe { to.write_unaligned(from.read_unaligned()) };
            ix = layout.next_index(i);
        }
        Ok(())
    }
}

impl<'a, T: Element, const N: usize, const C: isize, A: Access> fmt::Debug
    for ArrayRefBase<'a, T, N, C, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if A::WRITABLE { "ArrayRef" } else { "ConstArrayRef" };
        f.debug_struct(name)
            .field("shape", self.shape())
            .field("data", &self.to_vec())
            .finish()
    }
}

pub struct Iter<'a, T, const N: usize> {
    imp: &'a ArrayImpl<N>,
    next: Option<[usize; N]>,
    _marker: PhantomData<T>,
}

impl<'a, T: Element, const N: usize> Iterator for Iter<'a, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = self.next?;
        self.next = self.imp.layout().next_index(index);
        let p = self.imp.element_ptr(&index).ok()?;
        Some(unsafe { (p as *const T).read_unaligned() })
    }
}
