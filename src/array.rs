//! Typed views over an [`ArrayImpl`].
//!
//! `ArrayBase<T, N, C, A>` fixes the element type `T`, the rank `N`, the
//! contiguity class `C` and the element access `A` at compile time:
//!
//! - `C > 0`: the last `C` dimensions are packed row-major,
//! - `C < 0`: the first `-C` dimensions are packed column-major,
//! - `C == 0`: nothing is promised.
//!
//! [`Array`] allows writes through its elements, [`ConstArray`] does not.
//! Converting `Array -> ConstArray` is free; the way back is
//! [`ConstArray::cast_mut_unchecked`].

use crate::array_impl::ArrayImpl;
use crate::array_ref::ArrayRefBase;
use crate::dtype::{DType, Element};
use crate::error::{NdError, NdResult, ShapeErrorKind};
use crate::layout::{ClassInRange, Contiguity, DropsOneAxis, Implies, Layout, MemoryOrder, Slice};
use crate::manager::Manager;
use num_traits::{One, Zero};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::sync::Arc;

mod private {
    pub trait Sealed {}
}

/// Element access granted by a view.
pub trait Access: private::Sealed + 'static {
    const WRITABLE: bool;
}

/// Elements may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWrite;

/// Elements may only be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOnly;

impl private::Sealed for ReadWrite {}
impl private::Sealed for ReadOnly {}

impl Access for ReadWrite {
    const WRITABLE: bool = true;
}

impl Access for ReadOnly {
    const WRITABLE: bool = false;
}

pub struct ArrayBase<T, const N: usize, const C: isize, A> {
    imp: ArrayImpl<N>,
    _marker: PhantomData<(T, A)>,
}

pub type Array<T, const N: usize, const C: isize> = ArrayBase<T, N, C, ReadWrite>;

pub type ConstArray<T, const N: usize, const C: isize> = ArrayBase<T, N, C, ReadOnly>;

/// Allocation settings. Unset fields fall back to the element's natural
/// descriptor and alignment and to the class's default memory order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayOptions {
    pub order: Option<MemoryOrder>,
    pub dtype: Option<DType>,
    pub align: Option<usize>,
}

impl ArrayOptions {
    pub fn order(mut self, order: MemoryOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn align(mut self, align: usize) -> Self {
        self.align = Some(align);
        self
    }
}

fn check_order(c: isize, order: MemoryOrder) -> NdResult<()> {
    if c != 0 && order != MemoryOrder::default_for(c) {
        return Err(NdError::Noncontiguous(format!(
            "memory order {:?} incompatible with contiguity class {}",
            order, c
        )));
    }
    Ok(())
}

impl<T: Element, const N: usize, const C: isize, A: Access> ArrayBase<T, N, C, A> {
    fn from_impl(imp: ArrayImpl<N>) -> Self {
        let () = ClassInRange::<N, C>::OK;
        ArrayBase {
            imp,
            _marker: PhantomData,
        }
    }

    pub(crate) fn checked(imp: ArrayImpl<N>) -> NdResult<Self> {
        imp.layout().check_contiguity(C, imp.dtype().nbytes())?;
        Ok(Self::from_impl(imp))
    }

    unsafe fn wrap_ordered(
        ptr: *mut u8,
        shape: [usize; N],
        order: MemoryOrder,
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        dtype.check_element::<T>()?;
        check_order(C, order)?;
        let layout = Layout::contiguous(shape, order, dtype.nbytes())?;
        Ok(Self::from_impl(ArrayImpl::wrap(ptr, layout, manager, dtype)))
    }

    unsafe fn wrap_layout(
        ptr: *mut u8,
        layout: Layout<N>,
        manager: Option<Arc<Manager>>,
        dtype: DType,
        check: bool,
    ) -> NdResult<Self> {
        dtype.check_element::<T>()?;
        layout.validate(dtype.nbytes())?;
        let imp = ArrayImpl::wrap(ptr, layout, manager, dtype);
        if check {
            Self::checked(imp)
        } else {
            log::debug!(
                "skipping contiguity check for class {} over strides {:?}",
                C,
                layout.strides()
            );
            Ok(Self::from_impl(imp))
        }
    }

    fn derived<const M: usize, const D: isize>(
        &self,
        offset: isize,
        layout: Layout<M>,
    ) -> NdResult<ArrayBase<T, M, D, A>> {
        ArrayBase::checked(self.imp.derive(offset, layout))
    }

    pub fn shape(&self) -> &[usize; N] {
        self.imp.layout().shape()
    }

    /// Strides in bytes.
    pub fn strides(&self) -> &[isize; N] {
        self.imp.layout().strides()
    }

    /// Strides in elements, if every byte stride is a whole number of
    /// elements.
    pub fn element_strides(&self) -> Option<[isize; N]> {
        self.imp.layout().element_strides(self.imp.dtype().nbytes())
    }

    pub fn layout(&self) -> &Layout<N> {
        self.imp.layout()
    }

    pub fn dtype(&self) -> DType {
        self.imp.dtype()
    }

    pub fn as_ptr(&self) -> *const T {
        self.imp.buffer() as *const T
    }

    pub fn manager(&self) -> Option<&Arc<Manager>> {
        self.imp.manager()
    }

    /// Number of live references to this view's manager, 0 if it has none.
    pub fn manager_count(&self) -> usize {
        self.imp.manager().map_or(0, Arc::strong_count)
    }

    pub fn contiguity(&self) -> Contiguity {
        self.imp.layout().contiguity(self.imp.dtype().nbytes())
    }

    pub fn is_contiguous(&self, c: isize) -> bool {
        self.contiguity().satisfies(c)
    }

    pub fn rank(&self) -> usize {
        N
    }

    pub fn size(&self) -> usize {
        self.imp.layout().size()
    }

    pub fn is_empty(&self) -> bool {
        self.imp.layout().is_empty()
    }

    /// Address of the element at `index`.
    pub fn element_ptr(&self, index: [usize; N]) -> NdResult<*const T> {
        self.imp.element_ptr(&index).map(|p| p as *const T)
    }

    /// Reinterprets the view under a weaker contiguity class. Fails to
    /// compile when `C` does not imply `D`.
    pub fn relax<const D: isize>(&self) -> ArrayBase<T, N, D, A> {
        let () = Implies::<N, C, D>::OK;
        ArrayBase::from_impl(self.imp.clone())
    }

    /// Reinterprets the view under class `D`, checking the layout.
    pub fn try_contiguity<const D: isize>(&self) -> NdResult<ArrayBase<T, N, D, A>> {
        ArrayBase::checked(self.imp.clone())
    }

    /// Reinterprets the view under class `D` without checking the layout.
    ///
    /// # Safety
    ///
    /// The layout must satisfy `D`; code relying on the class may otherwise
    /// read or write outside the view.
    pub unsafe fn assume_contiguity<const D: isize>(&self) -> ArrayBase<T, N, D, A> {
        log::debug!("assuming contiguity class {} for strides {:?}", D, self.strides());
        ArrayBase::from_impl(self.imp.clone())
    }

    /// Restricts `axis` to `s`. A unit step along an outer axis keeps the
    /// class; a non-unit step breaks packing at and inside `axis`, so ask for
    /// a weaker `D` there. Fails with [`NdError::Noncontiguous`] when the
    /// result does not satisfy `D`.
    pub fn slice<const D: isize>(
        &self,
        axis: usize,
        s: impl Into<Slice>,
    ) -> NdResult<ArrayBase<T, N, D, A>> {
        let (offset, layout) = self.imp.layout().slice(axis, s.into())?;
        self.derived(offset, layout)
    }

    /// The `M = N - 1` dimensional view at `index` along `axis`.
    pub fn index_axis<const M: usize, const D: isize>(
        &self,
        axis: usize,
        index: usize,
    ) -> NdResult<ArrayBase<T, M, D, A>> {
        let () = DropsOneAxis::<N, M>::OK;
        let (offset, layout) = self.imp.layout().index_axis::<M>(axis, index)?;
        self.derived(offset, layout)
    }

    /// Removes a unit-extent `axis`.
    pub fn squeeze<const M: usize, const D: isize>(
        &self,
        axis: usize,
    ) -> NdResult<ArrayBase<T, M, D, A>> {
        let () = DropsOneAxis::<N, M>::OK;
        let layout = self.imp.layout().squeeze::<M>(axis)?;
        self.derived(0, layout)
    }

    /// Reorders the axes: axis `i` of the result is axis `perm[i]` of `self`.
    pub fn permute<const D: isize>(&self, perm: [usize; N]) -> NdResult<ArrayBase<T, N, D, A>> {
        let layout = self.imp.layout().permute(perm)?;
        self.derived(0, layout)
    }

    /// Reverses the axes. A row-major class `C` becomes column-major `-C`.
    pub fn transpose<const D: isize>(&self) -> NdResult<ArrayBase<T, N, D, A>> {
        self.derived(0, self.imp.layout().reversed())
    }

    /// Borrows the elements for reading.
    ///
    /// # Safety
    ///
    /// No other view may write to the addressed memory while the returned
    /// handle is alive.
    pub unsafe fn deep(&self) -> ArrayRefBase<'_, T, N, C, ReadOnly> {
        ArrayRefBase::new(self.imp.borrowed())
    }
}

impl<T: Element, const N: usize, const C: isize> Array<T, N, C> {
    pub fn allocate(shape: [usize; N]) -> NdResult<Self> {
        Self::allocate_with(shape, ArrayOptions::default())
    }

    pub fn allocate_with(shape: [usize; N], options: ArrayOptions) -> NdResult<Self> {
        let order = options.order.unwrap_or(MemoryOrder::default_for(C));
        check_order(C, order)?;
        let dtype = options.dtype.unwrap_or_else(DType::of::<T>);
        dtype.check_element::<T>()?;
        let align = options.align.unwrap_or(0).max(mem::align_of::<T>());
        let imp = ArrayImpl::allocate(shape, order, dtype, align)?;
        Ok(Self::from_impl(imp))
    }

    pub fn full(shape: [usize; N], value: T) -> NdResult<Self> {
        let mut a = Self::allocate(shape)?;
        // freshly allocated, so this is the only view of the buffer
        unsafe { a.deep_mut().fill(value) };
        Ok(a)
    }

    pub fn zeros(shape: [usize; N]) -> NdResult<Self>
    where
        T: Zero,
    {
        Self::full(shape, T::zero())
    }

    pub fn ones(shape: [usize; N]) -> NdResult<Self>
    where
        T: One,
    {
        Self::full(shape, T::one())
    }

    /// Adopts `v` without copying; the vector is dropped with the last view.
    pub fn from_vec(mut v: Vec<T>, shape: [usize; N]) -> NdResult<Self> {
        let dtype = DType::of::<T>();
        let order = MemoryOrder::default_for(C);
        let layout = Layout::contiguous(shape, order, dtype.nbytes())?;
        if layout.size() != v.len() {
            return Err(ShapeErrorKind::InvalidShape(format!(
                "{} elements cannot fill shape {:?}",
                v.len(),
                shape
            ))
            .into());
        }
        let ptr = v.as_mut_ptr() as *mut u8;
        let manager = Manager::holding(v);
        Ok(Self::from_impl(ArrayImpl::wrap(
            ptr,
            layout,
            Some(manager),
            dtype,
        )))
    }

    /// Views `shape` elements packed in the class's default order at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes over the whole layout for
    /// as long as `manager` (or, without one, the caller) keeps it alive.
    pub unsafe fn wrap(
        ptr: *mut T,
        shape: [usize; N],
        manager: Option<Arc<Manager>>,
    ) -> NdResult<Self> {
        Self::wrap_ordered(
            ptr as *mut u8,
            shape,
            MemoryOrder::default_for(C),
            manager,
            DType::of::<T>(),
        )
    }

    /// # Safety
    ///
    /// See [`Array::wrap`].
    pub unsafe fn wrap_with_order(
        ptr: *mut T,
        shape: [usize; N],
        order: MemoryOrder,
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        Self::wrap_ordered(ptr as *mut u8, shape, order, manager, dtype)
    }

    /// Views memory with explicit byte `strides`, checking them against the
    /// contiguity class.
    ///
    /// # Safety
    ///
    /// See [`Array::wrap`].
    pub unsafe fn wrap_strided(
        ptr: *mut T,
        shape: [usize; N],
        strides: [isize; N],
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        let layout = Layout::strided(shape, strides);
        Self::wrap_layout(ptr as *mut u8, layout, manager, dtype, true)
    }

    /// Like [`Array::wrap_strided`], but takes the contiguity class on faith.
    ///
    /// # Safety
    ///
    /// See [`Array::wrap`]; in addition the strides must satisfy `C`.
    pub unsafe fn wrap_strided_unchecked(
        ptr: *mut T,
        shape: [usize; N],
        strides: [isize; N],
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        let layout = Layout::strided(shape, strides);
        Self::wrap_layout(ptr as *mut u8, layout, manager, dtype, false)
    }

    pub fn as_mut_ptr(&self) -> *mut T {
        self.imp.buffer() as *mut T
    }

    pub fn element_ptr_mut(&self, index: [usize; N]) -> NdResult<*mut T> {
        self.imp.element_ptr(&index).map(|p| p as *mut T)
    }

    pub fn into_const(self) -> ConstArray<T, N, C> {
        ArrayBase::from_impl(self.imp)
    }

    pub fn as_const(&self) -> ConstArray<T, N, C> {
        ArrayBase::from_impl(self.imp.clone())
    }

    /// Borrows the elements for reading and writing.
    ///
    /// # Safety
    ///
    /// No other view may access the addressed memory while the returned
    /// handle is alive.
    pub unsafe fn deep_mut(&mut self) -> ArrayRefBase<'_, T, N, C, ReadWrite> {
        ArrayRefBase::new(self.imp.borrowed())
    }
}

impl<T: Element, const N: usize, const C: isize> ConstArray<T, N, C> {
    /// # Safety
    ///
    /// `ptr` must be valid for reads over the whole layout for as long as
    /// `manager` (or, without one, the caller) keeps it alive.
    pub unsafe fn wrap(
        ptr: *const T,
        shape: [usize; N],
        manager: Option<Arc<Manager>>,
    ) -> NdResult<Self> {
        Self::wrap_ordered(
            ptr as *mut u8,
            shape,
            MemoryOrder::default_for(C),
            manager,
            DType::of::<T>(),
        )
    }

    /// # Safety
    ///
    /// See [`ConstArray::wrap`].
    pub unsafe fn wrap_with_order(
        ptr: *const T,
        shape: [usize; N],
        order: MemoryOrder,
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        Self::wrap_ordered(ptr as *mut u8, shape, order, manager, dtype)
    }

    /// # Safety
    ///
    /// See [`ConstArray::wrap`].
    pub unsafe fn wrap_strided(
        ptr: *const T,
        shape: [usize; N],
        strides: [isize; N],
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        let layout = Layout::strided(shape, strides);
        Self::wrap_layout(ptr as *mut u8, layout, manager, dtype, true)
    }

    /// # Safety
    ///
    /// See [`ConstArray::wrap`]; in addition the strides must satisfy `C`.
    pub unsafe fn wrap_strided_unchecked(
        ptr: *const T,
        shape: [usize; N],
        strides: [isize; N],
        manager: Option<Arc<Manager>>,
        dtype: DType,
    ) -> NdResult<Self> {
        let layout = Layout::strided(shape, strides);
        Self::wrap_layout(ptr as *mut u8, layout, manager, dtype, false)
    }

    /// Grants write access to a read-only view.
    ///
    /// # Safety
    ///
    /// The memory must actually be writable, and the caller must have
    /// established that nothing else reads or writes it concurrently.
    pub unsafe fn cast_mut_unchecked(self) -> Array<T, N, C> {
        ArrayBase::from_impl(self.imp)
    }
}

impl<T: Element, const N: usize, const C: isize> From<Array<T, N, C>> for ConstArray<T, N, C> {
    fn from(a: Array<T, N, C>) -> Self {
        a.into_const()
    }
}

impl<T, const N: usize, const C: isize, A> Clone for ArrayBase<T, N, C, A> {
    fn clone(&self) -> Self {
        ArrayBase {
            imp: self.imp.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, const N: usize, const C: isize, const D: isize, A, B> PartialEq<ArrayBase<T, N, D, B>>
    for ArrayBase<T, N, C, A>
{
    fn eq(&self, other: &ArrayBase<T, N, D, B>) -> bool {
        self.imp == other.imp
    }
}

impl<T, const N: usize, const C: isize, A> Eq for ArrayBase<T, N, C, A> {}

impl<T, const N: usize, const C: isize, A: Access> fmt::Debug for ArrayBase<T, N, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if A::WRITABLE { "Array" } else { "ConstArray" };
        f.debug_struct(name)
            .field("ptr", &self.imp.buffer())
            .field("shape", self.imp.layout().shape())
            .field("strides", self.imp.layout().strides())
            .field("dtype", &format_args!("{}", self.imp.dtype()))
            .field("contiguity", &C)
            .finish()
    }
}
