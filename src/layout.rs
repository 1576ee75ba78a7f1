use crate::error::{NdError, NdResult, ShapeErrorKind};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

#[cfg(test)]
use test_strategy::Arbitrary;

pub(crate) fn zip<I, J>(i: I, j: J) -> std::iter::Zip<I::IntoIter, J::IntoIter>
where
    I: IntoIterator,
    J: IntoIterator,
{
    i.into_iter().zip(j)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum MemoryOrder {
    RowMajor,
    ColMajor,
}

impl MemoryOrder {
    /// Order a view of contiguity class `c` is packed in: row-major for
    /// non-negative classes, column-major otherwise.
    pub const fn default_for(c: isize) -> MemoryOrder {
        if c >= 0 {
            MemoryOrder::RowMajor
        } else {
            MemoryOrder::ColMajor
        }
    }
}

/// Whether a view of rank `n` and class `c` can always be treated as class `d`.
pub const fn implies(n: usize, c: isize, d: isize) -> bool {
    d == 0
        || (c.signum() == d.signum() && d.unsigned_abs() <= c.unsigned_abs())
        || (n == 1 && c != 0)
}

pub(crate) struct ClassInRange<const N: usize, const C: isize>;

impl<const N: usize, const C: isize> ClassInRange<N, C> {
    pub(crate) const OK: () = assert!(
        C.unsigned_abs() <= N,
        "contiguity class exceeds the rank"
    );
}

pub(crate) struct Implies<const N: usize, const C: isize, const D: isize>;

impl<const N: usize, const C: isize, const D: isize> Implies<N, C, D> {
    pub(crate) const OK: () = assert!(
        implies(N, C, D),
        "contiguity class does not imply the target class"
    );
}

pub(crate) struct DropsOneAxis<const N: usize, const M: usize>;

impl<const N: usize, const M: usize> DropsOneAxis<N, M> {
    pub(crate) const OK: () = assert!(M + 1 == N, "result rank must be one less");
}

/// Number of dimensions packed without gaps, counted inward from each end.
///
/// `row` counts trailing dimensions (row-major packing), `col` counts
/// leading dimensions (column-major packing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contiguity {
    pub row: usize,
    pub col: usize,
}

impl Contiguity {
    pub fn satisfies(&self, c: isize) -> bool {
        if c > 0 {
            self.row >= c.unsigned_abs()
        } else if c < 0 {
            self.col >= c.unsigned_abs()
        } else {
            true
        }
    }
}

/// A `start..stop` range of one axis taken every `step` elements.
///
/// A negative step walks the same range from its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: usize,
    pub stop: Option<usize>,
    pub step: isize,
}

impl Slice {
    pub fn new(start: usize, stop: Option<usize>, step: isize) -> Slice {
        Slice { start, stop, step }
    }

    pub fn step_by(self, step: isize) -> Slice {
        Slice { step, ..self }
    }
}

impl From<Range<usize>> for Slice {
    fn from(r: Range<usize>) -> Self {
        Slice::new(r.start, Some(r.end), 1)
    }
}

impl From<RangeFrom<usize>> for Slice {
    fn from(r: RangeFrom<usize>) -> Self {
        Slice::new(r.start, None, 1)
    }
}

impl From<RangeTo<usize>> for Slice {
    fn from(r: RangeTo<usize>) -> Self {
        Slice::new(0, Some(r.end), 1)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::new(0, None, 1)
    }
}

#[inline]
fn scale(acc: isize, extent: usize) -> NdResult<isize> {
    isize::try_from(extent)
        .ok()
        .and_then(|e| acc.checked_mul(e))
        .ok_or(NdError::Shape(ShapeErrorKind::Overflow))
}

// extents above isize::MAX cannot be addressed anyway
#[inline]
fn clamp(extent: usize) -> isize {
    isize::try_from(extent).unwrap_or(isize::MAX)
}

#[inline]
fn byte_offset(stride: isize, index: usize) -> NdResult<isize> {
    isize::try_from(index)
        .ok()
        .and_then(|i| stride.checked_mul(i))
        .ok_or(NdError::Shape(ShapeErrorKind::Overflow))
}

/// Per-dimension extents and byte strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout<const N: usize> {
    shape: [usize; N],
    strides: [isize; N],
}

impl<const N: usize> Layout<N> {
    pub fn strided(shape: [usize; N], strides: [isize; N]) -> Layout<N> {
        Layout { shape, strides }
    }

    // [a, b, c] => row-major strides [b * c, c, 1] * nbytes
    pub fn contiguous(shape: [usize; N], order: MemoryOrder, nbytes: usize) -> NdResult<Layout<N>> {
        let mut strides = [0isize; N];
        let mut acc = scale(1, nbytes)?;
        match order {
            MemoryOrder::RowMajor => {
                for (s, &dim) in zip(strides.iter_mut(), shape.iter()).rev() {
                    *s = acc;
                    acc = scale(acc, dim)?;
                }
            }
            MemoryOrder::ColMajor => {
                for (s, &dim) in zip(strides.iter_mut(), shape.iter()) {
                    *s = acc;
                    acc = scale(acc, dim)?;
                }
            }
        }
        Ok(Layout { shape, strides })
    }

    pub(crate) fn from_slices(shape: &[usize], strides: &[isize]) -> NdResult<Layout<N>> {
        let shape: [usize; N] = shape.try_into().map_err(|_| ShapeErrorKind::RankMismatch {
            expected: N,
            got: shape.len(),
        })?;
        let strides: [isize; N] = strides.try_into().map_err(|_| ShapeErrorKind::RankMismatch {
            expected: N,
            got: strides.len(),
        })?;
        Ok(Layout { shape, strides })
    }

    pub fn shape(&self) -> &[usize; N] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        N
    }

    /// Number of elements, saturating at `usize::MAX`. Views built from raw
    /// parts are rejected when the exact count does not fit.
    pub fn size(&self) -> usize {
        self.checked_size().unwrap_or(usize::MAX)
    }

    pub fn checked_size(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        self.shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&d| d == 0)
    }

    /// Strides in units of elements, or `None` if some stride is not a
    /// multiple of `nbytes`.
    pub fn element_strides(&self, nbytes: usize) -> Option<[isize; N]> {
        let nbytes = isize::try_from(nbytes).ok().filter(|&n| n > 0)?;
        let mut out = [0isize; N];
        for (o, &s) in zip(out.iter_mut(), self.strides.iter()) {
            if s % nbytes != 0 {
                return None;
            }
            *o = s / nbytes;
        }
        Some(out)
    }

    pub fn contiguity(&self, nbytes: usize) -> Contiguity {
        if self.is_empty() {
            return Contiguity { row: N, col: N };
        }
        let nbytes = nbytes as isize;
        let mut row = 0;
        let mut expected = Some(nbytes);
        for (&s, &dim) in zip(self.strides.iter(), self.shape.iter()).rev() {
            if expected != Some(s) {
                break;
            }
            row += 1;
            expected = s.checked_mul(clamp(dim));
        }
        let mut col = 0;
        let mut expected = Some(nbytes);
        for (&s, &dim) in zip(self.strides.iter(), self.shape.iter()) {
            if expected != Some(s) {
                break;
            }
            col += 1;
            expected = s.checked_mul(clamp(dim));
        }
        Contiguity { row, col }
    }

    pub fn is_contiguous(&self, c: isize, nbytes: usize) -> bool {
        self.contiguity(nbytes).satisfies(c)
    }

    pub fn check_contiguity(&self, c: isize, nbytes: usize) -> NdResult<()> {
        if self.is_contiguous(c, nbytes) {
            return Ok(());
        }
        Err(NdError::Noncontiguous(format!(
            "shape {:?} with strides {:?} does not satisfy contiguity class {} for {}-byte elements",
            self.shape, self.strides, c, nbytes
        )))
    }

    /// Lowest and one-past-highest byte offset, relative to the base
    /// pointer, that an element of this layout occupies.
    ///
    /// Saturates on layouts whose extent does not fit in `isize`; see
    /// [`Layout::checked_byte_bounds`].
    pub fn byte_bounds(&self, nbytes: usize) -> (isize, isize) {
        if self.is_empty() {
            return (0, 0);
        }
        let mut lo = 0isize;
        let mut hi = 0isize;
        for (&s, &dim) in zip(self.strides.iter(), self.shape.iter()) {
            let span = s.saturating_mul(clamp(dim - 1));
            if span < 0 {
                lo = lo.saturating_add(span);
            } else {
                hi = hi.saturating_add(span);
            }
        }
        (lo, hi.saturating_add(clamp(nbytes)))
    }

    pub fn checked_byte_bounds(&self, nbytes: usize) -> Option<(isize, isize)> {
        if self.is_empty() {
            return Some((0, 0));
        }
        let mut lo = 0isize;
        let mut hi = 0isize;
        for (&s, &dim) in zip(self.strides.iter(), self.shape.iter()) {
            let span = s.checked_mul(isize::try_from(dim - 1).ok()?)?;
            if span < 0 {
                lo = lo.checked_add(span)?;
            } else {
                hi = hi.checked_add(span)?;
            }
        }
        let hi = hi.checked_add(isize::try_from(nbytes).ok()?)?;
        hi.checked_sub(lo).map(|_| (lo, hi))
    }

    pub fn footprint(&self, nbytes: usize) -> usize {
        let (lo, hi) = self.byte_bounds(nbytes);
        hi.abs_diff(lo)
    }

    /// Rejects layouts whose element count or byte extent overflows `isize`.
    pub(crate) fn validate(&self, nbytes: usize) -> NdResult<()> {
        let size = self.checked_size().filter(|&n| isize::try_from(n).is_ok());
        if size.is_none() || self.checked_byte_bounds(nbytes).is_none() {
            return Err(ShapeErrorKind::Overflow.into());
        }
        Ok(())
    }

    pub(crate) fn check_index(&self, index: &[usize; N]) -> NdResult<()> {
        for (&i, &dim) in zip(index.iter(), self.shape.iter()) {
            if i >= dim {
                return Err(ShapeErrorKind::IndexOutOfRange {
                    index: i,
                    extent: dim,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Byte offset of the element at `index` from the base element.
    pub fn offset_of(&self, index: &[usize; N]) -> NdResult<isize> {
        self.check_index(index)?;
        zip(index.iter(), self.strides.iter()).try_fold(0isize, |acc, (&i, &s)| {
            byte_offset(s, i)?
                .checked_add(acc)
                .ok_or(NdError::Shape(ShapeErrorKind::Overflow))
        })
    }

    fn check_axis(&self, axis: usize) -> NdResult<()> {
        if axis >= N {
            return Err(ShapeErrorKind::AxisOutOfRange { axis, rank: N }.into());
        }
        Ok(())
    }

    /// Restricts `axis` to `s`. Returns the byte offset of the new base
    /// element together with the new layout.
    pub(crate) fn slice(&self, axis: usize, s: Slice) -> NdResult<(isize, Layout<N>)> {
        self.check_axis(axis)?;
        let extent = self.shape[axis];
        let stop = s.stop.unwrap_or(extent);
        if s.step == 0 {
            return Err(ShapeErrorKind::InvalidSlice("step must be non-zero".to_string()).into());
        }
        if s.start > stop || stop > extent {
            return Err(ShapeErrorKind::InvalidSlice(format!(
                "{}..{} out of range for extent {}",
                s.start, stop, extent
            ))
            .into());
        }
        let m = stop - s.start;
        let abs_step = s.step.unsigned_abs();
        let len = if m == 0 { 0 } else { (m - 1) / abs_step + 1 };
        let stride = self.strides[axis];
        let offset = if m == 0 {
            0
        } else if s.step < 0 {
            byte_offset(stride, stop - 1)?
        } else {
            byte_offset(stride, s.start)?
        };
        let mut out = *self;
        out.shape[axis] = len;
        // a single element never moves along the axis
        if len > 1 {
            out.strides[axis] = stride
                .checked_mul(s.step)
                .ok_or(NdError::Shape(ShapeErrorKind::Overflow))?;
        }
        Ok((offset, out))
    }

    fn remove_axis<const M: usize>(&self, axis: usize) -> Layout<M> {
        let skip = |i: usize| if i < axis { i } else { i + 1 };
        Layout {
            shape: std::array::from_fn(|i| self.shape[skip(i)]),
            strides: std::array::from_fn(|i| self.strides[skip(i)]),
        }
    }

    /// Fixes `axis` at `index`, dropping it.
    pub(crate) fn index_axis<const M: usize>(
        &self,
        axis: usize,
        index: usize,
    ) -> NdResult<(isize, Layout<M>)> {
        self.check_axis(axis)?;
        if index >= self.shape[axis] {
            return Err(ShapeErrorKind::IndexOutOfRange {
                index,
                extent: self.shape[axis],
            }
            .into());
        }
        Ok((byte_offset(self.strides[axis], index)?, self.remove_axis(axis)))
    }

    /// Drops a unit-extent `axis`.
    pub(crate) fn squeeze<const M: usize>(&self, axis: usize) -> NdResult<Layout<M>> {
        self.check_axis(axis)?;
        if self.shape[axis] != 1 {
            return Err(ShapeErrorKind::InvalidShape(format!(
                "cannot squeeze axis {} of extent {}",
                axis, self.shape[axis]
            ))
            .into());
        }
        Ok(self.remove_axis(axis))
    }

    pub fn permute(&self, perm: [usize; N]) -> NdResult<Layout<N>> {
        let mut seen = [false; N];
        for &p in perm.iter() {
            if p >= N || seen[p] {
                return Err(ShapeErrorKind::InvalidPermutation(perm.to_vec()).into());
            }
            seen[p] = true;
        }
        Ok(Layout {
            shape: perm.map(|p| self.shape[p]),
            strides: perm.map(|p| self.strides[p]),
        })
    }

    pub fn reversed(&self) -> Layout<N> {
        let mut out = *self;
        out.shape.reverse();
        out.strides.reverse();
        out
    }

    #[inline]
    pub(crate) fn first_index(&self) -> Option<[usize; N]> {
        if self.is_empty() {
            return None;
        }
        Some([0; N])
    }

    #[inline]
    pub(crate) fn next_index(&self, mut index: [usize; N]) -> Option<[usize; N]> {
        for (&dim, ix) in zip(self.shape.iter(), index.iter_mut()).rev() {
            *ix += 1;
            if *ix == dim {
                *ix = 0;
            } else {
                return Some(index);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_strategy::proptest;

    #[test]
    fn test_row_major_strides() {
        let l = Layout::contiguous([3, 4], MemoryOrder::RowMajor, 8).unwrap();
        assert_eq!(l.strides(), &[32, 8]);
        assert_eq!(l.footprint(8), 96);
        assert_eq!(l.contiguity(8), Contiguity { row: 2, col: 0 });
        assert_eq!(l.element_strides(8), Some([4, 1]));
        assert_eq!(l.offset_of(&[2, 3]), Ok(88));
        assert!(l.offset_of(&[3, 0]).is_err());
    }

    #[test]
    fn test_col_major_strides() {
        let l = Layout::contiguous([2, 3, 4], MemoryOrder::ColMajor, 4).unwrap();
        assert_eq!(l.strides(), &[4, 8, 24]);
        assert!(l.is_contiguous(-3, 4));
        assert!(!l.is_contiguous(1, 4));
    }

    #[test]
    fn test_overflow() {
        let r = Layout::contiguous([usize::MAX, 2], MemoryOrder::RowMajor, 8);
        assert_eq!(r, Err(NdError::Shape(ShapeErrorKind::Overflow)));
    }

    #[test]
    fn test_partial_contiguity() {
        // inner dimension packed, outer one padded to 6 elements
        let l = Layout::strided([3, 4], [48, 8]);
        assert_eq!(l.contiguity(8), Contiguity { row: 1, col: 0 });
        assert!(l.check_contiguity(1, 8).is_ok());
        assert!(matches!(l.check_contiguity(2, 8), Err(NdError::Noncontiguous(_))));
    }

    #[test]
    fn test_empty_and_scalar_are_contiguous() {
        let l = Layout::strided([0, 5], [-3, 7]);
        assert!(l.is_contiguous(2, 8));
        assert!(l.is_contiguous(-2, 8));
        assert_eq!(l.footprint(8), 0);
        let s = Layout::<0>::strided([], []);
        assert!(s.is_contiguous(0, 8));
        assert_eq!(s.size(), 1);
        assert_eq!(s.footprint(8), 8);
    }

    #[test]
    fn test_negative_strides_bounds() {
        let l = Layout::strided([4], [-8]);
        assert_eq!(l.byte_bounds(8), (-24, 8));
        assert_eq!(l.footprint(8), 32);
        assert_eq!(l.element_strides(8), Some([-1]));
        assert_eq!(l.element_strides(3), None);
    }

    #[test]
    fn test_slice() {
        let l = Layout::contiguous([6, 4], MemoryOrder::RowMajor, 8).unwrap();
        let (off, s) = l.slice(0, Slice::from(1..4)).unwrap();
        assert_eq!(off, 32);
        assert_eq!(s.shape(), &[3, 4]);
        assert!(s.is_contiguous(2, 8));

        let (off, s) = l.slice(0, Slice::from(..).step_by(2)).unwrap();
        assert_eq!(off, 0);
        assert_eq!(s.shape(), &[3, 4]);
        assert_eq!(s.strides(), &[64, 8]);
        assert!(!s.is_contiguous(2, 8));
        assert!(s.is_contiguous(1, 8));

        let (off, s) = l.slice(1, Slice::new(0, Some(4), -1)).unwrap();
        assert_eq!(off, 24);
        assert_eq!(s.strides(), &[32, -8]);

        let (_, s) = l.slice(1, Slice::new(1, Some(4), -2)).unwrap();
        assert_eq!(s.shape(), &[6, 2]);

        assert!(l.slice(2, Slice::from(..)).is_err());
        assert!(l.slice(0, Slice::from(2..7)).is_err());
        assert!(l.slice(0, Slice::from(..).step_by(0)).is_err());
    }

    #[test]
    fn test_index_axis_and_squeeze() {
        let l = Layout::contiguous([2, 3, 4], MemoryOrder::RowMajor, 4).unwrap();
        let (off, r) = l.index_axis::<2>(1, 2).unwrap();
        assert_eq!(off, 32);
        assert_eq!(r.shape(), &[2, 4]);
        assert_eq!(r.strides(), &[48, 4]);
        assert!(l.index_axis::<2>(1, 3).is_err());

        let u = Layout::contiguous([3, 1, 2], MemoryOrder::RowMajor, 4).unwrap();
        let q = u.squeeze::<2>(1).unwrap();
        assert_eq!(q.shape(), &[3, 2]);
        assert!(q.is_contiguous(2, 4));
        assert!(u.squeeze::<2>(0).is_err());
    }

    #[test]
    fn test_permute() {
        let l = Layout::contiguous([2, 3, 4], MemoryOrder::RowMajor, 1).unwrap();
        let p = l.permute([2, 0, 1]).unwrap();
        assert_eq!(p.shape(), &[4, 2, 3]);
        assert_eq!(p.strides(), &[1, 12, 4]);
        assert!(l.permute([0, 0, 1]).is_err());
        let r = l.reversed();
        assert!(r.is_contiguous(-3, 1));
    }

    #[test]
    fn test_index_iteration() {
        let l = Layout::strided([2, 2], [16, 8]);
        let mut seen = vec![];
        let mut ix = l.first_index();
        while let Some(i) = ix {
            seen.push(i);
            ix = l.next_index(i);
        }
        assert_eq!(seen, vec![[0, 0], [0, 1], [1, 0], [1, 1]]);
        assert_eq!(Layout::strided([3, 0], [0, 0]).first_index(), None);
    }

    #[test]
    fn test_implies() {
        assert!(implies(3, 3, 1));
        assert!(implies(3, -2, -1));
        assert!(implies(3, 2, 0));
        assert!(!implies(3, 1, 2));
        assert!(!implies(3, 2, -1));
        assert!(implies(1, 1, -1));
    }

    #[test]
    fn test_slice_step_overflow() {
        let l = Layout::contiguous([4], MemoryOrder::RowMajor, 8).unwrap();
        let (off, s) = l.slice(0, Slice::new(0, None, isize::MAX)).unwrap();
        assert_eq!(off, 0);
        assert_eq!(s.shape(), &[1]);
        assert_eq!(s.strides(), &[8]);
        let (off, s) = l.slice(0, Slice::new(0, None, isize::MIN)).unwrap();
        assert_eq!(off, 24);
        assert_eq!(s.shape(), &[1]);

        let huge = Layout::strided([usize::MAX], [8]);
        assert_eq!(
            huge.slice(0, Slice::new(0, None, isize::MAX)),
            Err(NdError::Shape(ShapeErrorKind::Overflow))
        );
        assert_eq!(
            huge.slice(0, Slice::new(usize::MAX - 1, None, 1)),
            Err(NdError::Shape(ShapeErrorKind::Overflow))
        );
    }

    #[test]
    fn test_broadcast_size_saturates() {
        let l = Layout::strided([1 << 33, 1 << 33], [0, 0]);
        assert_eq!(l.checked_size(), None);
        assert_eq!(l.size(), usize::MAX);
        assert_eq!(l.footprint(8), 8);
        assert_eq!(l.validate(8), Err(NdError::Shape(ShapeErrorKind::Overflow)));

        let fits = Layout::strided([1 << 20, 1 << 20], [0, 0]);
        assert_eq!(fits.size(), 1 << 40);
        assert!(fits.validate(8).is_ok());
        assert_eq!(Layout::strided([0, usize::MAX, 3], [8, 8, 8]).size(), 0);
    }

    #[test]
    fn test_extreme_bounds() {
        let l = Layout::strided([usize::MAX, 2], [isize::MAX, isize::MIN]);
        assert_eq!(l.checked_byte_bounds(8), None);
        assert_eq!(l.byte_bounds(8), (isize::MIN, isize::MAX));
        assert_eq!(l.footprint(8), usize::MAX);
        assert!(l.validate(8).is_err());
        assert_eq!(
            l.offset_of(&[2, 0]),
            Err(NdError::Shape(ShapeErrorKind::Overflow))
        );
        assert_eq!(
            l.index_axis::<1>(0, 3),
            Err(NdError::Shape(ShapeErrorKind::Overflow))
        );
    }

    fn ok_or_shape<T>(r: &NdResult<T>) -> bool {
        matches!(r, Ok(_) | Err(NdError::Shape(_)))
    }

    fn extent() -> impl Strategy<Value = usize> {
        prop_oneof![0usize..6, any::<usize>()]
    }

    #[proptest(cases = 256)]
    fn derivations_never_panic(
        #[strategy(proptest::array::uniform3(extent()))] shape: [usize; 3],
        strides: [isize; 3],
        #[strategy(0usize..4)] axis: usize,
        #[strategy(extent())] start: usize,
        #[strategy(proptest::option::of(extent()))] stop: Option<usize>,
        #[strategy(prop_oneof![-3isize..4, any::<isize>(), Just(isize::MIN), Just(isize::MAX)])]
        step: isize,
        #[strategy(extent())] index: usize,
    ) {
        let l = Layout::strided(shape, strides);
        let _ = l.size();
        let _ = l.footprint(8);
        let _ = l.contiguity(8);
        let _ = l.element_strides(8);
        prop_assert!(ok_or_shape(&l.validate(8)));
        prop_assert!(ok_or_shape(&l.offset_of(&[index; 3])));
        prop_assert!(ok_or_shape(&l.index_axis::<2>(axis, index)));
        prop_assert!(ok_or_shape(&l.squeeze::<2>(axis)));

        let sliced = l.slice(axis, Slice::new(start, stop, step));
        prop_assert!(ok_or_shape(&sliced));
        if let Ok((_, s)) = sliced {
            prop_assert!(s.shape()[axis] <= shape[axis]);
            let _ = s.footprint(8);
        }
    }

    #[proptest(cases = 64)]
    fn strides_follow_order_recurrence(
        #[strategy(proptest::array::uniform3(0usize..7))] shape: [usize; 3],
        order: MemoryOrder,
        #[strategy(prop::sample::select(vec![1usize, 2, 4, 8]))] nbytes: usize,
    ) {
        let l = Layout::contiguous(shape, order, nbytes).unwrap();
        let s = l.strides();
        match order {
            MemoryOrder::RowMajor => {
                prop_assert_eq!(s[2], nbytes as isize);
                prop_assert_eq!(s[1], s[2] * shape[2] as isize);
                prop_assert_eq!(s[0], s[1] * shape[1] as isize);
            }
            MemoryOrder::ColMajor => {
                prop_assert_eq!(s[0], nbytes as isize);
                prop_assert_eq!(s[1], s[0] * shape[0] as isize);
                prop_assert_eq!(s[2], s[1] * shape[1] as isize);
            }
        }
        let c = if order == MemoryOrder::RowMajor { 3 } else { -3 };
        prop_assert!(l.is_contiguous(c, nbytes));
        prop_assert_eq!(l.footprint(nbytes), l.size() * nbytes);
    }
}
