//! Exchange of array descriptions with foreign code.
//!
//! [`ForeignArray`] is what an external buffer protocol hands over: a data
//! pointer with signed extents and byte strides. [`BufferInfo`] is what a
//! view hands back.

use crate::array::{Access, ArrayBase};
use crate::array_impl::ArrayImpl;
use crate::dtype::{DType, Element, ScalarKind};
use crate::error::{NdError, NdResult, ShapeErrorKind};
use crate::layout::{Contiguity, Layout};
use crate::manager::Manager;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignArray {
    pub data: *mut u8,
    pub shape: Vec<isize>,
    pub strides: Vec<isize>,
    pub itemsize: usize,
    pub kind: ScalarKind,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    pub ptr: *mut u8,
    pub shape: Vec<usize>,
    pub strides: Vec<isize>,
    pub element_strides: Option<Vec<isize>>,
    pub itemsize: usize,
    pub kind: ScalarKind,
    pub readonly: bool,
    pub contiguity: Contiguity,
}

impl<T: Element, const N: usize, const C: isize, A: Access> ArrayBase<T, N, C, A> {
    /// Views a foreign buffer, validating rank, element type, writability
    /// and contiguity class. On failure nothing is retained.
    ///
    /// # Safety
    ///
    /// `src.data` must be valid over the described layout for as long as
    /// `manager` (or, without one, the caller) keeps it alive.
    pub unsafe fn from_foreign(
        src: &ForeignArray,
        manager: Option<Arc<Manager>>,
    ) -> NdResult<Self> {
        if src.shape.len() != N {
            return Err(ShapeErrorKind::RankMismatch {
                expected: N,
                got: src.shape.len(),
            }
            .into());
        }
        if src.readonly && A::WRITABLE {
            return Err(NdError::ReadOnly);
        }
        let shape = src
            .shape
            .iter()
            .map(|&d| {
                usize::try_from(d).map_err(|_| {
                    NdError::from(ShapeErrorKind::InvalidShape(format!("negative extent {}", d)))
                })
            })
            .collect::<NdResult<Vec<usize>>>()?;
        let dtype = DType::from_kind(src.kind, src.itemsize)?;
        dtype.check_element::<T>()?;
        let layout = Layout::from_slices(&shape, &src.strides)?;
        layout.validate(dtype.nbytes())?;
        Self::checked(ArrayImpl::wrap(src.data, layout, manager, dtype))
    }

    pub fn buffer_info(&self) -> BufferInfo {
        let dtype = self.dtype();
        BufferInfo {
            ptr: self.as_ptr() as *mut u8,
            shape: self.shape().to_vec(),
            strides: self.strides().to_vec(),
            element_strides: self.element_strides().map(|s| s.to_vec()),
            itemsize: dtype.nbytes(),
            kind: dtype.kind(),
            readonly: !A::WRITABLE,
            contiguity: self.contiguity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{Array, ConstArray};

    fn foreign(data: &mut [f32], shape: Vec<isize>, strides: Vec<isize>) -> ForeignArray {
        ForeignArray {
            data: data.as_mut_ptr() as *mut u8,
            shape,
            strides,
            itemsize: 4,
            kind: ScalarKind::F32,
            readonly: false,
        }
    }

    #[test]
    fn test_from_foreign() {
        let mut data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let src = foreign(&mut data, vec![2, 3], vec![12, 4]);
        let a = unsafe { Array::<f32, 2, 2>::from_foreign(&src, None) }.unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(unsafe { a.deep() }.get([1, 0]), Some(4.0));

        let info = a.buffer_info();
        assert_eq!(info.shape, vec![2, 3]);
        assert_eq!(info.strides, vec![12, 4]);
        assert_eq!(info.element_strides, Some(vec![3, 1]));
        assert_eq!(info.kind, ScalarKind::F32);
        assert!(!info.readonly);
        assert_eq!(info.contiguity, Contiguity { row: 2, col: 0 });
    }

    #[test]
    fn test_from_foreign_errors() {
        let mut data = [0.0f32; 6];
        let src = foreign(&mut data, vec![6], vec![4]);
        assert!(matches!(
            unsafe { Array::<f32, 2, 0>::from_foreign(&src, None) },
            Err(NdError::Shape(ShapeErrorKind::RankMismatch { expected: 2, got: 1 }))
        ));
        assert!(matches!(
            unsafe { Array::<i32, 1, 0>::from_foreign(&src, None) },
            Err(NdError::DTypeMismatch { .. })
        ));

        let negative = foreign(&mut data, vec![-1], vec![4]);
        assert!(matches!(
            unsafe { Array::<f32, 1, 0>::from_foreign(&negative, None) },
            Err(NdError::Shape(ShapeErrorKind::InvalidShape(_)))
        ));

        let strided = foreign(&mut data, vec![3], vec![8]);
        assert!(matches!(
            unsafe { Array::<f32, 1, 1>::from_foreign(&strided, None) },
            Err(NdError::Noncontiguous(_))
        ));
        assert!(unsafe { Array::<f32, 1, 0>::from_foreign(&strided, None) }.is_ok());

        let broadcast = foreign(&mut data, vec![1 << 40, 1 << 40], vec![0, 0]);
        assert_eq!(
            unsafe { Array::<f32, 2, 0>::from_foreign(&broadcast, None) }.err(),
            Some(NdError::Shape(ShapeErrorKind::Overflow))
        );
    }

    #[test]
    fn test_readonly_foreign() {
        let mut data = [0.0f32; 4];
        let mut src = foreign(&mut data, vec![4], vec![4]);
        src.readonly = true;
        assert_eq!(
            unsafe { Array::<f32, 1, 1>::from_foreign(&src, None) },
            Err(NdError::ReadOnly)
        );
        let c = unsafe { ConstArray::<f32, 1, 1>::from_foreign(&src, None) }.unwrap();
        assert!(c.buffer_info().readonly);
    }

    #[test]
    fn test_failed_import_drops_manager() {
        let mut data = [0.0f32; 4];
        let src = foreign(&mut data, vec![2, 2], vec![4, 8]);
        let m = Manager::new(|| {});
        let r = unsafe { Array::<f32, 2, 2>::from_foreign(&src, Some(m.clone())) };
        assert!(r.is_err());
        assert_eq!(Arc::strong_count(&m), 1);
        let ok = unsafe { Array::<f32, 2, -2>::from_foreign(&src, Some(m.clone())) }.unwrap();
        assert_eq!(ok.manager_count(), 2);
    }
}
