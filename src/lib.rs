//! Typed n-dimensional views over strided memory.
//!
//! A view couples a pointer, an element descriptor, per-dimension extents
//! and byte strides, and an optional shared [`Manager`] that keeps the
//! memory alive. Rank and contiguity class are type parameters, so code
//! that needs packed rows can ask for them in its signature:
//!
//! ```
//! use ndview::{Array, NdResult};
//!
//! fn row_sums(a: &Array<f64, 2, 1>) -> NdResult<Vec<f64>> {
//!     let mut out = Vec::new();
//!     for i in 0..a.shape()[0] {
//!         let row = a.index_axis::<1, 1>(0, i)?;
//!         out.push(unsafe { row.deep() }.iter().sum());
//!     }
//!     Ok(out)
//! }
//!
//! let a = Array::<f64, 2, 2>::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2]).unwrap();
//! assert_eq!(row_sums(&a.relax::<1>()).unwrap(), vec![3.0, 7.0]);
//! ```
//!
//! Views are cheap to copy and never own their elements exclusively;
//! element access therefore goes through the `unsafe` [`ArrayBase::deep`]
//! and [`Array::deep_mut`].

mod array;
mod array_impl;
mod array_ref;
mod buffer;
mod dtype;
mod error;
mod interop;
mod layout;
mod manager;

pub use crate::array::{Access, Array, ArrayBase, ArrayOptions, ConstArray, ReadOnly, ReadWrite};
pub use crate::array_ref::{ArrayRef, ArrayRefBase, ConstArrayRef, Iter};
pub use crate::dtype::{DType, Element, ScalarKind};
pub use crate::error::{NdError, NdResult, ShapeErrorKind};
pub use crate::interop::{BufferInfo, ForeignArray};
pub use crate::layout::{implies, Contiguity, Layout, MemoryOrder, Slice};
pub use crate::manager::Manager;
