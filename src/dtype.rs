use crate::error::{NdError, NdResult};
use half::{bf16, f16};
use std::fmt;
use std::mem;

/// Scalar layouts an array element can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    BF16,
    F32,
    F64,
}

impl ScalarKind {
    /// Natural size of the scalar in bytes.
    pub fn size_of(self) -> usize {
        match self {
            ScalarKind::Bool | ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 | ScalarKind::F16 | ScalarKind::BF16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }

    /// numpy-style name.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "int8",
            ScalarKind::I16 => "int16",
            ScalarKind::I32 => "int32",
            ScalarKind::I64 => "int64",
            ScalarKind::U8 => "uint8",
            ScalarKind::U16 => "uint16",
            ScalarKind::U32 => "uint32",
            ScalarKind::U64 => "uint64",
            ScalarKind::F16 => "float16",
            ScalarKind::BF16 => "bfloat16",
            ScalarKind::F32 => "float32",
            ScalarKind::F64 => "float64",
        }
    }
}

/// Runtime description of the scalar stored in each cell.
///
/// `nbytes` is the distance, in bytes, between two packed elements. It is
/// normally `size_of::<T>()`; a foreign buffer may claim a larger, padded
/// element size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    kind: ScalarKind,
    nbytes: usize,
}

impl DType {
    pub fn of<T: Element>() -> DType {
        DType {
            kind: T::KIND,
            nbytes: mem::size_of::<T>(),
        }
    }

    pub fn with_nbytes<T: Element>(nbytes: usize) -> NdResult<DType> {
        DType::from_kind(T::KIND, nbytes)
    }

    pub fn from_kind(kind: ScalarKind, nbytes: usize) -> NdResult<DType> {
        let natural = DType {
            kind,
            nbytes: kind.size_of(),
        };
        if nbytes < kind.size_of() {
            return Err(NdError::DTypeMismatch {
                expected: natural,
                got: DType { kind, nbytes },
            });
        }
        Ok(DType { kind, nbytes })
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn nbytes(&self) -> usize {
        self.nbytes
    }

    pub fn is_padded(&self) -> bool {
        self.nbytes != self.kind.size_of()
    }

    /// Checks that this descriptor can describe cells of `T`.
    pub(crate) fn check_element<T: Element>(&self) -> NdResult<()> {
        if self.kind != T::KIND || self.nbytes < mem::size_of::<T>() {
            return Err(NdError::DTypeMismatch {
                expected: DType::of::<T>(),
                got: *self,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_padded() {
            write!(f, "{}[{}]", self.kind.name(), self.nbytes)
        } else {
            f.write_str(self.kind.name())
        }
    }
}

/// Element types a view may be parameterized over.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: ScalarKind;
}

macro_rules! impl_element {
    ($($t:ty => $k:ident),* $(,)*) => {
        $(impl Element for $t {
            const KIND: ScalarKind = ScalarKind::$k;
        })*
    };
}

impl_element!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f16 => F16,
    bf16 => BF16,
    f32 => F32,
    f64 => F64,
);
