use std::error::Error;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::normalization::NormalizationMethod;

/// Error occurring when building, querying or analyzing a contact matrix.
#[derive(Debug)]
pub enum HicError {
    /// Requested value field does not exist in the matrix.
    FieldNotFound {
        field: String,
        available: Vec<String>,
    },
    /// Requested chromosome does not exist in the experiment.
    ChromNotFound {
        chrom: String,
        available: Vec<String>,
    },
    /// Normalization method name is not one of the supported methods.
    UnsupportedMethod(String),
    /// A field with given name has already been added to the matrix.
    FieldExists(String),
    /// Argument outside of its valid domain.
    InvalidArgument(String),
    /// Worker pool for parallel computations could not be created.
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl HicError {
    #[must_use]
    pub fn field_not_found<S: Into<String>>(field: S, available: Vec<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
            available,
        }
    }

    #[must_use]
    pub fn chrom_not_found<S: Into<String>>(chrom: S, available: Vec<String>) -> Self {
        Self::ChromNotFound {
            chrom: chrom.into(),
            available,
        }
    }

    #[must_use]
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for HicError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e)
    }
}

impl Display for HicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HicError::FieldNotFound { field, available } => write!(
                f,
                "Field {} does not exist (available fields: {})",
                field,
                available.iter().join(", ")
            ),
            HicError::ChromNotFound { chrom, available } => write!(
                f,
                "Chromosome {} does not exist (available chromosomes: {})",
                chrom,
                available.iter().join(", ")
            ),
            HicError::UnsupportedMethod(name) => write!(
                f,
                "Unsupported normalization method: {} (supported methods: {})",
                name,
                NormalizationMethod::NAMES.iter().join(", ")
            ),
            HicError::FieldExists(name) => write!(f, "Field {} already exists", name),
            HicError::InvalidArgument(message) => write!(f, "Invalid argument: {}", message),
            HicError::ThreadPool(e) => write!(f, "Could not create worker pool: {}", e),
        }
    }
}

impl Error for HicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HicError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of contact matrix operations.
pub type HicResult<T> = Result<T, HicError>;
