//! Immutable code-keyed registries for both schemes.
//!
//! A [`Registry`] owns one kind of division in one scheme. Records are stored sorted by code,
//! so [`Registry::all`] is deterministic and restartable, and a parent index answers
//! containment queries without a scan.

/// Implements [`Division`] for a record with `code`, `name`, `codename` and `division_type` fields.
macro_rules! impl_division {
    ($ty:ty, $kind:expr, $scheme:expr, $parent:expr) => {
        impl $crate::registry::Division for $ty {
            const KIND: DivisionKind = $kind;
            const SCHEME: Scheme = $scheme;

            fn code(&self) -> u32 {
                self.code
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn division_type(&self) -> DivisionType {
                self.division_type
            }
            fn codename(&self) -> &str {
                &self.codename
            }
            fn parent_code(&self) -> Option<u32> {
                ($parent)(self)
            }
        }
    };
}

pub mod current;
pub mod legacy;

use ahash::AHashMap as HashMap;
use tracing::debug;
use vietnam_provinces_data::{DivisionKind, DivisionType, Scheme};

pub use current::CurrentRegistry;
pub use error::RegistryError;
use error::Result;
pub use legacy::LegacyRegistry;

/// Common view over every division record.
pub trait Division {
    const KIND: DivisionKind;
    const SCHEME: Scheme;

    fn code(&self) -> u32;
    fn name(&self) -> &str;
    fn division_type(&self) -> DivisionType;
    fn codename(&self) -> &str;
    /// Province for current wards, district for legacy wards, province for legacy districts.
    fn parent_code(&self) -> Option<u32>;
}

#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
    index: HashMap<u32, usize>,
    children: HashMap<u32, Vec<usize>>,
}

impl<T: Division> Registry<T> {
    pub fn new(mut items: Vec<T>) -> Result<Self> {
        items.sort_by_key(T::code);
        if let Some(pair) = items.windows(2).find(|w| w[0].code() == w[1].code()) {
            return Err(RegistryError::DuplicateCode {
                scheme: T::SCHEME,
                kind: T::KIND,
                code: pair[0].code(),
            });
        }

        let index: HashMap<u32, usize> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.code(), i))
            .collect();
        let mut children: HashMap<u32, Vec<usize>> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            if let Some(parent) = item.parent_code() {
                children.entry(parent).or_default().push(i);
            }
        }
        debug!(
            scheme = %T::SCHEME,
            kind = %T::KIND,
            count = items.len(),
            "Registry built"
        );

        Ok(Self {
            items,
            index,
            children,
        })
    }

    /// Exact lookup. An unknown code is an error, never a sentinel.
    pub fn by_code(&self, code: u32) -> Result<&T> {
        self.get(code).ok_or(RegistryError::NotFound {
            scheme: T::SCHEME,
            kind: T::KIND,
            code,
        })
    }

    pub fn get(&self, code: u32) -> Option<&T> {
        self.index.get(&code).map(|&i| &self.items[i])
    }

    pub fn contains(&self, code: u32) -> bool {
        self.index.contains_key(&code)
    }

    /// Every record, ascending by code.
    pub fn all(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Direct children of `parent_code`, ascending by code.
    pub fn by_parent(&self, parent_code: u32) -> impl Iterator<Item = &T> + '_ {
        self.children
            .get(&parent_code)
            .into_iter()
            .flatten()
            .map(|&i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fails on the first record whose parent is missing from `parents`.
    pub(crate) fn ensure_parents<P: Division>(&self, parents: &Registry<P>) -> Result<()> {
        match self
            .items
            .iter()
            .find(|item| item.parent_code().is_some_and(|p| !parents.contains(p)))
        {
            Some(orphan) => Err(RegistryError::MissingParent {
                scheme: T::SCHEME,
                kind: T::KIND,
                code: orphan.code(),
                parent: orphan.parent_code().unwrap_or_default(),
            }),
            None => Ok(()),
        }
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

mod error {
    use thiserror::Error;
    use vietnam_provinces_data::{DivisionKind, Scheme};

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum RegistryError {
        #[error("{scheme} {kind} code {code} is invalid.")]
        NotFound {
            scheme: Scheme,
            kind: DivisionKind,
            code: u32,
        },
        #[error("{scheme} {kind} code {code} appears more than once")]
        DuplicateCode {
            scheme: Scheme,
            kind: DivisionKind,
            code: u32,
        },
        #[error("{scheme} {kind} {code} points to missing parent {parent}")]
        MissingParent {
            scheme: Scheme,
            kind: DivisionKind,
            code: u32,
            parent: u32,
        },
    }
    pub type Result<T> = std::result::Result<T, RegistryError>;
}
