/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use serde::{Serialize, Serializer};

static NEXT_DIMENSION: AtomicU64 = AtomicU64::new(0);

/// A primitive (base) dimension, such as length or time. These can be
/// considered a unit's "type".
///
/// Every call to [`Dimension::new`] mints a new identity: two
/// dimensions with the same name are still different dimensions.
/// Dimensions order by creation, which gives dimension vectors a
/// deterministic canonical order.
#[derive(Clone, Debug)]
pub struct Dimension {
    id: u64,
    name: Arc<str>,
    symbol: Arc<str>,
}

impl Dimension {
    /// Create a new dimension whose base unit is written `symbol`.
    pub fn new(name: &str, symbol: &str) -> Self {
        Dimension {
            id: NEXT_DIMENSION.fetch_add(1, AtomicOrdering::Relaxed),
            name: Arc::from(name),
            symbol: Arc::from(symbol),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol of the base unit of this dimension.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Dimension {}

impl PartialOrd for Dimension {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dimension {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name)
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
