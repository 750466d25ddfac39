/// A key-value pair stored as a single treap value. Entries are ordered by key alone through
/// `KeyComparer`, so the value never takes part in comparisons.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}

impl<T, U> Entry<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Entry { key, value }
    }

    pub fn key(&self) -> &T {
        &self.key
    }

    pub fn value(&self) -> &U {
        &self.value
    }
}

impl<T, U> From<(T, U)> for Entry<T, U> {
    fn from(pair: (T, U)) -> Self {
        let (key, value) = pair;
        Entry { key, value }
    }
}
