use std::{fmt, slice};

/// A single URL parameter, consisting of a key and an optional value.
#[derive(PartialEq, Eq, Clone)]
struct Param {
    key: String,
    // `None` when an optional parameter or wildcard matched nothing.
    value: Option<String>,
}

/// Parameters collected while dispatching a request.
///
/// Keys keep the order they were first seen in. Inserting a key that is
/// already present overwrites its value in place, so when several routes
/// match the same URL the last route to declare a name wins.
///
/// ```rust
/// use pathway::Params;
///
/// let mut params = Params::new();
/// params.insert("id", Some("1"));
/// params.insert("page", None::<&str>);
/// params.insert("id", Some("2"));
///
/// assert_eq!(params.get("id"), Some("2"));
/// assert_eq!(params.get("page"), None);
/// assert!(params.contains_key("page"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(PartialEq, Eq, Clone, Default)]
pub struct Params {
    inner: Vec<Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no parameters in the list.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the value registered under the given key, if it matched anything.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.inner
            .iter()
            .find(|param| param.key == key)
            .and_then(|param| param.value.as_deref())
    }

    /// Returns `true` if the key was declared by a matched route, even if
    /// its value is absent.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        self.inner.iter().any(|param| param.key == key)
    }

    /// Inserts a key value pair, overwriting an existing value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let key = key.into();
        let value = value.map(Into::into);

        match self.inner.iter_mut().find(|param| param.key == key) {
            Some(param) => param.value = value,
            None => self.inner.push(Param { key, value }),
        }
    }

    /// Removes every parameter.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns an iterator over the parameters in the list.
    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter {
            inner: self.inner.iter(),
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, Option<&'a str>);
    type IntoIter = ParamsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys and values of a request's [parameters](crate::Params).
pub struct ParamsIter<'ps> {
    inner: slice::Iter<'ps, Param>,
}

impl<'ps> Iterator for ParamsIter<'ps> {
    type Item = (&'ps str, Option<&'ps str>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|p| (p.key.as_str(), p.value.as_deref()))
    }
}

impl ExactSizeIterator for ParamsIter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_position() {
        let mut params = Params::new();
        params.insert("a", Some("1"));
        params.insert("b", Some("2"));
        params.insert("a", Some("3"));

        assert!(params.iter().eq(vec![("a", Some("3")), ("b", Some("2"))]));
    }

    #[test]
    fn absent_value() {
        let mut params = Params::new();
        params.insert("id", None::<String>);

        assert!(params.contains_key("id"));
        assert!(params.get("id").is_none());
        assert_eq!(params.iter().len(), 1);
    }

    #[test]
    fn empty() {
        let params = Params::new();
        assert!(params.get("").is_none());
        assert!(params.is_empty());
    }
}
