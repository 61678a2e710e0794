//! Declaration trees for endpoints and mixins.
//!
//! A [`Spec`] declares the shape of a client namespace before it is built:
//! leaves carry the payload (a URL pattern for endpoints, a callable for
//! mixins) and nested maps declare inner namespaces. Dotted keys
//! (`"orders.byId"`) and literal nesting are interchangeable; both normalize
//! to the same built tree.

use std::collections::BTreeMap;

/// A declaration tree with leaves of type `L`.
#[derive(Debug, Clone)]
pub enum Spec<L> {
    /// A leaf entry.
    Leaf(L),
    /// A nested namespace of further entries.
    Nested(BTreeMap<String, Spec<L>>),
}

/// Endpoint declarations: leaves are URL patterns.
pub type EndpointSpec = Spec<String>;

impl<L> Spec<L> {
    /// Build a nested namespace from key/spec pairs.
    ///
    /// ```
    /// use restpoint_core::EndpointSpec;
    ///
    /// let orders = EndpointSpec::nested([
    ///     ("byId", "/order/:orderid".into()),
    ///     ("byType", "/orders/type/:type".into()),
    /// ]);
    /// ```
    pub fn nested<K>(entries: impl IntoIterator<Item = (K, Self)>) -> Self
    where
        K: Into<String>,
    {
        Self::Nested(
            entries
                .into_iter()
                .map(|(key, spec)| (key.into(), spec))
                .collect(),
        )
    }
}

impl<L> From<L> for Spec<L> {
    fn from(leaf: L) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<&str> for Spec<String> {
    fn from(pattern: &str) -> Self {
        Self::Leaf(pattern.to_string())
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn spec_from_pattern() {
        let spec = EndpointSpec::from("/user/:username");
        check!(matches!(spec, Spec::Leaf(p) if p == "/user/:username"));
    }

    #[test]
    fn spec_nested() {
        let spec = EndpointSpec::nested([
            ("byId", "/order/:orderid".into()),
            (
                "archive",
                EndpointSpec::nested([("byYear", "/archive/:year".into())]),
            ),
        ]);

        let Spec::Nested(entries) = spec else {
            panic!("expected nested spec");
        };
        check!(entries.len() == 2);
        check!(matches!(entries.get("byId"), Some(Spec::Leaf(_))));
        check!(matches!(entries.get("archive"), Some(Spec::Nested(_))));
    }
}
