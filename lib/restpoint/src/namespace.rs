//! The built endpoint/mixin namespace tree.
//!
//! Endpoints and mixins are grafted into one tree by a single recursive merge
//! so both follow the same collision rules. A node may hold an endpoint leaf
//! *and* children (`user` plus `user.messages`), but no leaf may land on a
//! path that is already occupied.

use std::collections::BTreeMap;

use restpoint_core::{EndpointSpec, Error, Result, Spec};

use crate::client::{Mixin, MixinSpec};

/// One node of the built namespace.
#[derive(Default)]
pub(crate) struct Node {
    pub(crate) pattern: Option<String>,
    pub(crate) mixin: Option<Mixin>,
    pub(crate) children: BTreeMap<String, Node>,
}

impl Node {
    /// A leaf may not be installed on an occupied node: one that already holds
    /// an endpoint, a mixin, or a nested namespace.
    fn occupied(&self) -> bool {
        self.pattern.is_some() || self.mixin.is_some() || !self.children.is_empty()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("pattern", &self.pattern)
            .field("mixin", &self.mixin.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// Build the namespace from both declaration trees. Endpoints graft first,
/// then mixins; a mixin key may not overwrite any key already present.
pub(crate) fn build(
    endpoints: BTreeMap<String, EndpointSpec>,
    mixins: BTreeMap<String, MixinSpec>,
) -> Result<Node> {
    let mut root = Node::default();
    graft(&mut root, "", endpoints, &install_endpoint)?;
    graft(&mut root, "", mixins, &install_mixin)?;
    Ok(root)
}

/// Recursive merge shared by the endpoint builder and the mixin attacher,
/// parameterized by the leaf installer. Dotted keys and literal nesting
/// produce the same tree.
fn graft<L>(
    node: &mut Node,
    prefix: &str,
    entries: BTreeMap<String, Spec<L>>,
    install: &dyn Fn(&mut Node, &str, L) -> Result<()>,
) -> Result<()> {
    for (key, spec) in entries {
        let path = join(prefix, &key);
        let target = descend(node, &key);
        match spec {
            Spec::Leaf(leaf) => install(target, &path, leaf)?,
            Spec::Nested(children) => graft(target, &path, children, install)?,
        }
    }
    Ok(())
}

fn install_endpoint(node: &mut Node, path: &str, pattern: String) -> Result<()> {
    if node.occupied() {
        return Err(Error::duplicate_key(path));
    }
    if pattern.is_empty() {
        return Err(Error::endpoint_url_required(path));
    }
    node.pattern = Some(pattern);
    Ok(())
}

fn install_mixin(node: &mut Node, path: &str, mixin: Mixin) -> Result<()> {
    if node.occupied() {
        return Err(Error::duplicate_key(path));
    }
    node.mixin = Some(mixin);
    Ok(())
}

/// Walk (creating) the children named by a possibly dotted key.
fn descend<'a>(mut node: &'a mut Node, key: &str) -> &'a mut Node {
    for segment in key.split('.') {
        node = node.children.entry(segment.to_string()).or_default();
    }
    node
}

/// Walk (without creating) the children named by a dotted path.
pub(crate) fn find<'a>(mut node: &'a Node, path: &str) -> Option<&'a Node> {
    for segment in path.split('.') {
        node = node.children.get(segment)?;
    }
    Some(node)
}

/// Dotted paths of every namespace entry, depth first.
pub(crate) fn keys(node: &Node) -> Vec<String> {
    let mut out = Vec::new();
    collect(node, "", &mut out);
    out
}

fn collect(node: &Node, prefix: &str, out: &mut Vec<String>) {
    for (key, child) in &node.children {
        let path = join(prefix, key);
        out.push(path.clone());
        collect(child, &path, out);
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::Value;

    use super::*;

    fn noop_mixin() -> Mixin {
        crate::mixin(|_client, _args| async { Ok(Value::Null) })
    }

    fn endpoints(
        entries: impl IntoIterator<Item = (&'static str, EndpointSpec)>,
    ) -> BTreeMap<String, EndpointSpec> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn dotted_and_nested_declarations_build_the_same_tree() {
        let dotted = build(
            endpoints([
                ("orders.byId", "/order/:orderid".into()),
                ("orders.byType", "/orders/type/:type".into()),
            ]),
            BTreeMap::new(),
        )
        .expect("builds");

        let nested = build(
            endpoints([(
                "orders",
                EndpointSpec::nested([
                    ("byId", "/order/:orderid".into()),
                    ("byType", "/orders/type/:type".into()),
                ]),
            )]),
            BTreeMap::new(),
        )
        .expect("builds");

        check!(keys(&dotted) == keys(&nested));
        check!(keys(&dotted) == vec!["orders", "orders.byId", "orders.byType"]);
    }

    #[test]
    fn endpoint_leaf_may_gain_children() {
        let root = build(
            endpoints([
                ("user", "/user/:username".into()),
                ("user.messages", "/user/:username/messages".into()),
            ]),
            BTreeMap::new(),
        )
        .expect("builds");

        let user = find(&root, "user").expect("user node");
        check!(user.pattern.as_deref() == Some("/user/:username"));
        let messages = find(&root, "user.messages").expect("messages node");
        check!(messages.pattern.as_deref() == Some("/user/:username/messages"));
    }

    #[test]
    fn duplicate_endpoint_key_fails() {
        let err = build(
            endpoints([
                ("orders.byId", "/order/:orderid".into()),
                (
                    "orders",
                    EndpointSpec::nested([("byId", "/other/:orderid".into())]),
                ),
            ]),
            BTreeMap::new(),
        )
        .expect_err("should collide");
        check!(err.to_string() == "cannot add \"orders.byId\", key already exists");
    }

    #[test]
    fn mixin_may_not_overwrite_endpoint() {
        let mut mixins = BTreeMap::new();
        mixins.insert("user".to_string(), MixinSpec::Leaf(noop_mixin()));

        let err = build(endpoints([("user", "/user/:username".into())]), mixins)
            .expect_err("should collide");
        check!(err.to_string() == "cannot add \"user\", key already exists");
    }

    #[test]
    fn mixin_may_not_land_on_namespace_node() {
        let mut mixins = BTreeMap::new();
        mixins.insert("orders".to_string(), MixinSpec::Leaf(noop_mixin()));

        let err = build(
            endpoints([("orders.byId", "/order/:orderid".into())]),
            mixins,
        )
        .expect_err("should collide");
        check!(err.to_string() == "cannot add \"orders\", key already exists");
    }

    #[test]
    fn mixin_attaches_under_endpoint_node() {
        let mut mixins = BTreeMap::new();
        mixins.insert("user.getUser".to_string(), MixinSpec::Leaf(noop_mixin()));

        let root = build(endpoints([("user", "/user/:username".into())]), mixins)
            .expect("builds");

        let node = find(&root, "user.getUser").expect("mixin node");
        check!(node.mixin.is_some());
    }

    #[test]
    fn empty_endpoint_url_fails() {
        let err = build(endpoints([("user", "".into())]), BTreeMap::new())
            .expect_err("should fail");
        check!(err.to_string() == "no url was provided for the \"user\" endpoint");
    }
}
