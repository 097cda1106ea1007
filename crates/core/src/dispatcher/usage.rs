use indexmap::{IndexMap, IndexSet};

use crate::tree::NodeId;

use super::{ARGUMENT_SEPARATOR, CommandDispatcher};

const USAGE_OPTIONAL_OPEN: &str = "[";
const USAGE_OPTIONAL_CLOSE: &str = "]";
const USAGE_REQUIRED_OPEN: &str = "(";
const USAGE_REQUIRED_CLOSE: &str = ")";
const USAGE_OR: &str = "|";

impl<S> CommandDispatcher<S> {
    /// Every executable path below `node`, one line each.
    ///
    /// A path ending in a redirect is listed with `...` (redirect to the
    /// root) or `-> target`. With `restricted` set, nodes `sender` may not
    /// use are left out along with everything under them.
    pub fn get_all_usage(&self, node: NodeId, sender: &S, restricted: bool) -> Vec<String> {
        let mut result = Vec::new();
        self.collect_all_usage(node, sender, &mut result, "", restricted);
        result
    }

    fn collect_all_usage(
        &self,
        id: NodeId,
        sender: &S,
        result: &mut Vec<String>,
        prefix: &str,
        restricted: bool,
    ) {
        let node = &self.tree[id];
        if restricted && !node.can_use(sender) {
            return;
        }
        if self.tree.is_executable(id) {
            result.push(prefix.to_owned());
        }
        if let Some(target) = node.redirect() {
            let redirect = self.redirect_usage(target);
            if prefix.is_empty() {
                result.push(format!("{}{ARGUMENT_SEPARATOR}{redirect}", node.usage_text()));
            } else {
                result.push(format!("{prefix}{ARGUMENT_SEPARATOR}{redirect}"));
            }
        } else {
            for child in node.children() {
                let usage = self.tree[child].usage_text();
                let prefix = if prefix.is_empty() {
                    usage
                } else {
                    format!("{prefix}{ARGUMENT_SEPARATOR}{usage}")
                };
                self.collect_all_usage(child, sender, result, &prefix, restricted);
            }
        }
    }

    /// A condensed usage line for each child of `node`, keyed by child.
    ///
    /// Optional parts (after a node that is already executable) are wrapped
    /// in `[...]`, alternatives in `(a|b)`. Children hidden from `sender`
    /// are skipped unless the dispatcher is configured with
    /// `restrict_usage` off.
    pub fn get_smart_usage(&self, node: NodeId, sender: &S) -> IndexMap<NodeId, String> {
        let parent = &self.tree[node];
        let optional = self.tree.is_executable(node);
        parent
            .children()
            .filter_map(|child| {
                self.smart_usage(child, sender, optional, false)
                    .map(|usage| (child, usage))
            })
            .collect()
    }

    fn smart_usage(&self, id: NodeId, sender: &S, optional: bool, deep: bool) -> Option<String> {
        if !self.usable(id, sender) {
            return None;
        }
        let node = &self.tree[id];
        let this = if optional {
            format!("{USAGE_OPTIONAL_OPEN}{}{USAGE_OPTIONAL_CLOSE}", node.usage_text())
        } else {
            node.usage_text()
        };
        if deep {
            return Some(this);
        }
        if let Some(target) = node.redirect() {
            return Some(format!("{this}{ARGUMENT_SEPARATOR}{}", self.redirect_usage(target)));
        }

        let child_optional = self.tree.is_executable(id);
        let (open, close) = if child_optional {
            (USAGE_OPTIONAL_OPEN, USAGE_OPTIONAL_CLOSE)
        } else {
            (USAGE_REQUIRED_OPEN, USAGE_REQUIRED_CLOSE)
        };
        let children: Vec<NodeId> = node
            .children()
            .filter(|&child| self.usable(child, sender))
            .collect();
        match children.as_slice() {
            [] => {}
            [only] => {
                if let Some(usage) = self.smart_usage(*only, sender, child_optional, child_optional)
                {
                    return Some(format!("{this}{ARGUMENT_SEPARATOR}{usage}"));
                }
            }
            _ => {
                let distinct: IndexSet<String> = children
                    .iter()
                    .filter_map(|&child| self.smart_usage(child, sender, child_optional, true))
                    .collect();
                if distinct.len() == 1 {
                    let usage = distinct.into_iter().next().unwrap_or_default();
                    return Some(format!("{this}{ARGUMENT_SEPARATOR}{usage}"));
                }
                let alternatives: Vec<String> = children
                    .iter()
                    .map(|&child| self.tree[child].usage_text())
                    .collect();
                return Some(format!(
                    "{this}{ARGUMENT_SEPARATOR}{open}{}{close}",
                    alternatives.join(USAGE_OR)
                ));
            }
        }
        Some(this)
    }

    fn usable(&self, id: NodeId, sender: &S) -> bool {
        !self.config.restrict_usage || self.tree[id].can_use(sender)
    }

    fn redirect_usage(&self, target: NodeId) -> String {
        if target == NodeId::ROOT {
            "...".to_owned()
        } else {
            format!("-> {}", self.tree[target].usage_text())
        }
    }
}
