// crates/puli-core/src/tree.rs - Recursive tree rendering
//
// Renders anything that can name itself and list its children as an ASCII
// tree:
//
// ```text
// /app
// ├── config
// │   └── settings.yml
// └── views
//     └── index.html
// ```
//
// The structure is assumed to be acyclic (a resource tree); no cycle
// detection is performed.

use std::borrow::Cow;
use std::convert::Infallible;

use crate::width::{escape_tags, wrap_tag};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_PREFIX: &str = "│   ";
const BLANK_PREFIX: &str = "    ";

/// Capability of a node that can be rendered as a tree
///
/// Listing children may fail for nodes backed by I/O; in-memory nodes use
/// `Infallible`.
pub trait TreeNode: Sized {
    type Error;

    fn name(&self) -> Cow<'_, str>;

    fn has_children(&self) -> bool;

    /// Children in display order
    fn children(&self) -> Result<Vec<Self>, Self::Error>;
}

/// Lines of a rendered tree plus the number of nodes below the root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeOutput {
    pub lines: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct TreeRenderer {
    highlight_tag: String,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new("c1")
    }
}

impl TreeRenderer {
    /// Nodes with children are wrapped in `highlight_tag`; pass an empty tag
    /// to render them plain
    pub fn new(highlight_tag: impl Into<String>) -> Self {
        Self {
            highlight_tag: highlight_tag.into(),
        }
    }

    /// Render `root` below `root_label`
    ///
    /// The root label is printed as given, without a branch glyph. The count
    /// covers every node visited below the root.
    pub fn render<N: TreeNode>(&self, root_label: &str, root: &N) -> Result<TreeOutput, N::Error> {
        let mut output = self.render_children(root, "")?;
        output.lines.insert(0, root_label.to_string());
        Ok(output)
    }

    fn render_children<N: TreeNode>(&self, node: &N, prefix: &str) -> Result<TreeOutput, N::Error> {
        let children = node.children()?;
        let last = children.len().saturating_sub(1);
        let mut output = TreeOutput::default();

        for (idx, child) in children.iter().enumerate() {
            let is_last = idx == last;
            let (branch, continuation) = if is_last {
                (LAST_BRANCH, BLANK_PREFIX)
            } else {
                (BRANCH, PIPE_PREFIX)
            };

            output
                .lines
                .push(format!("{}{}{}", prefix, branch, self.display_name(child)));
            output.count += 1;

            if child.has_children() {
                let nested = self.render_children(child, &format!("{prefix}{continuation}"))?;
                output.lines.extend(nested.lines);
                output.count += nested.count;
            }
        }

        Ok(output)
    }

    fn display_name<N: TreeNode>(&self, node: &N) -> String {
        let name = node.name();
        let name = if name.is_empty() { "/" } else { name.as_ref() };
        if node.has_children() {
            wrap_tag(&self.highlight_tag, name)
        } else {
            escape_tags(name).into_owned()
        }
    }
}

/// Owned in-memory tree, handy for fixtures and precomputed hierarchies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNode {
    pub name: String,
    pub children: Vec<MemoryNode>,
}

impl MemoryNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<MemoryNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl TreeNode for MemoryNode {
    type Error = Infallible;

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn children(&self) -> Result<Vec<Self>, Self::Error> {
        Ok(self.children.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render(root: &MemoryNode) -> TreeOutput {
        let Ok(output) = TreeRenderer::new("").render("root", root);
        output
    }

    #[test]
    fn test_two_children_with_grandchild() {
        let root = MemoryNode::branch(
            "root",
            vec![
                MemoryNode::leaf("child1"),
                MemoryNode::branch("child2", vec![MemoryNode::leaf("grandchild")]),
            ],
        );
        let output = render(&root);
        assert_eq!(
            output.lines,
            vec!["root", "├── child1", "└── child2", "    └── grandchild"]
        );
        assert_eq!(output.count, 3);
    }

    #[test]
    fn test_pipe_continues_under_non_last_sibling() {
        let root = MemoryNode::branch(
            "",
            vec![
                MemoryNode::branch("a", vec![MemoryNode::leaf("a1"), MemoryNode::leaf("a2")]),
                MemoryNode::leaf("b"),
            ],
        );
        let output = render(&root);
        assert_eq!(
            output.lines,
            vec!["root", "├── a", "│   ├── a1", "│   └── a2", "└── b"]
        );
        assert_eq!(output.count, 4);
    }

    #[test]
    fn test_nodes_with_children_are_highlighted() {
        let root = MemoryNode::branch(
            "",
            vec![
                MemoryNode::branch("dir", vec![MemoryNode::leaf("file")]),
                MemoryNode::leaf("other"),
            ],
        );
        let Ok(output) = TreeRenderer::default().render("/", &root);
        assert_eq!(output.lines[1], "├── <c1>dir</c1>");
        assert_eq!(output.lines[2], "│   └── file");
        assert_eq!(output.lines[3], "└── other");
    }

    #[test]
    fn test_empty_name_renders_as_slash() {
        let root = MemoryNode::branch("", vec![MemoryNode::leaf("")]);
        assert_eq!(render(&root).lines, vec!["root", "└── /"]);
    }

    #[test]
    fn test_names_are_not_markup() {
        let root = MemoryNode::branch("", vec![MemoryNode::leaf("<b>x</b>")]);
        let lines = render(&root).lines;
        assert_eq!(crate::width::strip_tags(&lines[1]), "└── <b>x</b>");
    }

    #[test]
    fn test_root_without_children() {
        let output = render(&MemoryNode::leaf("alone"));
        assert_eq!(output.lines, vec!["root"]);
        assert_eq!(output.count, 0);
    }

    #[test]
    fn test_child_errors_propagate() {
        struct Broken;
        impl TreeNode for Broken {
            type Error = String;
            fn name(&self) -> Cow<'_, str> {
                Cow::Borrowed("broken")
            }
            fn has_children(&self) -> bool {
                true
            }
            fn children(&self) -> Result<Vec<Self>, Self::Error> {
                Err("unreadable".to_string())
            }
        }

        let result = TreeRenderer::default().render("/", &Broken);
        assert_eq!(result, Err("unreadable".to_string()));
    }

    fn arb_tree() -> impl Strategy<Value = MemoryNode> {
        let leaf = "[a-z]{1,4}".prop_map(MemoryNode::leaf);
        leaf.prop_recursive(4, 32, 4, |inner| {
            ("[a-z]{1,4}", prop::collection::vec(inner, 0..4))
                .prop_map(|(name, children)| MemoryNode::branch(name, children))
        })
    }

    fn node_count(node: &MemoryNode) -> usize {
        node.children.iter().map(|c| 1 + node_count(c)).sum()
    }

    proptest! {
        #[test]
        fn prop_count_matches_nodes_below_root(root in arb_tree()) {
            let output = render(&root);
            prop_assert_eq!(output.count, node_count(&root));
            prop_assert_eq!(output.lines.len(), output.count + 1);
        }

        #[test]
        fn prop_prefix_is_blank_or_pipe(root in arb_tree()) {
            for line in render(&root).lines.iter().skip(1) {
                let glyph = line.find("── ").unwrap();
                let prefix_chars: Vec<char> = line[..glyph].chars().collect();
                // Prefix = groups of four columns, each "│   " or "    ", then ├/└
                let (groups, branch) = prefix_chars.split_at(prefix_chars.len() - 1);
                prop_assert!(branch[0] == '├' || branch[0] == '└');
                for group in groups.chunks(4) {
                    let group: String = group.iter().collect();
                    prop_assert!(group == PIPE_PREFIX || group == BLANK_PREFIX);
                }
            }
        }

        #[test]
        fn prop_render_is_repeatable(root in arb_tree()) {
            prop_assert_eq!(render(&root), render(&root));
        }
    }
}
