use super::SearchTree;
use crate::basic_types::NodeId;
use crate::explorer_assert_moderate;
use crate::explorer_assert_simple;
use crate::space::SolverState;

impl<S: SolverState> SearchTree<S> {
    /// Record that a child of `node` has closed. Closing bubbles up for as long as the nodes on
    /// the way become closed themselves.
    pub(crate) fn close_child(&mut self, node: NodeId, had_failures: bool, had_solutions: bool) {
        let mut current = node;
        let mut failed = had_failures;
        let mut solved = had_solutions;

        loop {
            let search_node = &mut self.nodes[current];
            search_node.has_failed_descendant |= failed;
            search_node.has_solved_descendant |= solved;

            explorer_assert_simple!(
                search_node.open_child_count > 0,
                "{current} has no open children left to close"
            );
            search_node.open_child_count -= 1;

            if search_node.is_open() {
                return;
            }

            failed = search_node.has_failed_descendant;
            solved = search_node.has_solved_descendant;
            match search_node.parent {
                Some(parent) => current = parent,
                None => return,
            }
        }
    }

    /// Count the subtree of `node`, which was closed, as open again in its ancestors.
    ///
    /// This is the inverse of closing: every ancestor gains an open child, up to and including
    /// the first ancestor which was still open.
    pub fn open_up(&mut self, node: NodeId) {
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            let was_open = self.nodes[parent].is_open();
            let parent_node = &mut self.nodes[parent];
            parent_node.open_child_count += 1;
            explorer_assert_moderate!(
                parent_node.open_child_count <= parent_node.number_of_children()
            );

            if was_open {
                break;
            }
            current = parent;
        }
    }

    pub(crate) fn solve_up(&mut self, node: NodeId) {
        let mut current = self.nodes[node].parent;
        while let Some(ancestor) = current {
            self.nodes[ancestor].has_solved_descendant = true;
            current = self.nodes[ancestor].parent;
        }
    }

    /// Open a closed node again, e.g. to inspect a solution once more. Returns `false` if the
    /// node was still open.
    pub fn reopen(&mut self, node: NodeId) -> bool {
        if self.nodes[node].is_open() {
            return false;
        }
        self.nodes[node].reopened = true;
        self.open_up(node);
        true
    }

    /// Close a node opened with [`SearchTree::reopen`]. Returns `false` if the node was not
    /// reopened.
    pub fn close_reopened(&mut self, node: NodeId) -> bool {
        let search_node = &mut self.nodes[node];
        if !search_node.reopened {
            return false;
        }
        search_node.reopened = false;

        if !search_node.is_open() {
            let failed = search_node.has_failed_descendant;
            let solved = search_node.has_solved_descendant;
            if let Some(parent) = search_node.parent {
                self.close_child(parent, failed, solved);
            }
        }
        true
    }

    /// Release every copy and working state in the subtree of `node`. The copy of the root is
    /// kept.
    pub fn purge(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(current));

            let search_node = &mut self.nodes[current];
            search_node.working_state = None;
            if search_node.parent.is_some() {
                search_node.owned_copy = None;
            }
        }
    }
}
