//! Kind-specific layout: how groups aggregate and place their children.
//!
//! Labels and progress bars measure themselves in `Tree::compute_area`;
//! the interesting variant-specific logic lives here.

use crate::geometry::{Extent, HAlign, MAX};
use crate::host::Host;
use crate::tree::{NodeId, Tree};

impl<H: Host> Tree<H> {
    /// A vertical group's area: widest padded child by the max rule (MAX
    /// widths are excluded — an unbounded child cannot force a finite
    /// measurement), padded heights summed in stacking order.
    pub(crate) fn group_area(&mut self, id: NodeId) -> Extent {
        let children = self.nodes[id.0].children.clone();
        let mut area = Extent::ZERO;
        for child in children {
            let child_area = self.padded_area(child);
            if child_area.x != MAX {
                area.x = area.x.max(child_area.x);
            }
            area.y = area.y.saturating_add(child_area.y);
        }
        area
    }

    /// Place `target` within the group: children stack downward from the
    /// group's padded origin, and the horizontal offset distributes the
    /// slack between the group's width and the child's padded width
    /// according to the group's alignment.
    ///
    /// # Panics
    ///
    /// If `target` is not among this group's children.
    pub(crate) fn place_in_group(
        &mut self,
        group: NodeId,
        target: NodeId,
        halign: HAlign,
    ) -> Extent {
        let group_area = self.area(group);
        let mut pos = self.padded_position(group);
        let children = self.nodes[group.0].children.clone();
        for child in children {
            let child_area = self.padded_effective_area(child);
            if child == target {
                pos.x = pos.x.saturating_add(match halign {
                    HAlign::Left => 0,
                    HAlign::Center => (group_area.x / 2).saturating_sub(child_area.x / 2),
                    HAlign::Right => group_area.x.saturating_sub(child_area.x),
                });
                return pos;
            }
            pos.y = pos.y.saturating_add(child_area.y);
        }
        panic!("placement queried for a node that is not a child of this group");
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::test_host::TestHost;

    /// Zero padding, 10px per character, configurable line height.
    fn flat_tree(line_height: u32) -> Tree<TestHost> {
        let mut host = TestHost::new().with_metrics(25, 0);
        host.line_height = line_height;
        Tree::new(host)
    }

    #[test]
    fn test_group_aggregates_sum_of_heights_max_of_widths() {
        // Children 40x30 and MAXx50: the MAX width is excluded from the
        // width rule, the heights add up.
        let mut tree = flat_tree(30);
        let top = tree.top();
        let group = tree.vertical_group(top, HAlign::Left);
        let _label = tree.label(group, "beef"); // 40 x 30
        let _bar = tree.progress_bar(group); // MAX x 50

        assert_eq!(tree.area(group), Extent::new(40, 80));
    }

    #[test]
    fn test_empty_group_is_zero_sized() {
        let mut tree = flat_tree(16);
        let top = tree.top();
        let group = tree.vertical_group(top, HAlign::Left);
        assert_eq!(tree.area(group), Extent::ZERO);
    }

    #[test]
    fn test_group_width_includes_child_padding() {
        // 10px insets on every node: a 40px label occupies 60 padded.
        let mut tree = Tree::new(TestHost::new().with_metrics(20, 10));
        let top = tree.top();
        let group = tree.vertical_group(top, HAlign::Left);
        let _label = tree.label(group, "beef");
        assert_eq!(tree.area(group).x, 60);
    }

    fn alignment_offset(halign: HAlign) -> u32 {
        let mut tree = flat_tree(16);
        let top = tree.top();
        let group = tree.vertical_group(top, halign);
        let _wide = tree.label(group, "0123456789"); // pins width at 100
        let target = tree.label(group, "beef"); // 40 wide

        let group_origin = tree.padded_position(group);
        let target_pos = tree.position(target);
        target_pos.x - group_origin.x
    }

    #[test]
    fn test_alignment_distributes_slack() {
        assert_eq!(alignment_offset(HAlign::Left), 0);
        assert_eq!(alignment_offset(HAlign::Center), 30);
        assert_eq!(alignment_offset(HAlign::Right), 60);
    }

    #[test]
    fn test_children_stack_in_insertion_order() {
        let mut tree = flat_tree(30);
        let top = tree.top();
        let group = tree.vertical_group(top, HAlign::Left);
        let first = tree.label(group, "one");
        let second = tree.label(group, "two");
        let third = tree.label(group, "three");

        assert_eq!(tree.position(first).y, 0);
        assert_eq!(tree.position(second).y, 30);
        assert_eq!(tree.position(third).y, 60);
    }

    #[test]
    fn test_max_child_centers_with_zero_slack() {
        // A MAX-wide child's padded effective width equals the group span,
        // so every alignment degenerates to no offset.
        let mut tree = flat_tree(16);
        let top = tree.top();
        let group = tree.vertical_group(top, HAlign::Center);
        let _wide = tree.label(group, "0123456789");
        let bar = tree.progress_bar(group);

        let group_origin = tree.padded_position(group);
        assert_eq!(tree.position(bar).x, group_origin.x);
    }

    #[test]
    #[should_panic(expected = "not a child of this group")]
    fn test_placement_for_non_child_panics() {
        let mut tree = flat_tree(16);
        let top = tree.top();
        let outer = tree.vertical_group(top, HAlign::Left);
        let stranger = tree.label(outer, "abc");
        let inner = tree.vertical_group(outer, HAlign::Left);
        let _label = tree.label(inner, "zzz");
        tree.place_in_group(inner, stranger, HAlign::Left);
    }
}
