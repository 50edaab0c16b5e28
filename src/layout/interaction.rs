use eframe::egui::Vec2;

/// Node currently being dragged and where the pointer holds it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Drag {
    pub(super) index: usize,
    pub(super) pointer: Vec2,
}

/// Hover, selection and drag are independent axes, each naming at most one node.
#[derive(Clone, Debug, Default)]
pub(super) struct Interaction {
    pub(super) hovered: Option<usize>,
    pub(super) selected: Option<usize>,
    pub(super) drag: Option<Drag>,
}

impl Interaction {
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the previous hover target when it changed.
    pub(super) fn set_hovered(&mut self, hovered: Option<usize>) -> Option<Option<usize>> {
        if self.hovered == hovered {
            return None;
        }
        Some(std::mem::replace(&mut self.hovered, hovered))
    }

    pub(super) fn dragged(&self) -> Option<usize> {
        self.drag.map(|drag| drag.index)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeState {
    pub hovered: bool,
    pub selected: bool,
    pub dragging: bool,
}

/// Nearest circle containing `point`, all in simulation space.
pub(super) fn hit_test(
    point: Vec2,
    circles: impl Iterator<Item = (Vec2, f32)>,
) -> Option<usize> {
    circles
        .enumerate()
        .filter_map(|(index, (center, radius))| {
            let distance = (center - point).length();
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
