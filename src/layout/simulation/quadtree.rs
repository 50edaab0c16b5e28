use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 4;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half: span * 0.5 + 1.0,
        })
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = point - self.center;
        offset.x.abs() <= self.half && offset.y.abs() <= self.half
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half * 0.5;
        let dx = if quadrant & 1 == 1 { quarter } else { -quarter };
        let dy = if quadrant & 2 == 2 { quarter } else { -quarter };
        Self {
            center: self.center + vec2(dx, dy),
            half: quarter,
        }
    }
}

#[derive(Debug)]
pub(super) struct Cell {
    pub(super) bounds: Square,
    pub(super) centroid: Vec2,
    pub(super) weight: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<usize>; 4],
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Flat quadtree over body positions; cell 0 is the root.
#[derive(Debug, Default)]
pub(super) struct Quadtree {
    cells: Vec<Cell>,
}

impl Quadtree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = Square::enclosing(positions)?;
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() / 2 + 1),
        };
        tree.insert_cell(bounds, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    pub(super) fn root(&self) -> Option<&Cell> {
        self.cells.first()
    }

    pub(super) fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    fn insert_cell(
        &mut self,
        bounds: Square,
        members: Vec<usize>,
        positions: &[Vec2],
        depth: usize,
    ) -> usize {
        let weight = members.len() as f32;
        let centroid = if members.is_empty() {
            bounds.center
        } else {
            members
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / weight
        };

        let slot = self.cells.len();
        self.cells.push(Cell {
            bounds,
            centroid,
            weight,
            members,
            children: [None; 4],
        });

        if depth >= MAX_DEPTH || self.cells[slot].members.len() <= LEAF_CAPACITY {
            return slot;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &self.cells[slot].members {
            buckets[bounds.quadrant_of(positions[index])].push(index);
        }

        // Stacked points cannot be separated by subdividing further.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return slot;
        }

        self.cells[slot].members.clear();
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child = self.insert_cell(bounds.quadrant(quadrant), bucket, positions, depth + 1);
            self.cells[slot].children[quadrant] = Some(child);
        }
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_tracks_centroid_and_weight() {
        let positions = (0..20)
            .map(|index| vec2(index as f32 * 10.0, (index % 5) as f32 * 7.0))
            .collect::<Vec<_>>();
        let tree = Quadtree::build(&positions).expect("tree");
        let root = tree.root().expect("root");

        assert_eq!(root.weight, 20.0);
        assert!(!root.is_leaf());
        let expected = positions.iter().fold(Vec2::ZERO, |sum, p| sum + *p) / 20.0;
        assert!((root.centroid - expected).length() < 1e-3);
        assert!(positions.iter().all(|point| root.bounds.contains(*point)));
    }

    #[test]
    fn leaves_hold_every_member_once() {
        let positions = (0..33)
            .map(|index| vec2((index * 37 % 101) as f32, (index * 53 % 97) as f32))
            .collect::<Vec<_>>();
        let tree = Quadtree::build(&positions).expect("tree");

        let mut seen = Vec::new();
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let cell = tree.cell(index);
            seen.extend(cell.members.iter().copied());
            stack.extend(cell.children.iter().flatten().copied());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..33).collect::<Vec<_>>());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![vec2(5.0, 5.0); 9];
        let tree = Quadtree::build(&positions).expect("tree");
        let root = tree.root().expect("root");
        assert!(root.is_leaf());
        assert_eq!(root.members.len(), 9);
    }

    #[test]
    fn empty_input_has_no_tree() {
        assert!(Quadtree::build(&[]).is_none());
    }
}
