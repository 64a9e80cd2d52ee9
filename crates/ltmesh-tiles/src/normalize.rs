use crate::behavior::{BehaviorOverrides, canonical_block_id, infer_behavior};
use crate::model::{DEFAULT_GRID, Group, Tile, TileBox, TileSpec};

const NO_COLLISION_STRUCTURE: &str = "noclip";

/// Flattens a group tree into render-ready tiles.
///
/// Groups are visited depth-first, each group's own tiles before its
/// children. Tiles without boxes are dropped. Tile and box ids are assigned
/// sequentially in visit order.
pub fn normalize(root: &Group, overrides: &BehaviorOverrides) -> Vec<Tile> {
    let mut out = Normalizer {
        overrides,
        tiles: Vec::new(),
        next_tile: 0,
        next_box: 0,
    };
    out.visit(root, DEFAULT_GRID);
    log::debug!(
        "normalized tiles={} boxes={}",
        out.tiles.len(),
        out.tiles.iter().map(|t| t.boxes.len()).sum::<usize>()
    );
    out.tiles
}

struct Normalizer<'a> {
    overrides: &'a BehaviorOverrides,
    tiles: Vec<Tile>,
    next_tile: u32,
    next_box: u32,
}

impl Normalizer<'_> {
    fn visit(&mut self, group: &Group, inherited_grid: i32) {
        let grid = valid_grid(group.grid).unwrap_or(inherited_grid);
        let structure_id = group
            .structure_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        for spec in &group.tiles {
            self.push_tile(spec, grid, structure_id.as_deref());
        }
        for child in &group.children {
            self.visit(child, grid);
        }
    }

    fn push_tile(&mut self, spec: &TileSpec, group_grid: i32, structure_id: Option<&str>) {
        if spec.boxes.is_empty() {
            return;
        }
        let grid = valid_grid(spec.grid)
            .or_else(|| spec.boxes.iter().find_map(|b| valid_grid(b.grid)))
            .unwrap_or(group_grid);
        let block_id = canonical_block_id(&spec.block_state);
        let behavior = infer_behavior(&block_id, spec.color, self.overrides);

        let boxes = spec
            .boxes
            .iter()
            .map(|b| {
                let id = self.next_box;
                self.next_box += 1;
                let box_grid = valid_grid(b.grid).unwrap_or(grid);
                TileBox::new(id, b.kind, box_grid, b.min, b.max, &b.transform_data)
            })
            .collect();

        let id = self.next_tile;
        self.next_tile += 1;
        self.tiles.push(Tile {
            id,
            block_state: spec.block_state.clone(),
            block_id,
            color: spec.color,
            structure_id: structure_id.map(str::to_string),
            grid,
            provides_solid_face: behavior.provides_solid_face,
            cull_over_edge: behavior.cull_over_edge,
            structure_no_collision: structure_id == Some(NO_COLLISION_STRUCTURE),
            boxes,
        });
    }
}

#[inline]
fn valid_grid(grid: Option<i32>) -> Option<i32> {
    grid.filter(|g| *g > 0)
}
