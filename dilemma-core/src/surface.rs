//! Toroidal surface and the tick scheduler
//!
//! The surface owns all live cells through a single registry keyed by
//! `CellId`; the grid stores handles into it, one slot per position. The
//! registry doubles as the live-set, so a cell can never be tracked in one
//! view and missing from the other. Grid indices always wrap modulo the
//! dimensions; the surface has no edges.
//!
//! `tick(interactions)` advances one generation:
//! clean -> age -> (interact -> death -> movement) x interactions -> reproduction.
//! Every phase completes over the whole grid before the next begins.

use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Position, NEIGHBOUR_OFFSETS};
use crate::cell::{Cell, CellId};
use crate::config::{ConfigError, SimConfig};

pub struct Surface {
    width: i32,
    height: i32,
    grid: Vec<Option<CellId>>,
    cells: FxHashMap<CellId, Cell>,
    config: SimConfig,
    next_id: CellId,
    population: usize,
    total_born: u64,
    total_died: u64,
}

impl Surface {
    /// Empty surface. Fails fast on invalid configuration, before any
    /// tick can run.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let width = config.surface.width as i32;
        let height = config.surface.height as i32;
        Ok(Self {
            width,
            height,
            grid: vec![None; (width * height) as usize],
            cells: FxHashMap::default(),
            config,
            next_id: 0,
            population: 0,
            total_born: 0,
            total_died: 0,
        })
    }

    // ========================================================================
    // GRID ACCESS
    // ========================================================================

    /// Wrap a position onto the torus and return the grid slot index
    fn index(&self, pos: Position) -> usize {
        let x = pos.x.rem_euclid(self.width);
        let y = pos.y.rem_euclid(self.height);
        (y * self.width + x) as usize
    }

    /// Wrap a position into canonical coordinates
    fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    /// Cell at `pos`, if any. Coordinates wrap.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.grid[self.index(pos)].map(|id| self.registry_get(id))
    }

    /// Place a cell onto an empty slot, registering it as live.
    ///
    /// # Panics
    /// Panics if the slot is already occupied; overwriting a live cell
    /// would break the grid/registry agreement.
    pub fn place(&mut self, pos: Position, mut cell: Cell) {
        let slot = self.index(pos);
        assert!(
            self.grid[slot].is_none(),
            "slot {:?} already occupied",
            self.wrap(pos)
        );
        cell.set_position(self.wrap(pos));
        let id = cell.id();
        self.grid[slot] = Some(id);
        let previous = self.cells.insert(id, cell);
        assert!(previous.is_none(), "cell id {} already registered", id);
        self.population += 1;
        self.total_born += 1;
    }

    /// Remove the cell at `pos` from the grid and the registry
    fn clear_slot(&mut self, pos: Position) -> Option<Cell> {
        let slot = self.index(pos);
        let id = self.grid[slot].take()?;
        let cell = self
            .cells
            .remove(&id)
            .expect("grid handle missing from cell registry");
        Some(cell)
    }

    fn registry_get(&self, id: CellId) -> &Cell {
        self.cells
            .get(&id)
            .expect("grid handle missing from cell registry")
    }

    fn registry_get_mut(&mut self, id: CellId) -> &mut Cell {
        self.cells
            .get_mut(&id)
            .expect("grid handle missing from cell registry")
    }

    /// Next unused cell id
    pub fn allocate_id(&mut self) -> CellId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ========================================================================
    // SEEDING
    // ========================================================================

    /// Place an initial population. Each cell lands on its own position.
    pub fn seed(&mut self, cells: impl IntoIterator<Item = Cell>) {
        for cell in cells {
            self.next_id = self.next_id.max(cell.id() + 1);
            self.place(cell.position(), cell);
        }
    }

    /// One founder cell per slot, the typical initial condition
    pub fn populate<R: Rng>(&mut self, rng: &mut R) {
        for y in 0..self.height {
            for x in 0..self.width {
                let id = self.allocate_id();
                let cell = Cell::founder(id, Position::new(x, y), &self.config, rng);
                self.place(cell.position(), cell);
            }
        }
    }

    // ========================================================================
    // READ-ONLY VIEWS
    // ========================================================================

    /// All live cells in row-major grid order
    pub fn get_all(&self) -> Vec<&Cell> {
        self.live_ids()
            .into_iter()
            .map(|id| self.registry_get(id))
            .collect()
    }

    /// The top `ratio` of the population by descending score. Ties keep
    /// grid order; the count truncates (`floor(ratio * population)`).
    pub fn get_best_x(&self, ratio: f64) -> Vec<&Cell> {
        let mut cells = self.get_all();
        cells.sort_by_key(|c| std::cmp::Reverse(c.score()));
        cells.truncate(fraction_of(self.population, ratio));
        cells
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn total_born(&self) -> u64 {
        self.total_born
    }

    pub fn total_died(&self) -> u64 {
        self.total_died
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Panic unless every live cell appears in exactly one grid slot and
    /// exactly once in the registry. Cheap enough for tests and debug
    /// builds; disagreement means corrupted simulation state.
    pub fn assert_consistent(&self) {
        let mut seen: FxHashSet<CellId> = FxHashSet::default();
        for (slot, handle) in self.grid.iter().enumerate() {
            if let Some(id) = handle {
                assert!(seen.insert(*id), "cell {} occupies two grid slots", id);
                let cell = self.registry_get(*id);
                assert_eq!(
                    self.index(cell.position()),
                    slot,
                    "cell {} position disagrees with its grid slot",
                    id
                );
                assert!(cell.is_alive(), "dead cell {} still on the grid", id);
            }
        }
        assert_eq!(seen.len(), self.cells.len(), "registry holds off-grid cells");
        assert_eq!(seen.len(), self.population, "population counter out of sync");
    }

    // ========================================================================
    // NEIGHBOURHOOD QUERIES
    // ========================================================================

    /// Live neighbours of `pos` in fixed offset order, the cell at `pos`
    /// excluded. On small tori several offsets can alias the same slot;
    /// duplicates are dropped.
    fn neighbour_ids(&self, pos: Position, exclude: CellId) -> Vec<CellId> {
        let mut out = Vec::with_capacity(8);
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            if let Some(id) = self.grid[self.index(pos.offset(dx, dy))] {
                if id != exclude && !out.contains(&id) {
                    out.push(id);
                }
            }
        }
        out
    }

    /// A uniformly random empty slot adjacent to `pos`, or `None` when
    /// the whole neighbourhood is occupied
    fn empty_neighbour_position<R: Rng>(&self, pos: Position, rng: &mut R) -> Option<Position> {
        let mut candidates = Vec::with_capacity(8);
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let wrapped = self.wrap(pos.offset(dx, dy));
            if self.grid[self.index(wrapped)].is_none() && !candidates.contains(&wrapped) {
                candidates.push(wrapped);
            }
        }
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    /// Live cell ids in row-major grid order. The fixed traversal order
    /// keeps runs reproducible for a given seed.
    fn live_ids(&self) -> Vec<CellId> {
        self.grid.iter().filter_map(|slot| *slot).collect()
    }

    // ========================================================================
    // TICK PHASES
    // ========================================================================

    /// Advance the simulation by one generation
    pub fn tick<R: Rng>(&mut self, interactions: u32, rng: &mut R) {
        self.clean();
        if self.config.ageing {
            self.age_tick();
        }
        for _ in 0..interactions {
            self.interaction_tick();
            self.death_tick();
            self.movement_tick(rng);
        }
        self.reproduction_tick(rng);

        #[cfg(debug_assertions)]
        self.assert_consistent();

        tracing::debug!(
            population = self.population,
            born = self.total_born,
            died = self.total_died,
            "tick complete"
        );
    }

    /// Reset every cell's interaction history and score baseline
    fn clean(&mut self) {
        let loss = self.config.loss_per_tick;
        for id in self.live_ids() {
            let cell = self.registry_get_mut(id);
            cell.clear_interactions();
            cell.reset_score(loss);
        }
    }

    fn age_tick(&mut self) {
        for id in self.live_ids() {
            self.registry_get_mut(id).tick_age();
        }
    }

    /// Every live cell plays one round against each of its neighbours.
    /// Only the acting cell's score and memory change; the neighbour
    /// answers from its current state and gets its own turn later in the
    /// same scan.
    fn interaction_tick(&mut self) {
        for id in self.live_ids() {
            let pos = self.registry_get(id).position();
            for neighbour in self.neighbour_ids(pos, id) {
                let their_move = self.registry_get(neighbour).decide();
                self.registry_get_mut(id).interact_with(their_move);
            }
        }
    }

    /// Remove every cell whose death predicate holds
    fn death_tick(&mut self) {
        let threshold = self.config.death_threshold;
        let age_limit = if self.config.ageing {
            self.config.max_age
        } else {
            None
        };
        for id in self.live_ids() {
            let cell = self.registry_get(id);
            if cell.is_dead(threshold, age_limit) {
                let pos = cell.position();
                let mut removed = self
                    .clear_slot(pos)
                    .expect("dying cell vanished from its slot");
                removed.mark_dead();
                self.population -= 1;
                self.total_died += 1;
            }
        }
    }

    /// The lowest-scoring `move_ratio` fraction of the population each
    /// gets a `move_chance` shot at relocating to a random empty
    /// neighbouring slot. Cells with no empty neighbour stay put; moving
    /// never changes a score.
    fn movement_tick<R: Rng>(&mut self, rng: &mut R) {
        let mut ids = self.live_ids();
        ids.sort_by_key(|id| self.registry_get(*id).score());
        ids.truncate(fraction_of(self.population, self.config.move_ratio));

        for id in ids {
            if !rng.gen_bool(self.config.move_chance) {
                continue;
            }
            let pos = self.registry_get(id).position();
            if let Some(destination) = self.empty_neighbour_position(pos, rng) {
                self.move_cell(id, destination);
            }
        }
    }

    fn move_cell(&mut self, id: CellId, destination: Position) {
        let origin = self.registry_get(id).position();
        let from = self.index(origin);
        let to = self.index(destination);
        debug_assert_eq!(self.grid[from], Some(id));
        debug_assert!(self.grid[to].is_none());
        self.grid[from] = None;
        self.grid[to] = Some(id);
        let wrapped = self.wrap(destination);
        self.registry_get_mut(id).set_position(wrapped);
    }

    /// Once per tick: the top-scoring `reproduction_ratio` fraction pair
    /// up with their best-scoring neighbour and, when an empty adjacent
    /// slot exists, produce one offspring there. Each parent is consumed
    /// at most once per phase; candidates missing any precondition are
    /// skipped, not retried.
    fn reproduction_tick<R: Rng>(&mut self, rng: &mut R) {
        let mut candidates = self.live_ids();
        candidates.sort_by_key(|id| std::cmp::Reverse(self.registry_get(*id).score()));
        candidates.truncate(fraction_of(self.population, self.config.reproduction_ratio));

        let mut consumed: FxHashSet<CellId> = FxHashSet::default();
        for id in candidates {
            if consumed.contains(&id) {
                continue;
            }
            let pos = self.registry_get(id).position();
            let Some(open) = self.empty_neighbour_position(pos, rng) else {
                continue;
            };
            let neighbours = self.neighbour_ids(pos, id);
            let Some(mate) = best_scoring(&self.cells, &neighbours) else {
                continue;
            };
            if consumed.contains(&mate) {
                continue;
            }

            consumed.insert(id);
            consumed.insert(mate);
            let child_id = self.allocate_id();
            let child = Cell::offspring(
                child_id,
                open,
                self.registry_get(id),
                self.registry_get(mate),
                &self.config,
                rng,
            );
            self.place(open, child);
        }
    }
}

/// First id with the maximum score; ties resolve to the earliest entry,
/// matching the fixed neighbourhood traversal order
fn best_scoring(cells: &FxHashMap<CellId, Cell>, ids: &[CellId]) -> Option<CellId> {
    let mut best: Option<(CellId, i64)> = None;
    for &id in ids {
        let score = cells
            .get(&id)
            .expect("grid handle missing from cell registry")
            .score();
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// `floor(ratio * count)`
fn fraction_of(count: usize, ratio: f64) -> usize {
    (count as f64 * ratio).floor() as usize
}
