//! Grammar-driven ridge generator.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::gradient::{paint_path, GradientParams};
use super::heightfield::{HeightField, MergeMode};
use super::profile::{profile_heights, ProfileParams};
use crate::grammar::{derive, RuleSet};
use crate::noise::{stream_seed, PermutationTable, ShuffleBound};
use crate::skeleton::{GraphConfig, SkeletonBuilder, SkeletonEvent, SkeletonPath, TurtleOp};

/// Fraction of the peak height detail passes are painted at.
const DETAIL_SCALE: f32 = 0.1;

/// Everything one graph walk produced.
#[derive(Debug, Clone)]
pub struct GraphTrace {
    /// Ridge field with the detail field added in.
    pub field: HeightField,
    /// Each profiled path, in the order it was painted.
    pub ridges: Vec<SkeletonPath>,
    /// Length in bytes of the derived symbol string.
    pub derived_len: usize,
    /// Branch-close symbols met with no open branch.
    pub unmatched_closes: usize,
}

/// Owns the random stream, lattice table and rules of one generator.
///
/// All randomness comes from the stream bound by [`ElevationGenerator::init`];
/// the same seed, size and parameters reproduce the same raster.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    seed: i32,
    width: u32,
    height: u32,
    rng: ChaCha8Rng,
    table: PermutationTable,
    rules: RuleSet,
}

impl ElevationGenerator {
    pub fn new(seed: i32, width: u32, height: u32) -> Self {
        let mut generator = Self {
            seed,
            width,
            height,
            rng: ChaCha8Rng::seed_from_u64(stream_seed(seed)),
            table: PermutationTable::canonical(),
            rules: RuleSet::default(),
        };
        generator.init(seed, width, height);
        generator
    }

    /// Binds the raster size and seed, and reshuffles the table.
    pub fn init(&mut self, seed: i32, width: u32, height: u32) {
        self.seed = seed;
        self.width = width;
        self.height = height;
        self.rng = ChaCha8Rng::seed_from_u64(stream_seed(seed));
        self.table.reshuffle(&mut self.rng, ShuffleBound::Destination);
        log::debug!("elevation generator seeded with {} for {}x{}", seed, width, height);
    }

    /// Restores the unshuffled table. The random stream is left as is.
    pub fn reset_seed(&mut self) {
        self.table.reset();
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// Uniform point inside the centred `safe_zone` fraction of the raster.
    pub fn random_coord(&mut self, safe_zone: f32) -> IVec2 {
        let safe_zone = safe_zone.clamp(0.0, 1.0);
        let half = (1.0 - safe_zone) / 2.0;
        let mut axis = |extent: u32| {
            let lo = (half * extent as f32) as i32;
            let hi = ((safe_zone + half) * extent as f32) as i32;
            self.rng.gen_range(lo..=hi.max(lo))
        };
        let x = axis(self.width);
        let y = axis(self.height);
        IVec2::new(x, y)
    }

    pub fn center_coord(&self) -> IVec2 {
        IVec2::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Derives the grammar, walks it and returns the painted raster.
    ///
    /// Valley symbols profile the current path and paint it into the ridge
    /// field with max merging; detail symbols paint a low overlay that is
    /// added on top once the walk ends.
    ///
    /// # Arguments
    /// * `config` - Rules, axiom, walk and footprint parameters
    pub fn generate_graph(&mut self, config: &GraphConfig) -> HeightField {
        self.generate_graph_traced(config).field
    }

    /// Like [`generate_graph`](Self::generate_graph), also returning the
    /// profiled skeleton paths.
    ///
    /// # Returns
    /// The raster together with every profiled ridge, the derived length and
    /// the count of ignored branch-close symbols.
    pub fn generate_graph_traced(&mut self, config: &GraphConfig) -> GraphTrace {
        let floor = config.start_height.clamp(0, u8::MAX as i32) as u8;
        let mut ridge = HeightField::filled(self.width, self.height, floor);
        let mut detail = HeightField::new(self.width, self.height);

        self.rules = RuleSet::parse(&config.rules);
        let derived = derive(
            &self.rules,
            &config.axiom,
            config.iterations,
            config.max_derivation_len,
            &mut self.rng,
        );
        log::debug!("derived {} symbols from axiom {:?}", derived.len(), config.axiom);

        let ridge_params = GradientParams {
            radius: config.radius,
            peak_height: config.peak_height,
            skew: config.skew,
            fill_degree: config.fill_degree,
            top_blend: config.top_blend,
        };
        let detail_height = (config.peak_height as f32 * DETAIL_SCALE) as i32;
        let detail_params = GradientParams {
            radius: (DETAIL_SCALE * config.radius as f32) as i32,
            peak_height: detail_height,
            skew: 0.0,
            fill_degree: 180,
            top_blend: 0.5 * config.top_blend,
        };

        let mut builder = SkeletonBuilder::new(config.start, config.step_length, config.turn_angle());
        let mut ridges = Vec::new();
        let mut detail_passes = 0usize;
        for sym in derived.chars() {
            match builder.apply(TurtleOp::from_symbol(sym), &mut self.rng) {
                Some(SkeletonEvent::Valley { peak_index }) => {
                    let profile = ProfileParams {
                        peak_height: config.peak_height,
                        peak_index,
                        displacement: (config.peak_height / 2) as f32,
                        iterations: config.displacement_iterations,
                        smoothness: config.displacement_smoothness,
                    };
                    profile_heights(builder.path_mut(), &profile, &mut self.rng);
                    let cells = paint_path(&mut ridge, builder.path(), &ridge_params, MergeMode::Max);
                    log::trace!(
                        "ridge of {} samples, peak at {}, {} cells raised",
                        builder.path().len(),
                        peak_index,
                        cells
                    );
                    ridges.push(builder.path().clone());
                }
                Some(SkeletonEvent::Detail) => {
                    for point in builder.path_mut().iter_mut() {
                        point.height = detail_height;
                    }
                    paint_path(&mut detail, builder.path(), &detail_params, MergeMode::Overwrite);
                    detail_passes += 1;
                }
                None => {}
            }
        }

        if builder.unmatched_closes() > 0 {
            log::warn!(
                "ignored {} branch-close symbols with no open branch",
                builder.unmatched_closes()
            );
        }

        log::debug!(
            "walked {} symbols: {} ridges, {} detail passes",
            derived.len(),
            ridges.len(),
            detail_passes
        );
        ridge.add_field(&detail);
        GraphTrace {
            field: ridge,
            ridges,
            derived_len: derived.len(),
            unmatched_closes: builder.unmatched_closes(),
        }
    }
}
