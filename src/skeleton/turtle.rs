//! Turtle interpretation of a derived symbol string.

use glam::IVec2;
use rand::Rng;

use super::line::extend_line;
use super::point::{BranchStack, SkeletonPath, TerrainPoint};
use crate::grammar::symbol;

/// Operation bound to one symbol of the turtle alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurtleOp {
    Move,
    MarkPeak,
    MarkValley,
    MarkDetail,
    TurnLeft,
    TurnRight,
    BranchOpen,
    BranchClose,
    /// Caller-defined literal with no turtle meaning.
    PassThrough(char),
}

impl TurtleOp {
    pub fn from_symbol(sym: char) -> Self {
        match sym {
            symbol::MOVE | symbol::MOVE_ALT => TurtleOp::Move,
            symbol::PEAK => TurtleOp::MarkPeak,
            symbol::VALLEY => TurtleOp::MarkValley,
            symbol::DETAIL => TurtleOp::MarkDetail,
            symbol::TURN_LEFT => TurtleOp::TurnLeft,
            symbol::TURN_RIGHT => TurtleOp::TurnRight,
            symbol::BRANCH_OPEN => TurtleOp::BranchOpen,
            symbol::BRANCH_CLOSE => TurtleOp::BranchClose,
            other => TurtleOp::PassThrough(other),
        }
    }
}

/// Work the caller must do on the current path after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonEvent {
    /// Profile the path up to `peak_index` and paint it as a ridge.
    Valley { peak_index: usize },
    /// Paint the path as fine detail.
    Detail,
}

/// Turn angle policy: fixed, or uniform in `[min, max]` when the two differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnAngle {
    pub min: i32,
    pub max: i32,
}

impl TurnAngle {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Walk state: the current path, open branches and the peak marker.
#[derive(Debug, Clone)]
pub struct SkeletonBuilder {
    path: SkeletonPath,
    stack: BranchStack,
    peak_index: usize,
    step_length: i32,
    turn: TurnAngle,
    unmatched_closes: usize,
}

impl SkeletonBuilder {
    pub fn new(start: IVec2, step_length: i32, turn: TurnAngle) -> Self {
        Self {
            path: vec![TerrainPoint::new(start.x, start.y, 0)],
            stack: BranchStack::new(),
            peak_index: 0,
            step_length,
            turn,
            unmatched_closes: 0,
        }
    }

    /// Applies one operation and reports any painting work it triggers.
    pub fn apply<R: Rng + ?Sized>(&mut self, op: TurtleOp, rng: &mut R) -> Option<SkeletonEvent> {
        match op {
            TurtleOp::Move => extend_line(&mut self.path, self.step_length),
            TurtleOp::MarkPeak => self.peak_index = self.path.len().saturating_sub(1),
            TurtleOp::MarkValley => {
                if self.path.len() > 2 {
                    return Some(SkeletonEvent::Valley {
                        peak_index: self.peak_index.min(self.path.len() - 1),
                    });
                }
            }
            TurtleOp::MarkDetail => {
                if self.path.len() > 1 {
                    return Some(SkeletonEvent::Detail);
                }
            }
            TurtleOp::TurnLeft => {
                let angle = self.turn.sample(rng);
                self.tip_mut().rotate(angle);
            }
            TurtleOp::TurnRight => {
                let angle = self.turn.sample(rng);
                self.tip_mut().rotate(-angle);
            }
            TurtleOp::BranchOpen => self.stack.push(*self.tip()),
            TurtleOp::BranchClose => match self.stack.pop() {
                Some(root) => {
                    self.path.clear();
                    self.path.push(root);
                }
                None => self.unmatched_closes += 1,
            },
            TurtleOp::PassThrough(_) => {}
        }
        None
    }

    /// Last point of the current path.
    pub fn tip(&self) -> &TerrainPoint {
        // The path always holds at least its root point.
        &self.path[self.path.len() - 1]
    }

    fn tip_mut(&mut self) -> &mut TerrainPoint {
        let last = self.path.len() - 1;
        &mut self.path[last]
    }

    pub fn path(&self) -> &SkeletonPath {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut SkeletonPath {
        &mut self.path
    }

    pub fn peak_index(&self) -> usize {
        self.peak_index
    }

    pub fn branch_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Branch-close symbols seen with no open branch.
    pub fn unmatched_closes(&self) -> usize {
        self.unmatched_closes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn builder() -> SkeletonBuilder {
        SkeletonBuilder::new(IVec2::new(10, 10), 3, TurnAngle::new(30, 30))
    }

    fn run(b: &mut SkeletonBuilder, text: &str) -> Vec<SkeletonEvent> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        text.chars()
            .filter_map(|c| b.apply(TurtleOp::from_symbol(c), &mut rng))
            .collect()
    }

    #[test]
    fn test_symbol_dispatch() {
        assert_eq!(TurtleOp::from_symbol('F'), TurtleOp::Move);
        assert_eq!(TurtleOp::from_symbol('D'), TurtleOp::Move);
        assert_eq!(TurtleOp::from_symbol('P'), TurtleOp::MarkPeak);
        assert_eq!(TurtleOp::from_symbol('L'), TurtleOp::MarkValley);
        assert_eq!(TurtleOp::from_symbol('E'), TurtleOp::MarkDetail);
        assert_eq!(TurtleOp::from_symbol('+'), TurtleOp::TurnLeft);
        assert_eq!(TurtleOp::from_symbol('-'), TurtleOp::TurnRight);
        assert_eq!(TurtleOp::from_symbol('['), TurtleOp::BranchOpen);
        assert_eq!(TurtleOp::from_symbol(']'), TurtleOp::BranchClose);
        assert_eq!(TurtleOp::from_symbol('x'), TurtleOp::PassThrough('x'));
    }

    #[test]
    fn test_moves_and_peak() {
        let mut b = builder();
        let events = run(&mut b, "FFPFL");
        assert_eq!(b.path().len(), 10);
        assert_eq!(b.peak_index(), 6);
        assert_eq!(events, vec![SkeletonEvent::Valley { peak_index: 6 }]);
    }

    #[test]
    fn test_short_path_skips_events() {
        let mut b = builder();
        assert!(run(&mut b, "LE").is_empty());
    }

    #[test]
    fn test_turns_rotate_tip() {
        let mut b = builder();
        run(&mut b, "+");
        assert_eq!(b.tip().heading, 30);
        run(&mut b, "--");
        assert_eq!(b.tip().heading, 330);
    }

    #[test]
    fn test_random_turn_in_range() {
        let turn = TurnAngle::new(40, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let a = turn.sample(&mut rng);
            assert!((10..=40).contains(&a));
        }
    }

    #[test]
    fn test_branch_restores_root() {
        let mut b = builder();
        run(&mut b, "F[+FF]");
        assert_eq!(b.path().len(), 1);
        assert_eq!((b.tip().x, b.tip().y), (10, 13));
        assert_eq!(b.tip().heading, 0);
        assert_eq!(b.branch_depth(), 0);
    }

    #[test]
    fn test_unmatched_close_is_ignored() {
        let mut b = builder();
        run(&mut b, "F]F");
        assert_eq!(b.unmatched_closes(), 1);
        assert_eq!(b.path().len(), 7);
    }

    #[test]
    fn test_stale_peak_is_clamped() {
        let mut b = builder();
        let events = run(&mut b, "[FFFP]FL");
        assert_eq!(events, vec![SkeletonEvent::Valley { peak_index: 3 }]);
    }
}
