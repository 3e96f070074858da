//! Zen Sorting round state and drag resolution
//!
//! No timer, no lives, no randomness: three stones, three bowls, and a
//! single latching `placed` flag per stone. The only transient state is
//! the wrong-bowl highlight window.

use glam::Vec2;

use crate::circle_contains;
use crate::consts::*;

/// Current phase of a sorting round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GardenPhase {
    /// Input accepted, stones still unsorted
    Running,
    /// Terminal: every stone placed
    Complete,
}

/// Stone/bowl color category. A stone belongs in exactly one bowl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoneKind {
    Blue,
    Green,
    Pink,
}

impl StoneKind {
    pub const ALL: [StoneKind; 3] = [StoneKind::Blue, StoneKind::Green, StoneKind::Pink];

    pub fn name(self) -> &'static str {
        match self {
            StoneKind::Blue => "blue",
            StoneKind::Green => "green",
            StoneKind::Pink => "pink",
        }
    }
}

/// A draggable stone
#[derive(Debug, Clone, PartialEq)]
pub struct Stone {
    pub kind: StoneKind,
    pub pos: Vec2,
    /// Where the stone snaps back to on an invalid drop
    pub home: Vec2,
    pub radius: f32,
    /// Latches true on a correct drop and never unlatches
    pub placed: bool,
    /// True only while held by the pointer
    pub dragging: bool,
}

/// A fixed target bowl
#[derive(Debug, Clone, PartialEq)]
pub struct Bowl {
    pub kind: StoneKind,
    pub pos: Vec2,
    pub radius: f32,
}

/// A wrong-category drop, anchored to the moment it happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrongDrop {
    /// Index into `bowls` of the flagged bowl
    pub bowl: usize,
    pub at_ms: f64,
}

/// Stone rest positions along the bottom row
const STONE_HOMES: [(f32, f32); 3] = [(200.0, 450.0), (300.0, 450.0), (400.0, 450.0)];
/// Bowl centers along the top row
const BOWL_CENTERS: [(f32, f32); 3] = [(250.0, 200.0), (450.0, 200.0), (650.0, 200.0)];

/// One Zen Sorting playthrough
#[derive(Debug, Clone)]
pub struct GardenRound {
    pub stones: Vec<Stone>,
    pub bowls: Vec<Bowl>,
    phase: GardenPhase,
    dragged: Option<usize>,
    wrong_drop: Option<WrongDrop>,
}

impl Default for GardenRound {
    fn default() -> Self {
        Self::new()
    }
}

impl GardenRound {
    pub fn new() -> Self {
        let stones = StoneKind::ALL
            .iter()
            .zip(STONE_HOMES)
            .map(|(&kind, (x, y))| Stone {
                kind,
                pos: Vec2::new(x, y),
                home: Vec2::new(x, y),
                radius: STONE_RADIUS,
                placed: false,
                dragging: false,
            })
            .collect();
        let bowls = StoneKind::ALL
            .iter()
            .zip(BOWL_CENTERS)
            .map(|(&kind, (x, y))| Bowl {
                kind,
                pos: Vec2::new(x, y),
                radius: BOWL_RADIUS,
            })
            .collect();
        Self {
            stones,
            bowls,
            phase: GardenPhase::Running,
            dragged: None,
            wrong_drop: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GardenPhase::Complete
    }

    /// The bowl currently flagged for wrong-drop feedback, if the 1200 ms
    /// window is still open at `now_ms`. Dropping another stone wrongly
    /// re-targets the flag; nothing else clears it early.
    pub fn wrong_bowl(&self, now_ms: f64) -> Option<usize> {
        self.wrong_drop
            .filter(|w| now_ms - w.at_ms < WRONG_FLASH_MS)
            .map(|w| w.bowl)
    }

    /// Begin a drag on the topmost unplaced stone under the pointer.
    /// Stones are drawn in index order, so the topmost is the last match.
    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.phase == GardenPhase::Complete {
            return;
        }
        for i in (0..self.stones.len()).rev() {
            let stone = &mut self.stones[i];
            if !stone.placed && circle_contains(stone.pos, stone.radius, pos) {
                stone.dragging = true;
                self.dragged = Some(i);
                break;
            }
        }
    }

    /// Latch the dragged stone to the pointer. No physics, no inertia.
    pub fn pointer_move(&mut self, pos: Vec2) {
        if let Some(i) = self.dragged {
            self.stones[i].pos = pos;
        }
    }

    /// Drop the dragged stone: snap into a matching bowl, flag a wrong
    /// bowl, or return home silently.
    pub fn pointer_up(&mut self, now_ms: f64) {
        let Some(i) = self.dragged.take() else {
            return;
        };
        let stone = &mut self.stones[i];
        stone.dragging = false;

        let mut resolved = false;
        for (bi, bowl) in self.bowls.iter().enumerate() {
            if circle_contains(bowl.pos, bowl.radius, stone.pos) {
                if bowl.kind == stone.kind {
                    stone.pos = bowl.pos;
                    stone.placed = true;
                } else {
                    stone.pos = stone.home;
                    self.wrong_drop = Some(WrongDrop {
                        bowl: bi,
                        at_ms: now_ms,
                    });
                }
                resolved = true;
                break;
            }
        }
        if !resolved {
            stone.pos = stone.home;
        }
    }

    /// Per-frame terminal check; the sorting game has nothing to integrate.
    pub fn frame(&mut self, _now_ms: f64) {
        if self.phase == GardenPhase::Complete {
            return;
        }
        if self.stones.iter().all(|s| s.placed) {
            self.phase = GardenPhase::Complete;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: f64 = 5_000.0;

    fn bowl_pos(round: &GardenRound, kind: StoneKind) -> Vec2 {
        round.bowls.iter().find(|b| b.kind == kind).unwrap().pos
    }

    fn stone_index(round: &GardenRound, kind: StoneKind) -> usize {
        round.stones.iter().position(|s| s.kind == kind).unwrap()
    }

    /// Drag `kind` from wherever it rests and drop it at `target`
    fn drag_to(round: &mut GardenRound, kind: StoneKind, target: Vec2, now_ms: f64) {
        let start = round.stones[stone_index(round, kind)].pos;
        round.pointer_down(start);
        round.pointer_move(target);
        round.pointer_up(now_ms);
    }

    #[test]
    fn test_fresh_round_is_unsorted() {
        let round = GardenRound::new();
        assert!(!round.is_complete());
        assert_eq!(round.stones.len(), 3);
        assert_eq!(round.bowls.len(), 3);
        assert!(round.stones.iter().all(|s| !s.placed && !s.dragging));
        assert!(round.stones.iter().all(|s| s.pos == s.home));
    }

    #[test]
    fn test_correct_drops_in_any_order_complete_the_round() {
        for order in [
            [StoneKind::Blue, StoneKind::Green, StoneKind::Pink],
            [StoneKind::Pink, StoneKind::Blue, StoneKind::Green],
            [StoneKind::Green, StoneKind::Pink, StoneKind::Blue],
        ] {
            let mut round = GardenRound::new();
            for (i, kind) in order.into_iter().enumerate() {
                let target = bowl_pos(&round, kind);
                drag_to(&mut round, kind, target, T0 + i as f64 * 100.0);
                round.frame(T0 + i as f64 * 100.0);
            }
            assert!(round.is_complete());
            for stone in &round.stones {
                assert!(stone.placed);
                assert_eq!(stone.pos, bowl_pos(&round, stone.kind));
            }
        }
    }

    #[test]
    fn test_wrong_bowl_flags_for_exactly_the_flash_window() {
        let mut round = GardenRound::new();
        let green_bowl = bowl_pos(&round, StoneKind::Green);

        drag_to(&mut round, StoneKind::Blue, green_bowl, T0);

        // Blue snapped back to its exact home, unplaced.
        let blue = &round.stones[stone_index(&round, StoneKind::Blue)];
        assert_eq!(blue.pos, blue.home);
        assert!(!blue.placed && !blue.dragging);

        // Green bowl flagged from the drop instant for 1200 ms.
        let green_idx = round
            .bowls
            .iter()
            .position(|b| b.kind == StoneKind::Green)
            .unwrap();
        assert_eq!(round.wrong_bowl(T0), Some(green_idx));
        assert_eq!(round.wrong_bowl(T0 + WRONG_FLASH_MS - 1.0), Some(green_idx));
        assert_eq!(round.wrong_bowl(T0 + WRONG_FLASH_MS), None);
    }

    #[test]
    fn test_flash_window_not_reset_by_other_stones() {
        let mut round = GardenRound::new();
        let green_bowl = bowl_pos(&round, StoneKind::Green);
        drag_to(&mut round, StoneKind::Blue, green_bowl, T0);

        // A correct drop of another stone must not extend the window.
        let pink_bowl = bowl_pos(&round, StoneKind::Pink);
        drag_to(&mut round, StoneKind::Pink, pink_bowl, T0 + 600.0);

        assert!(round.wrong_bowl(T0 + WRONG_FLASH_MS - 1.0).is_some());
        assert!(round.wrong_bowl(T0 + WRONG_FLASH_MS).is_none());
    }

    #[test]
    fn test_drop_on_no_bowl_returns_home_silently() {
        let mut round = GardenRound::new();
        drag_to(&mut round, StoneKind::Green, Vec2::new(700.0, 500.0), T0);

        let green = &round.stones[stone_index(&round, StoneKind::Green)];
        assert_eq!(green.pos, green.home);
        assert!(!green.placed);
        assert!(round.wrong_bowl(T0).is_none());
    }

    #[test]
    fn test_placed_stone_cannot_be_picked_up_again() {
        let mut round = GardenRound::new();
        let blue_bowl = bowl_pos(&round, StoneKind::Blue);
        drag_to(&mut round, StoneKind::Blue, blue_bowl, T0);

        // Try to drag it out of the bowl.
        round.pointer_down(blue_bowl);
        round.pointer_move(Vec2::new(100.0, 100.0));
        round.pointer_up(T0 + 100.0);

        let blue = &round.stones[stone_index(&round, StoneKind::Blue)];
        assert!(blue.placed);
        assert_eq!(blue.pos, blue_bowl);
    }

    #[test]
    fn test_drag_latches_stone_to_pointer() {
        let mut round = GardenRound::new();
        let start = round.stones[0].pos;
        round.pointer_down(start);
        assert!(round.stones[0].dragging);

        round.pointer_move(Vec2::new(10.0, 10.0));
        assert_eq!(round.stones[0].pos, Vec2::new(10.0, 10.0));
        round.pointer_move(Vec2::new(620.0, 480.0));
        assert_eq!(round.stones[0].pos, Vec2::new(620.0, 480.0));
    }

    #[test]
    fn test_move_and_up_without_down_are_noops() {
        let mut round = GardenRound::new();
        let before = round.stones.clone();
        round.pointer_move(Vec2::new(50.0, 50.0));
        round.pointer_up(T0);
        assert_eq!(round.stones, before);
    }

    #[test]
    fn test_complete_round_ignores_input() {
        let mut round = GardenRound::new();
        for kind in StoneKind::ALL {
            let target = bowl_pos(&round, kind);
            drag_to(&mut round, kind, target, T0);
        }
        round.frame(T0);
        assert!(round.is_complete());

        let before = round.stones.clone();
        round.pointer_down(before[0].pos);
        round.pointer_move(Vec2::new(0.0, 0.0));
        round.pointer_up(T0 + 100.0);
        round.frame(T0 + 100.0);
        assert_eq!(round.stones, before);
    }
}
