//! Canvas layout for generated nodes.
//!
//! Positions only matter to the n8n editor. Graph construction asks a
//! [`LayoutStrategy`] for coordinates so headless consumers can ignore layout.

use super::node::Position;

/// Slot a node occupies in the generated layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSlot {
    Trigger,
    Agent,
    LanguageModel,
    Memory,
    OutputParser,
    /// Zero-based index among emitted tool nodes
    Tool(usize),
}

/// Assigns canvas positions to node slots.
pub trait LayoutStrategy: Send + Sync {
    fn position(&self, slot: LayoutSlot) -> Position;
}

/// Default editor layout: trigger on the left, agent top centre, its
/// sub-nodes in a row underneath, tools stepping right and down.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasLayout;

const TOOL_ORIGIN: Position = Position(380, 220);
const TOOL_STEP_X: i32 = 120;
const TOOL_STEP_Y: i32 = 40;

impl LayoutStrategy for CanvasLayout {
    fn position(&self, slot: LayoutSlot) -> Position {
        match slot {
            LayoutSlot::Trigger => Position(-500, 20),
            LayoutSlot::Agent => Position(220, 0),
            LayoutSlot::LanguageModel => Position(140, 220),
            LayoutSlot::Memory => Position(260, 220),
            LayoutSlot::OutputParser => Position(640, 220),
            LayoutSlot::Tool(index) => {
                let step = i32::try_from(index).unwrap_or(i32::MAX / TOOL_STEP_X);
                Position(
                    TOOL_ORIGIN.x().saturating_add(step.saturating_mul(TOOL_STEP_X)),
                    TOOL_ORIGIN.y().saturating_add(step.saturating_mul(TOOL_STEP_Y)),
                )
            }
        }
    }
}

/// Places every node at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessLayout;

impl LayoutStrategy for HeadlessLayout {
    fn position(&self, _slot: LayoutSlot) -> Position {
        Position::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_trigger_is_distinct_anchor() {
        let layout = CanvasLayout;
        let trigger = layout.position(LayoutSlot::Trigger);

        let others = [
            LayoutSlot::Agent,
            LayoutSlot::LanguageModel,
            LayoutSlot::Memory,
            LayoutSlot::OutputParser,
            LayoutSlot::Tool(0),
            LayoutSlot::Tool(3),
        ];
        for slot in others {
            assert_ne!(layout.position(slot), trigger);
        }
    }

    #[test]
    fn test_canvas_tools_step_right_and_down() {
        let layout = CanvasLayout;
        assert_eq!(layout.position(LayoutSlot::Tool(0)), Position(380, 220));
        assert_eq!(layout.position(LayoutSlot::Tool(1)), Position(500, 260));
        assert_eq!(layout.position(LayoutSlot::Tool(2)), Position(620, 300));
    }

    #[test]
    fn test_canvas_huge_index_does_not_overflow() {
        let pos = CanvasLayout.position(LayoutSlot::Tool(usize::MAX));
        assert!(pos.x() > 0);
    }

    #[test]
    fn test_headless_layout() {
        assert_eq!(HeadlessLayout.position(LayoutSlot::Agent), Position(0, 0));
        assert_eq!(HeadlessLayout.position(LayoutSlot::Tool(7)), Position(0, 0));
    }
}
