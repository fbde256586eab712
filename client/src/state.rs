use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use mathboard_shared::{Board, LabelId, Point};

pub enum DragMode {
    Idle,
    Dragging {
        id: LabelId,
        pointer_id: i32,
        start_x: f64,
        start_y: f64,
        origin: Point,
    },
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: Option<CanvasRenderingContext2d>,
    pub board: Board,
    pub palette_selected: Option<usize>,
    pub drag: DragMode,
    pub api_url: String,
    pub in_flight: usize,
}

impl State {
    pub fn new(
        canvas: HtmlCanvasElement,
        ctx: Option<CanvasRenderingContext2d>,
        api_url: String,
    ) -> Self {
        let board = Board::new(canvas.width(), canvas.height());
        Self {
            canvas,
            ctx,
            board,
            palette_selected: None,
            drag: DragMode::Idle,
            api_url,
            in_flight: 0,
        }
    }
}
