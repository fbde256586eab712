use crate::bindings::VariableBindings;
use crate::color::{swatch, Rgb};
use crate::error::SubmitError;
use crate::label::{format_label, LabelId, OverlayLabel, RecognitionResult};
use crate::protocol::{CalculateRequest, CalculateResponse};
use crate::raster::{DirtyRect, Raster, LINE_WIDTH};
use crate::{normalize_point, Point};

/// Pacing delay between a response arriving and each result being shown.
pub const REVEAL_DELAY_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawMode {
    Idle,
    Drawing { last: Point },
}

/// A serialized canvas ready to be posted, tagged with the epoch it was
/// taken in and the anchor its results will be placed at.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub epoch: u64,
    pub anchor: Point,
    pub request: CalculateRequest,
}

/// One result waiting for its reveal.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingReveal {
    pub epoch: u64,
    pub anchor: Point,
    pub expression: String,
    pub answer: String,
}

/// State of the drawing board: ink, palette choice, overlay labels and the
/// variables learned so far.
///
/// `epoch` advances on every reset. Submissions and reveals carry the epoch
/// they were created in and are dropped if it no longer matches, so a reset
/// is never undone by work that was in flight.
pub struct Board {
    raster: Raster,
    color: Rgb,
    mode: DrawMode,
    inked: bool,
    labels: Vec<OverlayLabel>,
    bindings: VariableBindings,
    current: Option<RecognitionResult>,
    epoch: u64,
    next_label_id: LabelId,
}

impl Board {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: Raster::new(width, height),
            color: Rgb::default(),
            mode: DrawMode::Idle,
            inked: false,
            labels: Vec::new(),
            bindings: VariableBindings::new(),
            current: None,
            epoch: 0,
            next_label_id: 1,
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, DrawMode::Drawing { .. })
    }

    /// Set once the first stroke begins; the surface turns black from then on.
    pub fn inked(&self) -> bool {
        self.inked
    }

    pub fn labels(&self) -> &[OverlayLabel] {
        &self.labels
    }

    pub fn label(&self, id: LabelId) -> Option<&OverlayLabel> {
        self.labels.iter().find(|label| label.id == id)
    }

    pub fn bindings(&self) -> &VariableBindings {
        &self.bindings
    }

    pub fn current(&self) -> Option<&RecognitionResult> {
        self.current.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn select_swatch(&mut self, index: usize) -> bool {
        match swatch(index) {
            Some(color) => {
                self.color = color;
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.raster.resize(width, height);
    }

    pub fn pointer_down(&mut self, point: Point) {
        let Some(point) = normalize_point(point) else {
            return;
        };
        self.inked = true;
        self.mode = DrawMode::Drawing { last: point };
    }

    pub fn pointer_move(&mut self, point: Point) -> Option<DirtyRect> {
        let point = normalize_point(point)?;
        let DrawMode::Drawing { last } = self.mode else {
            return None;
        };
        self.mode = DrawMode::Drawing { last: point };
        self.raster
            .stroke_segment(last, point, self.color, LINE_WIDTH)
    }

    pub fn pointer_up(&mut self) {
        self.mode = DrawMode::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Center of the bounding box of everything currently inked.
    pub fn anchor(&self) -> Point {
        self.raster.opaque_bounds().center()
    }

    pub fn prepare_submission(&self) -> Result<Submission, SubmitError> {
        let image = self.raster.to_png_data_url()?;
        Ok(Submission {
            epoch: self.epoch,
            anchor: self.anchor(),
            request: CalculateRequest {
                image,
                dict_of_vars: self.bindings.snapshot(),
            },
        })
    }

    /// Folds a response into the board. Assignments are merged into the
    /// bindings and every entry becomes a pending reveal at the submission's
    /// anchor. Returns `None` for a response to a submission from before the
    /// last reset; the board is left untouched.
    pub fn accept_response(
        &mut self,
        submission: &Submission,
        response: &CalculateResponse,
    ) -> Option<Vec<PendingReveal>> {
        if submission.epoch != self.epoch {
            return None;
        }
        self.bindings.merge_assignments(&response.data);
        let reveals = response
            .data
            .iter()
            .map(|entry| PendingReveal {
                epoch: submission.epoch,
                anchor: submission.anchor,
                expression: entry.expr.clone(),
                answer: entry.result.clone(),
            })
            .collect();
        Some(reveals)
    }

    /// Shows a pending result: appends its label and wipes the ink.
    pub fn reveal(&mut self, pending: PendingReveal) -> Option<LabelId> {
        if pending.epoch != self.epoch {
            return None;
        }
        let id = self.next_label_id;
        self.next_label_id += 1;
        self.labels.push(OverlayLabel {
            id,
            latex: format_label(&pending.expression, &pending.answer),
            position: pending.anchor,
        });
        self.current = Some(RecognitionResult {
            expression: pending.expression,
            answer: pending.answer,
        });
        self.raster.clear();
        Some(id)
    }

    pub fn drag_label(&mut self, id: LabelId, position: Point) -> bool {
        let Some(position) = normalize_point(position) else {
            return false;
        };
        match self.labels.iter_mut().find(|label| label.id == id) {
            Some(label) => {
                label.position = position;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.raster.clear();
        self.labels.clear();
        self.current = None;
        self.bindings.clear();
        self.mode = DrawMode::Idle;
        self.epoch += 1;
    }
}
