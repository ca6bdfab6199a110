use crate::{CoverageMask, Polygon};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("annotation session already terminated")]
    Terminated,
}

/// Where the session currently is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// No in-progress polygon.
    Idle,
    /// At least one point accumulated, not yet finalized.
    Drawing,
    /// Terminal; mask and polygon list are frozen.
    Terminated,
}

/// One step of an annotation session, as delivered by an external input
/// source (interactive frontend, script file, test driver).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnnotationEvent {
    AddPoint { x: f32, y: f32 },
    FinalizePolygon,
    UndoPolygon,
    Terminate,
}

/// Frozen result of a terminated session.
#[derive(Clone, Debug)]
pub struct SessionOutcome {
    pub mask: CoverageMask,
    pub polygons: Vec<Polygon>,
}

/// One terrain-annotation session over a single board buffer.
///
/// Events must be applied in the order issued; the mask state is a function
/// of event history. The mask always holds the union of the committed
/// polygons: overlapping footprints are never double counted, and undo
/// rebuilds the mask from scratch instead of subtracting.
#[derive(Clone, Debug)]
pub struct AnnotationSession {
    state: SessionState,
    current: Vec<Point2<f32>>,
    committed: Vec<Polygon>,
    mask: CoverageMask,
}

impl AnnotationSession {
    /// Start a session over a `width` x `height` buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            state: SessionState::Idle,
            current: Vec::new(),
            committed: Vec::new(),
            mask: CoverageMask::new(width, height),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mask(&self) -> &CoverageMask {
        &self.mask
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.committed
    }

    /// Vertices of the polygon currently being drawn.
    pub fn in_progress(&self) -> &[Point2<f32>] {
        &self.current
    }

    /// Dispatch one event from the input source.
    pub fn apply(&mut self, event: AnnotationEvent) -> Result<(), SessionError> {
        match event {
            AnnotationEvent::AddPoint { x, y } => self.add_point(Point2::new(x, y)),
            AnnotationEvent::FinalizePolygon => self.finalize_polygon(),
            AnnotationEvent::UndoPolygon => self.undo_last_polygon(),
            AnnotationEvent::Terminate => self.terminate(),
        }
    }

    /// Append a vertex to the in-progress polygon.
    pub fn add_point(&mut self, p: Point2<f32>) -> Result<(), SessionError> {
        self.check_active()?;
        self.current.push(p);
        self.state = SessionState::Drawing;
        Ok(())
    }

    /// Commit the in-progress polygon and rasterize it into the mask.
    ///
    /// A polygon with fewer than 3 points is discarded silently; degenerate
    /// shapes never enter the committed set.
    pub fn finalize_polygon(&mut self) -> Result<(), SessionError> {
        self.check_active()?;
        let poly = Polygon::new(std::mem::take(&mut self.current));
        self.state = SessionState::Idle;

        if poly.is_degenerate() {
            log::debug!("dropping degenerate polygon ({} points)", poly.vertices.len());
            return Ok(());
        }

        poly.fill(&mut self.mask);
        self.committed.push(poly);
        log::debug!(
            "committed polygon #{}, mask now covers {} px",
            self.committed.len(),
            self.mask.covered_pixels()
        );
        Ok(())
    }

    /// Remove the most recently committed polygon, if any, and rebuild the
    /// mask from the remaining ones.
    pub fn undo_last_polygon(&mut self) -> Result<(), SessionError> {
        self.check_active()?;
        if self.committed.pop().is_none() {
            return Ok(());
        }
        self.mask.clear();
        for poly in &self.committed {
            poly.fill(&mut self.mask);
        }
        log::debug!(
            "undo: {} polygons remain, mask covers {} px",
            self.committed.len(),
            self.mask.covered_pixels()
        );
        Ok(())
    }

    /// End the session: finalize any in-progress polygon (the <3-point rule
    /// applies), then freeze. Valid exactly once.
    pub fn terminate(&mut self) -> Result<(), SessionError> {
        self.finalize_polygon()?;
        self.state = SessionState::Terminated;
        Ok(())
    }

    /// Consume the session and return its frozen mask and polygon list,
    /// terminating first if the caller has not.
    pub fn finish(mut self) -> SessionOutcome {
        if self.state != SessionState::Terminated {
            // Cannot fail on an active session.
            let _ = self.terminate();
        }
        SessionOutcome {
            mask: self.mask,
            polygons: self.committed,
        }
    }

    fn check_active(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Terminated {
            return Err(SessionError::Terminated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_rect(s: &mut AnnotationSession, x0: f32, y0: f32, x1: f32, y1: f32) {
        for (x, y) in [(x0, y0), (x1, y0), (x1, y1), (x0, y1)] {
            s.add_point(Point2::new(x, y)).unwrap();
        }
        s.finalize_polygon().unwrap();
    }

    #[test]
    fn overlapping_polygons_union_not_sum() {
        // Two rects each covering 50% of a 20x20 buffer, overlapping in a
        // 25% band: union must be 75%, not 100%.
        let mut s = AnnotationSession::new(20, 20);
        add_rect(&mut s, 0.0, 0.0, 20.0, 10.0); // top half
        add_rect(&mut s, 0.0, 5.0, 20.0, 15.0); // middle half
        assert_eq!(s.mask().covered_pixels(), 300);
    }

    #[test]
    fn undo_matches_from_scratch_replay() {
        let mut s = AnnotationSession::new(30, 30);
        add_rect(&mut s, 0.0, 0.0, 12.0, 12.0);
        add_rect(&mut s, 6.0, 6.0, 20.0, 20.0);
        add_rect(&mut s, 15.0, 2.0, 28.0, 9.0);
        s.undo_last_polygon().unwrap();

        let mut reference = AnnotationSession::new(30, 30);
        add_rect(&mut reference, 0.0, 0.0, 12.0, 12.0);
        add_rect(&mut reference, 6.0, 6.0, 20.0, 20.0);

        assert_eq!(s.mask(), reference.mask());
        assert_eq!(s.polygons().len(), 2);
    }

    #[test]
    fn undo_with_no_polygons_is_a_noop() {
        let mut s = AnnotationSession::new(10, 10);
        s.undo_last_polygon().unwrap();
        assert_eq!(s.mask().covered_pixels(), 0);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn short_polygon_is_discarded() {
        let mut s = AnnotationSession::new(10, 10);
        s.add_point(Point2::new(1.0, 1.0)).unwrap();
        s.add_point(Point2::new(8.0, 8.0)).unwrap();
        assert_eq!(s.state(), SessionState::Drawing);

        s.finalize_polygon().unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.polygons().is_empty());
        assert_eq!(s.mask().covered_pixels(), 0);
    }

    #[test]
    fn terminate_finalizes_in_progress_polygon() {
        let mut s = AnnotationSession::new(10, 10);
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
            s.add_point(Point2::new(x, y)).unwrap();
        }
        s.terminate().unwrap();

        assert_eq!(s.state(), SessionState::Terminated);
        assert_eq!(s.polygons().len(), 1);
        assert_eq!(s.mask().covered_pixels(), 100);
        assert!(matches!(
            s.add_point(Point2::new(1.0, 1.0)),
            Err(SessionError::Terminated)
        ));
        assert!(matches!(s.terminate(), Err(SessionError::Terminated)));
    }

    #[test]
    fn event_stream_drives_the_session() {
        use AnnotationEvent::*;
        let mut s = AnnotationSession::new(10, 10);
        let events = [
            AddPoint { x: 0.0, y: 0.0 },
            AddPoint { x: 10.0, y: 0.0 },
            AddPoint { x: 10.0, y: 10.0 },
            FinalizePolygon,
            AddPoint { x: 2.0, y: 2.0 },
            FinalizePolygon, // dropped, 1 point
            UndoPolygon,     // removes the triangle
            Terminate,
        ];
        for e in events {
            s.apply(e).unwrap();
        }
        let outcome = s.finish();
        assert!(outcome.polygons.is_empty());
        assert_eq!(outcome.mask.covered_pixels(), 0);
    }
}
