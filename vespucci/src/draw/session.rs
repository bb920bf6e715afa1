use serde::{Deserialize, Serialize};
use vespucci_types::GroundPoint;

use crate::draw::preview::PreviewShape;
use crate::draw::shape::{PointId, Shape, ShapeId, ShapeStore};
use crate::draw::DrawMode;
use crate::style::{StyleModel, StylePatch};
use crate::viewer::{CursorStyle, FeatureRef, InteractionMode, InteractionToken, MapViewer, PickEvent};

/// What happens when a pick hits an already placed point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointHitPolicy {
    /// The hit point (working-list vertex, or the point shape itself in point mode) is
    /// removed.
    #[default]
    RemovePoint,
    /// In point mode the whole hit point shape is removed; for in-progress lines and
    /// polygons this behaves like [`PointHitPolicy::RemovePoint`].
    RemoveShape,
    /// Points are never removed by clicking; they can only be dragged.
    DragOnly,
}

/// Configuration of a [`DrawingSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSessionConfig {
    drag_threshold: u32,
    point_hit_policy: PointHitPolicy,
    multi_shape: bool,
    label_text: String,
}

impl Default for DrawingSessionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 2,
            point_hit_policy: PointHitPolicy::default(),
            multi_shape: true,
            label_text: String::new(),
        }
    }
}

impl DrawingSessionConfig {
    /// Amount of drag movement above which a pick is treated as the end of a point drag
    /// rather than a click.
    pub fn drag_threshold(&self) -> u32 {
        self.drag_threshold
    }

    /// Sets the drag movement threshold.
    pub fn with_drag_threshold(mut self, threshold: u32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Policy applied when a pick hits an already placed point.
    pub fn point_hit_policy(&self) -> PointHitPolicy {
        self.point_hit_policy
    }

    /// Sets the policy applied when a pick hits an already placed point.
    pub fn with_point_hit_policy(mut self, policy: PointHitPolicy) -> Self {
        self.point_hit_policy = policy;
        self
    }

    /// Whether the session starts a fresh preview after finalizing a shape (`true`) or
    /// stops drawing after the first committed shape (`false`, as measurement tools do).
    pub fn multi_shape(&self) -> bool {
        self.multi_shape
    }

    /// Sets whether drawing continues after a shape is finalized.
    pub fn with_multi_shape(mut self, multi_shape: bool) -> Self {
        self.multi_shape = multi_shape;
        self
    }

    /// Text placed by label-mode picks.
    pub fn label_text(&self) -> &str {
        &self.label_text
    }

    /// Sets the text placed by label-mode picks.
    pub fn with_label_text(mut self, text: impl Into<String>) -> Self {
        self.label_text = text.into();
        self
    }
}

/// State of a drawing session.
///
/// Drawing and deleting are mutually exclusive; entering one cancels the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Not interacting with picks.
    #[default]
    Idle,
    /// Collecting picks for shapes of the given mode.
    Drawing(DrawMode),
    /// Picks select committed shapes for removal.
    Deleting,
}

/// The draw-mode state machine.
///
/// A session owns the working point list, the live preview and the committed shape store.
/// It consumes pick events resolved by the map viewer and issues cursor/interaction
/// requests back through the [`MapViewer`] capability it is handed on every call, storing
/// only the interaction token it pushed.
#[derive(Default)]
pub struct DrawingSession {
    config: DrawingSessionConfig,
    state: SessionState,
    styles: StyleModel,

    points: Vec<GroundPoint>,
    point_ids: Vec<PointId>,
    next_point_id: u64,
    floating: Option<GroundPoint>,
    preview: Option<PreviewShape>,

    store: ShapeStore,
    token: Option<InteractionToken>,

    on_finalize: Option<Box<dyn FnMut(&Shape)>>,
    on_point_added: Option<Box<dyn FnMut(&GroundPoint)>>,
    on_stop: Option<Box<dyn FnMut()>>,
}

impl DrawingSession {
    /// Creates a session with the given configuration.
    pub fn new(config: DrawingSessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Active draw mode, if the session is drawing.
    pub fn mode(&self) -> Option<DrawMode> {
        match self.state {
            SessionState::Drawing(mode) => Some(mode),
            _ => None,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &DrawingSessionConfig {
        &self.config
    }

    /// Sets the text placed by subsequent label-mode picks.
    pub fn set_label_text(&mut self, text: impl Into<String>) {
        self.config.label_text = text.into();
    }

    /// Current styles new shapes are created with.
    pub fn styles(&self) -> &StyleModel {
        &self.styles
    }

    /// Merges a style patch and, if a line or polygon of that kind is in progress,
    /// destroys and rebuilds the preview so the change is visible immediately without
    /// losing drawn points.
    pub fn set_style(&mut self, mode: DrawMode, patch: &StylePatch) {
        self.styles.set_style(mode, patch);
        if matches!(self.state, SessionState::Drawing(current) if current == mode) {
            self.rebuild_preview();
        }
    }

    /// Committed shapes, in commit order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.store.iter()
    }

    /// The committed shape with the given id.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.store.get(id)
    }

    /// Number of committed shapes.
    pub fn shape_count(&self) -> usize {
        self.store.len()
    }

    /// Removes all committed shapes, as done when the owning tool is torn down.
    pub fn clear_shapes(&mut self) {
        self.store.clear();
    }

    /// The live preview shape, while a line or polygon is being drawn.
    pub fn preview(&self) -> Option<&PreviewShape> {
        self.preview.as_ref()
    }

    /// The working point list of the shape in progress.
    pub fn working_points(&self) -> &[GroundPoint] {
        &self.points
    }

    /// The floating (cursor-following) point, while one is set.
    pub fn floating_point(&self) -> Option<GroundPoint> {
        self.floating
    }

    /// Working points with the ids the drag collaborator addresses them by.
    pub fn draggable_points(&self) -> impl Iterator<Item = (PointId, &GroundPoint)> {
        self.point_ids.iter().copied().zip(self.points.iter())
    }

    /// Sets the callback invoked with every committed shape.
    pub fn set_on_finalize(&mut self, callback: impl FnMut(&Shape) + 'static) {
        self.on_finalize = Some(Box::new(callback));
    }

    /// Sets the callback invoked with every point added to the working list.
    pub fn set_on_point_added(&mut self, callback: impl FnMut(&GroundPoint) + 'static) {
        self.on_point_added = Some(Box::new(callback));
    }

    /// Sets the cleanup callback invoked when drawing stops.
    pub fn set_on_stop(&mut self, callback: impl FnMut() + 'static) {
        self.on_stop = Some(Box::new(callback));
    }

    /// Starts drawing shapes of the given mode.
    ///
    /// A quirk kept from long-standing behavior: calling this while already drawing is
    /// ignored entirely, even for a different mode. The current mode is never replaced
    /// mid-draw; stop first. Entering while deleting cancels the delete mode.
    pub fn enter_draw_mode(&mut self, mode: DrawMode, viewer: &mut dyn MapViewer) {
        if let SessionState::Drawing(current) = self.state {
            log::debug!("enter_draw_mode({mode:?}) ignored: already drawing {current:?}");
            return;
        }
        if self.state == SessionState::Deleting {
            self.stop_deleting(viewer);
        }

        self.state = SessionState::Drawing(mode);
        self.token = Some(viewer.push_interaction_mode(InteractionMode::DrawPick));
        viewer.set_cursor_style(CursorStyle::Crosshair);
        self.rebuild_preview();
        viewer.request_repaint();
        log::debug!("drawing session entered {mode:?} mode");
    }

    /// Handles a pick event delivered by the map viewer.
    ///
    /// Picks without a resolved ground position are silently ignored. A pick at the end of
    /// a drag gesture only resets the drag counter; the dragged point was already moved
    /// through [`DrawingSession::move_point`].
    pub fn handle_pick(&mut self, event: &PickEvent, viewer: &mut dyn MapViewer) {
        match self.state {
            SessionState::Idle => {}
            SessionState::Deleting => self.handle_delete_pick(event, viewer),
            SessionState::Drawing(mode) => self.handle_draw_pick(mode, event, viewer),
        }
    }

    /// Replaces the working point addressed by `id` with a new position, as the drag
    /// collaborator does while the user moves it. The preview is recomputed; no point is
    /// appended. Returns `false` if no such point exists.
    pub fn move_point(
        &mut self,
        id: PointId,
        position: GroundPoint,
        viewer: &mut dyn MapViewer,
    ) -> bool {
        let Some(index) = self.point_ids.iter().position(|point_id| *point_id == id) else {
            return false;
        };

        // A drag with zero displacement is a no-op, not a new point.
        if self.points[index] == position {
            return true;
        }

        self.points[index] = position;
        self.rebuild_preview();
        viewer.request_repaint();
        true
    }

    /// Sets or clears the floating point following the cursor during line/polygon
    /// drawing.
    pub fn set_floating_point(&mut self, position: Option<GroundPoint>, viewer: &mut dyn MapViewer) {
        if !matches!(
            self.state,
            SessionState::Drawing(DrawMode::Line | DrawMode::Polygon)
        ) {
            return;
        }

        self.floating = position;
        if let Some(preview) = &mut self.preview {
            preview.set_floating(position);
        }
        viewer.request_repaint();
    }

    /// Freezes the working point list into a committed shape.
    ///
    /// Refused (returning `None`, with the session left drawing) when a line has fewer
    /// than 2 or a polygon fewer than 3 points. Multi-shape sessions restart a fresh
    /// preview; single-shot sessions stop drawing.
    pub fn finalize(&mut self, viewer: &mut dyn MapViewer) -> Option<ShapeId> {
        let SessionState::Drawing(mode) = self.state else {
            return None;
        };
        if !matches!(mode, DrawMode::Line | DrawMode::Polygon) {
            // Point and label shapes are committed directly by their picks.
            return None;
        }

        let required = Shape::min_points(mode);
        if self.points.len() < required {
            log::debug!(
                "finalize refused: {mode:?} needs at least {required} points, have {}",
                self.points.len()
            );
            return None;
        }

        let style = self.styles.style_for(mode);
        let points = std::mem::take(&mut self.points);
        self.point_ids.clear();
        self.floating = None;

        let id = self.store.insert(mode, points, style, None).ok()?;
        self.notify_finalize(id);

        if self.config.multi_shape {
            self.rebuild_preview();
        } else {
            self.stop_drawing(viewer);
        }
        viewer.request_repaint();

        Some(id)
    }

    /// Stops drawing: clears the working list, the preview and the floating point, pops
    /// the interaction mode this session pushed, restores the default cursor and runs the
    /// cleanup callback.
    ///
    /// Idempotent: calling it when not drawing does nothing. The external cancel action of
    /// the pick interaction routes here as well.
    pub fn stop_drawing(&mut self, viewer: &mut dyn MapViewer) {
        if !matches!(self.state, SessionState::Drawing(_)) {
            return;
        }

        self.state = SessionState::Idle;
        self.points.clear();
        self.point_ids.clear();
        self.floating = None;
        self.preview = None;

        if let Some(token) = self.token.take() {
            viewer.pop_interaction_mode(token);
        }
        viewer.set_cursor_style(CursorStyle::Default);
        viewer.request_repaint();

        if let Some(mut callback) = self.on_stop.take() {
            callback();
            self.on_stop = Some(callback);
        }
        log::debug!("drawing session stopped");
    }

    /// Starts delete mode: every subsequent pick removes the committed shapes under the
    /// cursor. Cancels drawing if it is in progress.
    pub fn start_deleting(&mut self, viewer: &mut dyn MapViewer) {
        if self.state == SessionState::Deleting {
            return;
        }
        if matches!(self.state, SessionState::Drawing(_)) {
            self.stop_drawing(viewer);
        }

        self.state = SessionState::Deleting;
        self.token = Some(viewer.push_interaction_mode(InteractionMode::DeletePick));
        viewer.set_cursor_style(CursorStyle::Pointer);
        log::debug!("drawing session entered delete mode");
    }

    /// Leaves delete mode. Idempotent.
    pub fn stop_deleting(&mut self, viewer: &mut dyn MapViewer) {
        if self.state != SessionState::Deleting {
            return;
        }

        self.state = SessionState::Idle;
        if let Some(token) = self.token.take() {
            viewer.pop_interaction_mode(token);
        }
        viewer.set_cursor_style(CursorStyle::Default);
        viewer.request_repaint();
    }

    fn handle_delete_pick(&mut self, event: &PickEvent, viewer: &mut dyn MapViewer) {
        let mut removed = false;
        for hit in &event.hit_features {
            if let FeatureRef::Shape(id) = hit {
                removed |= self.store.remove(*id).is_some();
            }
        }

        if removed {
            viewer.request_repaint();
        }
    }

    fn handle_draw_pick(&mut self, mode: DrawMode, event: &PickEvent, viewer: &mut dyn MapViewer) {
        // A pick that missed the rendered terrain carries no position and is dropped.
        let Some(position) = event.ground_position else {
            return;
        };

        if viewer.drag_gesture_count() > self.config.drag_threshold {
            // End of a drag gesture: the dragged point has already been moved, this
            // release must not place a new one.
            viewer.reset_drag_gesture_count();
            return;
        }

        if self.apply_point_hit(mode, event, viewer) {
            return;
        }

        self.append_point(mode, position, viewer);
    }

    /// Applies the point-hit policy if the pick hit an already placed point. Returns
    /// whether the pick was consumed.
    fn apply_point_hit(&mut self, mode: DrawMode, event: &PickEvent, viewer: &mut dyn MapViewer) -> bool {
        match mode {
            DrawMode::Point | DrawMode::Label => {
                for hit in &event.hit_features {
                    let FeatureRef::Shape(id) = hit else {
                        continue;
                    };
                    if self.store.get(*id).map(|shape| shape.kind()) != Some(mode) {
                        continue;
                    }

                    match self.config.point_hit_policy {
                        PointHitPolicy::RemovePoint | PointHitPolicy::RemoveShape => {
                            self.store.remove(*id);
                            viewer.request_repaint();
                        }
                        PointHitPolicy::DragOnly => {}
                    }
                    return true;
                }
                false
            }
            DrawMode::Line | DrawMode::Polygon => {
                for hit in &event.hit_features {
                    let FeatureRef::WorkingPoint(point_id) = hit else {
                        continue;
                    };
                    let Some(index) = self.point_ids.iter().position(|p| p == point_id) else {
                        continue;
                    };

                    if self.config.point_hit_policy != PointHitPolicy::DragOnly {
                        self.points.remove(index);
                        self.point_ids.remove(index);
                        self.rebuild_preview();
                        viewer.request_repaint();
                    }
                    return true;
                }
                false
            }
        }
    }

    fn append_point(&mut self, mode: DrawMode, position: GroundPoint, viewer: &mut dyn MapViewer) {
        match mode {
            DrawMode::Point | DrawMode::Label => {
                let style = self.styles.style_for(mode);
                let label = match mode {
                    DrawMode::Label => Some(self.config.label_text.clone()),
                    _ => None,
                };

                let Ok(id) = self.store.insert(mode, vec![position], style, label) else {
                    return;
                };
                self.notify_point_added(position);
                self.notify_finalize(id);
                viewer.request_repaint();

                if !self.config.multi_shape {
                    self.stop_drawing(viewer);
                }
            }
            DrawMode::Line | DrawMode::Polygon => {
                // A pick at exactly the previous position (a drag that went nowhere)
                // must not produce a second vertex.
                if self.points.last() == Some(&position) {
                    return;
                }

                self.points.push(position);
                self.next_point_id += 1;
                self.point_ids.push(PointId(self.next_point_id));

                self.rebuild_preview();
                self.notify_point_added(position);
                viewer.request_repaint();
            }
        }
    }

    /// Recreates the preview from the current style and working point list. Explicitly
    /// invoked from every point or style change; there is no implicit invalidation.
    fn rebuild_preview(&mut self) {
        match self.state {
            SessionState::Drawing(mode @ (DrawMode::Line | DrawMode::Polygon)) => {
                let mut preview = PreviewShape::new(mode, self.styles.style_for(mode));
                preview.set_points(self.points.clone());
                preview.set_floating(self.floating);
                self.preview = Some(preview);
            }
            _ => self.preview = None,
        }
    }

    fn notify_finalize(&mut self, id: ShapeId) {
        if let Some(mut callback) = self.on_finalize.take() {
            if let Some(shape) = self.store.get(id) {
                callback(shape);
            }
            self.on_finalize = Some(callback);
        }
    }

    fn notify_point_added(&mut self, position: GroundPoint) {
        if let Some(mut callback) = self.on_point_added.take() {
            callback(&position);
            self.on_point_added = Some(callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::color::Color;
    use crate::viewer::testing::RecordingViewer;

    fn pick(lat: f64, lon: f64) -> PickEvent {
        PickEvent::at(GroundPoint::new(lat, lon))
    }

    fn line_session(viewer: &mut RecordingViewer) -> DrawingSession {
        let mut session = DrawingSession::new(DrawingSessionConfig::default());
        session.enter_draw_mode(DrawMode::Line, viewer);
        session
    }

    #[test]
    fn entering_draw_mode_pushes_interaction_and_cursor() {
        let mut viewer = RecordingViewer::default();
        let session = line_session(&mut viewer);

        assert_eq!(session.state(), SessionState::Drawing(DrawMode::Line));
        assert_eq!(viewer.top_mode(), Some(InteractionMode::DrawPick));
        assert_eq!(viewer.cursor(), CursorStyle::Crosshair);
        assert!(session.preview().is_some());
    }

    #[test]
    fn enter_draw_mode_is_ignored_while_drawing() {
        // Documented quirk: the mode is not switched mid-draw.
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        session.enter_draw_mode(DrawMode::Polygon, &mut viewer);

        assert_eq!(session.mode(), Some(DrawMode::Line));
        assert_eq!(session.working_points().len(), 1);
        assert_eq!(viewer.stack_depth(), 1);
    }

    #[test]
    fn picks_append_points_and_update_preview() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);

        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);

        assert_eq!(session.working_points().len(), 2);
        let preview = session.preview().expect("preview missing");
        assert_eq!(preview.points().len(), 2);
    }

    #[test]
    fn unresolved_pick_is_ignored() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);

        session.handle_pick(&PickEvent::miss(), &mut viewer);

        assert!(session.working_points().is_empty());
    }

    #[test]
    fn duplicate_consecutive_pick_is_collapsed() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);

        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        assert_eq!(session.working_points().len(), 1);
    }

    #[test]
    fn drag_tail_pick_resets_counter_without_adding_point() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        viewer.set_drag_gesture_count(10);
        session.handle_pick(&pick(45.5, 14.5), &mut viewer);

        assert_eq!(session.working_points().len(), 1);
        assert_eq!(viewer.drag_gesture_count(), 0);
    }

    #[test]
    fn point_mode_commits_on_every_pick() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(DrawingSessionConfig::default());
        session.enter_draw_mode(DrawMode::Point, &mut viewer);

        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(46.0, 15.0), &mut viewer);

        assert_eq!(session.shape_count(), 2);
        assert!(session.working_points().is_empty());
        assert_matches!(session.state(), SessionState::Drawing(DrawMode::Point));
    }

    #[test]
    fn point_mode_click_to_remove() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(DrawingSessionConfig::default());
        session.enter_draw_mode(DrawMode::Point, &mut viewer);

        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        let id = session.shapes().next().expect("shape missing").id();

        // Picking the placed point again removes it; picking elsewhere appends.
        session.handle_pick(
            &PickEvent::with_hits(GroundPoint::new(45.0, 14.0), vec![FeatureRef::Shape(id)]),
            &mut viewer,
        );
        assert_eq!(session.shape_count(), 0);

        session.handle_pick(&pick(46.0, 15.0), &mut viewer);
        assert_eq!(session.shape_count(), 1);
    }

    #[test]
    fn drag_only_policy_keeps_points() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(
            DrawingSessionConfig::default().with_point_hit_policy(PointHitPolicy::DragOnly),
        );
        session.enter_draw_mode(DrawMode::Point, &mut viewer);

        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        let id = session.shapes().next().expect("shape missing").id();

        session.handle_pick(
            &PickEvent::with_hits(GroundPoint::new(45.0, 14.0), vec![FeatureRef::Shape(id)]),
            &mut viewer,
        );

        assert_eq!(session.shape_count(), 1);
    }

    #[test]
    fn clicking_working_point_removes_vertex() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);

        let (point_id, position) = {
            let (id, point) = session.draggable_points().next().expect("no points");
            (id, *point)
        };
        session.handle_pick(
            &PickEvent::with_hits(position, vec![FeatureRef::WorkingPoint(point_id)]),
            &mut viewer,
        );

        assert_eq!(session.working_points().len(), 1);
    }

    #[test]
    fn finalize_requires_two_points_for_lines() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        assert_eq!(session.finalize(&mut viewer), None);
        assert_eq!(session.shape_count(), 0);
        // The session stays in drawing state awaiting more points.
        assert_eq!(session.mode(), Some(DrawMode::Line));

        session.handle_pick(&pick(45.1, 14.2), &mut viewer);
        assert!(session.finalize(&mut viewer).is_some());
        assert_eq!(session.shape_count(), 1);
    }

    #[test]
    fn finalize_requires_three_points_for_polygons() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(DrawingSessionConfig::default());
        session.enter_draw_mode(DrawMode::Polygon, &mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.0, 14.1), &mut viewer);

        assert_eq!(session.finalize(&mut viewer), None);
        assert_eq!(session.shape_count(), 0);

        session.handle_pick(&pick(45.1, 14.1), &mut viewer);
        let id = session.finalize(&mut viewer).expect("finalize refused");

        let shape = session.shape(id).expect("shape missing");
        assert_eq!(shape.points().len(), 3);
        assert_eq!(shape.render_points().count(), 4);
    }

    #[test]
    fn multi_shape_session_keeps_drawing_after_finalize() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);
        session.finalize(&mut viewer);

        assert_eq!(session.mode(), Some(DrawMode::Line));
        assert!(session.working_points().is_empty());
        let preview = session.preview().expect("preview should restart");
        assert!(preview.points().is_empty());
    }

    #[test]
    fn single_shot_session_stops_after_finalize() {
        let mut viewer = RecordingViewer::default();
        let mut session =
            DrawingSession::new(DrawingSessionConfig::default().with_multi_shape(false));
        session.enter_draw_mode(DrawMode::Line, &mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);
        session.finalize(&mut viewer);

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(viewer.stack_depth(), 0);
        assert_eq!(viewer.cursor(), CursorStyle::Default);
    }

    #[test]
    fn stop_drawing_is_idempotent() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        session.stop_drawing(&mut viewer);
        let repaints = viewer.repaint_requests();
        session.stop_drawing(&mut viewer);

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.preview().is_none());
        assert!(session.working_points().is_empty());
        assert_eq!(viewer.stack_depth(), 0);
        assert_eq!(viewer.repaint_requests(), repaints);
    }

    #[test]
    fn stop_drawing_pops_only_its_own_token() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);

        // Another tool took over the viewer on top of us.
        viewer.push_external_mode(InteractionMode::Navigate);
        session.stop_drawing(&mut viewer);

        // Our buried token must not disturb the external mode.
        assert_eq!(viewer.stack_depth(), 2);
        assert_eq!(viewer.top_mode(), Some(InteractionMode::Navigate));
    }

    #[test]
    fn cleanup_callback_runs_once_per_stop() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);

        let stops = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = stops.clone();
        session.set_on_stop(move || counter.set(counter.get() + 1));

        session.stop_drawing(&mut viewer);
        session.stop_drawing(&mut viewer);

        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn deleting_cancels_drawing() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        session.start_deleting(&mut viewer);

        assert_eq!(session.state(), SessionState::Deleting);
        assert!(session.working_points().is_empty());
        assert_eq!(viewer.top_mode(), Some(InteractionMode::DeletePick));
        assert_eq!(viewer.stack_depth(), 1);
    }

    #[test]
    fn delete_pick_removes_hit_shapes() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(DrawingSessionConfig::default());
        session.enter_draw_mode(DrawMode::Point, &mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(46.0, 15.0), &mut viewer);
        session.stop_drawing(&mut viewer);

        let id = session.shapes().next().expect("shape missing").id();
        session.start_deleting(&mut viewer);
        session.handle_pick(
            &PickEvent::with_hits(GroundPoint::new(45.0, 14.0), vec![FeatureRef::Shape(id)]),
            &mut viewer,
        );
        session.stop_deleting(&mut viewer);

        assert_eq!(session.shape_count(), 1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(viewer.stack_depth(), 0);
    }

    #[test]
    fn moving_point_replaces_instead_of_appending() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);

        let (id, _) = session.draggable_points().next().expect("no points");
        let moved = GroundPoint::new(45.05, 14.05);
        assert!(session.move_point(id, moved, &mut viewer));

        assert_eq!(session.working_points().len(), 2);
        assert_eq!(session.working_points()[0], moved);
    }

    #[test]
    fn style_change_rebuilds_preview_in_place() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);

        session.set_style(DrawMode::Line, &StylePatch::color(Color::GREEN));

        let preview = session.preview().expect("preview missing");
        assert_eq!(preview.style().color(), Color::GREEN);
        assert_eq!(preview.points().len(), 2);
    }

    #[test]
    fn style_change_does_not_restyle_committed_shapes() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);
        let id = session.finalize(&mut viewer).expect("finalize refused");
        let committed_color = session.shape(id).expect("shape missing").style().color();

        session.set_style(DrawMode::Line, &StylePatch::color(Color::GREEN));

        assert_eq!(
            session.shape(id).expect("shape missing").style().color(),
            committed_color
        );
    }

    #[test]
    fn label_mode_places_configured_text() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(
            DrawingSessionConfig::default().with_label_text("Summit"),
        );
        session.enter_draw_mode(DrawMode::Label, &mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);

        let shape = session.shapes().next().expect("shape missing");
        assert_eq!(shape.kind(), DrawMode::Label);
        assert_eq!(shape.label(), Some("Summit"));
    }

    #[test]
    fn floating_point_feeds_preview() {
        let mut viewer = RecordingViewer::default();
        let mut session = DrawingSession::new(DrawingSessionConfig::default());
        session.enter_draw_mode(DrawMode::Polygon, &mut viewer);
        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.0, 14.1), &mut viewer);

        session.set_floating_point(Some(GroundPoint::new(45.1, 14.1)), &mut viewer);

        let rendered = session.preview().expect("preview missing").render_points();
        // Two committed points, the floating point, and the closing vertex.
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[3], rendered[0]);
    }

    #[test]
    fn finalize_hook_sees_committed_shape() {
        let mut viewer = RecordingViewer::default();
        let mut session = line_session(&mut viewer);

        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.set_on_finalize(move |shape| sink.borrow_mut().push(shape.id()));

        session.handle_pick(&pick(45.0, 14.0), &mut viewer);
        session.handle_pick(&pick(45.1, 14.2), &mut viewer);
        let id = session.finalize(&mut viewer).expect("finalize refused");

        assert_eq!(*seen.borrow(), vec![id]);
    }
}
